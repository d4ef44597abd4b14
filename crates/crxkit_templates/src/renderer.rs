//! Template rendering.
//!
//! Two layers:
//!
//! - [`render_file`] is a pure text transform: `{{#if var}}…{{/if}}` blocks
//!   first, then `{{var}}` substitution. Unknown tokens are kept verbatim so a
//!   second pass with a fuller context can still resolve them.
//! - [`TemplateRenderer::render`] walks a template tree and returns every file
//!   as an in-memory [`RenderedFile`], with both content and path rendered.

use std::fs;
use std::path::Path;
use std::sync::LazyLock;

use glob::Pattern;
use regex::{Captures, Regex};
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::context::RenderContext;
use crate::error::{TemplateError, TemplateResult};
use crate::path::TemplatePath;

static CONDITIONAL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)\{\{#if\s+(\w+)\s*\}\}(.*?)\{\{/if\}\}").expect("conditional pattern")
});

static VARIABLE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{(\w+)\}\}").expect("variable pattern"));

/// Housekeeping files that never belong in a generated project.
pub const DEFAULT_IGNORE_PATTERNS: &[&str] = &[".gitkeep", ".DS_Store", "Thumbs.db"];

/// Extensions copied byte-for-byte without substitution.
const BINARY_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "ico", "webp", "bmp", "woff", "woff2", "ttf", "otf", "eot",
    "zip", "gz", "wasm", "pdf",
];

/// Payload of a rendered file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileContent {
    /// UTF-8 text that went through substitution.
    Text(String),
    /// Passthrough bytes (icons, fonts, ...).
    Binary(Vec<u8>),
}

/// Encoding tag of a rendered file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Utf8,
    Binary,
}

impl FileContent {
    pub fn encoding(&self) -> Encoding {
        match self {
            FileContent::Text(_) => Encoding::Utf8,
            FileContent::Binary(_) => Encoding::Binary,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            FileContent::Text(text) => Some(text),
            FileContent::Binary(_) => None,
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            FileContent::Text(text) => text.as_bytes(),
            FileContent::Binary(bytes) => bytes,
        }
    }
}

/// A single file produced by rendering. Merges build new records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedFile {
    pub path: TemplatePath,
    pub content: FileContent,
}

impl RenderedFile {
    pub fn text(path: impl Into<TemplatePath>, content: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            content: FileContent::Text(content.into()),
        }
    }

    pub fn binary(path: impl Into<TemplatePath>, bytes: Vec<u8>) -> Self {
        Self {
            path: path.into(),
            content: FileContent::Binary(bytes),
        }
    }

    pub fn encoding(&self) -> Encoding {
        self.content.encoding()
    }

    pub fn as_text(&self) -> Option<&str> {
        self.content.as_text()
    }
}

/// Render text content against a context.
///
/// Conditional blocks are single-level and match the nearest `{{/if}}`.
pub fn render_file(content: &str, context: &RenderContext) -> String {
    let resolved = CONDITIONAL_PATTERN.replace_all(content, |caps: &Captures| {
        if context.is_truthy(&caps[1]) {
            caps[2].to_string()
        } else {
            String::new()
        }
    });

    VARIABLE_PATTERN
        .replace_all(&resolved, |caps: &Captures| match context.get(&caps[1]) {
            Some(value) => value.to_string(),
            None => caps[0].to_string(),
        })
        .into_owned()
}

/// Walks template trees and renders every file.
#[derive(Debug, Clone)]
pub struct TemplateRenderer {
    ignore: Vec<Pattern>,
}

impl Default for TemplateRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateRenderer {
    /// Renderer that skips [`DEFAULT_IGNORE_PATTERNS`].
    pub fn new() -> Self {
        Self {
            ignore: DEFAULT_IGNORE_PATTERNS
                .iter()
                .filter_map(|p| Pattern::new(p).ok())
                .collect(),
        }
    }

    /// Renderer with a custom set of file-name glob patterns to skip.
    pub fn with_ignore_patterns<I, S>(patterns: I) -> TemplateResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let ignore = patterns
            .into_iter()
            .map(|p| {
                Pattern::new(p.as_ref()).map_err(|e| TemplateError::InvalidPattern {
                    pattern: p.as_ref().to_string(),
                    message: e.to_string(),
                })
            })
            .collect::<TemplateResult<Vec<_>>>()?;
        Ok(Self { ignore })
    }

    /// Render every file under `root`.
    ///
    /// Directories are traversed but never emitted. Entries are visited in
    /// file-name order so the output is stable across platforms. Read and walk
    /// failures are returned, not skipped.
    pub fn render(&self, root: &Path, context: &RenderContext) -> TemplateResult<Vec<RenderedFile>> {
        let mut files = Vec::new();

        for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
            let entry = entry?;
            if entry.file_type().is_dir() {
                continue;
            }

            let name = entry.file_name().to_string_lossy();
            if self.is_ignored(&name) {
                debug!("Skipping housekeeping file: {:?}", entry.path());
                continue;
            }

            let relative = entry
                .path()
                .strip_prefix(root)
                .map_err(|_| TemplateError::OutsideRoot {
                    path: entry.path().to_path_buf(),
                    root: root.to_path_buf(),
                })?;
            let raw_path = TemplatePath::from_relative(relative);
            let path = TemplatePath::new(render_file(raw_path.as_str(), context));

            let bytes = fs::read(entry.path())?;
            let content = if is_binary_path(&raw_path) {
                FileContent::Binary(bytes)
            } else {
                match String::from_utf8(bytes) {
                    Ok(text) => FileContent::Text(render_file(&text, context)),
                    Err(e) => FileContent::Binary(e.into_bytes()),
                }
            };

            debug!("Rendered: {} ({:?})", path, content.encoding());
            files.push(RenderedFile { path, content });
        }

        info!("Rendered {} files from {:?}", files.len(), root);
        Ok(files)
    }

    fn is_ignored(&self, file_name: &str) -> bool {
        self.ignore.iter().any(|p| p.matches(file_name))
    }
}

fn is_binary_path(path: &TemplatePath) -> bool {
    path.file_name()
        .rsplit_once('.')
        .map(|(_, ext)| BINARY_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}
