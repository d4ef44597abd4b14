//! Rendering a template on top of its base template.

use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, info, warn};

use crate::classify::{classify, is_partial, FileKind};
use crate::context::RenderContext;
use crate::error::TemplateResult;
use crate::package::{merge_package_json, PackageDescriptor};
use crate::partials::merge_partial_files;
use crate::path::TemplatePath;
use crate::renderer::{FileContent, RenderedFile, TemplateRenderer};

impl TemplateRenderer {
    /// Render `template_root`, inheriting from `base_root` when it exists.
    ///
    /// Without a usable base this is exactly [`TemplateRenderer::render`].
    /// Otherwise both trees are rendered with the same context, their package
    /// descriptors merged, base partials folded into their targets, and the
    /// result deduplicated by path with later entries winning.
    pub fn render_with_inheritance(
        &self,
        template_root: &Path,
        base_root: Option<&Path>,
        context: &RenderContext,
    ) -> TemplateResult<Vec<RenderedFile>> {
        let Some(base_root) = base_root.filter(|p| p.exists()) else {
            debug!("No base tree for {:?}; rendering without inheritance", template_root);
            return self.render(template_root, context);
        };

        info!("Rendering {:?} on top of base {:?}", template_root, base_root);
        let mut base_files = self.render(base_root, context)?;
        let mut template_files = self.render(template_root, context)?;

        merge_descriptors(&mut base_files, &mut template_files);
        let merged = merge_partial_files(&base_files, &template_files);

        Ok(dedupe_by_path(merged))
    }
}

/// Replace the template's package descriptor with the merged one.
///
/// The base descriptor is consumed whenever the template has its own; a
/// descriptor that is binary or fails to parse leaves the template's file
/// untouched.
fn merge_descriptors(base_files: &mut Vec<RenderedFile>, template_files: &mut [RenderedFile]) {
    let Some(template_idx) = find_descriptor(template_files) else {
        return;
    };
    let Some(base_idx) = find_descriptor(base_files) else {
        return;
    };
    let base = base_files.remove(base_idx);
    let template = &mut template_files[template_idx];

    let (Some(base_text), Some(template_text)) = (base.as_text(), template.as_text()) else {
        warn!("Package descriptor {} is not text; skipping merge", template.path);
        return;
    };

    let parsed = PackageDescriptor::from_json_str(base_text)
        .and_then(|b| PackageDescriptor::from_json_str(template_text).map(|t| (b, t)));
    let merged = parsed.and_then(|(b, t)| merge_package_json(&b, &t).to_json_string());

    match merged {
        Ok(json) => {
            debug!("Merged package descriptor {} with base {}", template.path, base.path);
            template.content = FileContent::Text(json);
        }
        Err(e) => {
            warn!(
                "Malformed package descriptor ({}); keeping {} unmerged",
                e, template.path
            );
        }
    }
}

fn find_descriptor(files: &[RenderedFile]) -> Option<usize> {
    files
        .iter()
        .position(|f| classify(&f.path) == FileKind::Descriptor)
}

/// Drop partial paths and collapse duplicates. A path keeps the position of
/// its first occurrence and the content of its last.
fn dedupe_by_path(files: Vec<RenderedFile>) -> Vec<RenderedFile> {
    let mut out: Vec<RenderedFile> = Vec::with_capacity(files.len());
    let mut seen: HashMap<TemplatePath, usize> = HashMap::new();

    for file in files {
        if is_partial(&file.path) {
            warn!("Dropping unmerged partial file {}", file.path);
            continue;
        }
        match seen.get(&file.path) {
            Some(&i) => {
                debug!("{} overrides an earlier entry", file.path);
                out[i] = file;
            }
            None => {
                seen.insert(file.path.clone(), out.len());
                out.push(file);
            }
        }
    }

    out
}
