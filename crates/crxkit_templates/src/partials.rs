//! Merging of base partial files into a template's file set.

use std::collections::HashMap;

use tracing::{debug, warn};

use crate::classify::{classify, FileKind};
use crate::path::TemplatePath;
use crate::renderer::{FileContent, RenderedFile};

/// Insertion point for base content inside a README-like target.
///
/// When the marker is missing the base content is appended instead.
pub const README_PLACEHOLDER: &str = "<!-- crxkit:base-readme -->";

/// Merge `base_files` into `template_files`.
///
/// Output order is base-derived entries first (in base order), then template
/// files that were not consumed as a partial target (in template order). No
/// output path carries the partial marker. Non-partial base files are passed
/// through even if a template file has the same path; deduplication happens in
/// the inheritance stage.
pub fn merge_partial_files(
    base_files: &[RenderedFile],
    template_files: &[RenderedFile],
) -> Vec<RenderedFile> {
    let mut remaining: Vec<Option<&RenderedFile>> = template_files.iter().map(Some).collect();
    let mut index: HashMap<&TemplatePath, usize> = HashMap::with_capacity(template_files.len());
    for (i, file) in template_files.iter().enumerate() {
        index.insert(&file.path, i);
    }

    let mut merged = Vec::with_capacity(base_files.len() + template_files.len());

    for base in base_files {
        let target = match classify(&base.path) {
            FileKind::Partial { target } => target,
            FileKind::Plain | FileKind::Descriptor => {
                merged.push(base.clone());
                continue;
            }
        };

        let counterpart = index
            .remove(&target)
            .and_then(|i| remaining.get_mut(i).and_then(Option::take));

        match counterpart {
            Some(template) => {
                debug!("Merging partial {} into {}", base.path, target);
                merged.push(RenderedFile {
                    path: target,
                    content: merge_content(&template.path, &template.content, &base.content),
                });
            }
            None => {
                debug!("Promoting partial {} to {}", base.path, target);
                merged.push(RenderedFile {
                    path: target,
                    content: base.content.clone(),
                });
            }
        }
    }

    merged.extend(remaining.into_iter().flatten().cloned());
    merged
}

/// Combine a template file with a base fragment. The result keeps the
/// template's encoding; binary content is never merged.
fn merge_content(target: &TemplatePath, template: &FileContent, base: &FileContent) -> FileContent {
    let (FileContent::Text(template_text), FileContent::Text(base_text)) = (template, base) else {
        warn!("Not merging binary content into {}; keeping template file", target);
        return template.clone();
    };

    if is_readme(target) {
        if template_text.contains(README_PLACEHOLDER) {
            return FileContent::Text(template_text.replacen(README_PLACEHOLDER, base_text, 1));
        }
        warn!(
            "{} has no {} placeholder; appending base content",
            target, README_PLACEHOLDER
        );
    }

    FileContent::Text(format!("{}\n{}", template_text, base_text))
}

fn is_readme(path: &TemplatePath) -> bool {
    path.file_name().to_ascii_lowercase().contains("readme")
}
