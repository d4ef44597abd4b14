//! File classification by naming convention.
//!
//! Template trees use two file-name conventions that the merge stages act on:
//!
//! - **Partial files** carry the `.partial` infix (`README.partial.md`,
//!   `.gitignore.partial.template`). Removing the infix yields the path of the
//!   file the fragment is merged into.
//! - **Package descriptors** are the root-level `package.json` (or
//!   `package.json.template`) of a tree.
//!
//! All string matching on file names lives here; the merge stages only look at
//! [`FileKind`].

use crate::path::TemplatePath;

/// Infix that marks a partial file.
pub const PARTIAL_MARKER: &str = ".partial";

/// File names recognised as package descriptors at the root of a tree.
pub const DESCRIPTOR_FILE_NAMES: &[&str] = &["package.json", "package.json.template"];

/// How the merge stages treat a rendered file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileKind {
    /// Emitted as-is.
    Plain,
    /// Fragment to merge into `target`.
    Partial { target: TemplatePath },
    /// Structured dependency/script manifest.
    Descriptor,
}

/// Classify a path. Partial wins over descriptor.
pub fn classify(path: &TemplatePath) -> FileKind {
    if let Some(target) = partial_target(path) {
        return FileKind::Partial { target };
    }
    if path.is_root_level() && DESCRIPTOR_FILE_NAMES.contains(&path.file_name()) {
        return FileKind::Descriptor;
    }
    FileKind::Plain
}

/// True when the file name carries the partial marker.
pub fn is_partial(path: &TemplatePath) -> bool {
    partial_target(path).is_some()
}

/// Path with the partial marker removed, or `None` for non-partials.
pub fn partial_target(path: &TemplatePath) -> Option<TemplatePath> {
    let name = path.file_name();
    let offset = marker_offset(name)?;
    let target_name = format!(
        "{}{}",
        &name[..offset],
        &name[offset + PARTIAL_MARKER.len()..]
    );
    if target_name.is_empty() {
        return None;
    }
    Some(path.with_file_name(&target_name))
}

/// The marker only counts as a whole dotted segment: followed by `.` or the end.
fn marker_offset(name: &str) -> Option<usize> {
    name.match_indices(PARTIAL_MARKER)
        .map(|(offset, _)| offset)
        .find(|offset| {
            let rest = &name[offset + PARTIAL_MARKER.len()..];
            rest.is_empty() || rest.starts_with('.')
        })
}
