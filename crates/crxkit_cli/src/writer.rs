//! Writing rendered files to disk.
//!
//! Files are staged in a temporary directory next to the output and moved into
//! place in one step, so a failed run never leaves a half-written project.

use std::fs;
use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use fs_extra::dir::CopyOptions;
use tracing::{debug, info, warn};

use crxkit_templates::{RenderedFile, TemplatePath};

use crate::commands::CommandError;

/// Trailing suffix that keeps dotfiles and build-sensitive files inert inside
/// the template tree (`.gitignore.template` is written as `.gitignore`).
pub const AUXILIARY_SUFFIX: &str = ".template";

/// Final on-disk path for a rendered file.
pub fn materialized_path(path: &TemplatePath) -> TemplatePath {
    match path.file_name().strip_suffix(AUXILIARY_SUFFIX) {
        Some(stripped) if !stripped.is_empty() => path.with_file_name(stripped),
        _ => path.clone(),
    }
}

/// Write `files` into `output`. Returns the written paths.
///
/// An existing non-empty `output` is only replaced when `force` is set.
pub fn write_project(files: &[RenderedFile], output: &Path, force: bool) -> Result<Vec<PathBuf>> {
    let output = resolve_output(output)?;
    let output = output.as_path();
    let parent = output.parent().ok_or_else(|| {
        CommandError::InvalidArgument(format!(
            "Cannot write a project to {}",
            output.display()
        ))
    })?;
    fs::create_dir_all(parent)
        .with_context(|| format!("Failed to create {}", parent.display()))?;

    let staging = tempfile::Builder::new()
        .prefix(".crxkit-")
        .tempdir_in(parent)
        .context("Failed to create staging directory")?;
    debug!("Staging project in {:?}", staging.path());

    let mut written = Vec::with_capacity(files.len());
    for file in files {
        let relative = materialized_path(&file.path);
        let target = relative.to_path_buf(staging.path());
        let overwrite = target.exists();
        if overwrite {
            warn!("{} is written twice; keeping {}", relative, file.path);
        }
        if let Some(dir) = target.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(&target, file.content.as_bytes())
            .with_context(|| format!("Failed to write {}", relative))?;
        if !overwrite {
            written.push(relative.to_path_buf(output));
        }
    }

    clear_output(output, force)?;
    move_into_place(staging.path(), output)?;

    info!("Wrote {} files to {:?}", written.len(), output);
    Ok(written)
}

/// Absolute, `.`/`..`-free form of `output`. The staging dir goes in its
/// parent, which must never be `output` itself or lie below it.
fn resolve_output(output: &Path) -> Result<PathBuf> {
    if output.exists() {
        return fs::canonicalize(output)
            .with_context(|| format!("Failed to resolve {}", output.display()));
    }
    let absolute = std::path::absolute(output)
        .with_context(|| format!("Failed to resolve {}", output.display()))?;
    let mut resolved = PathBuf::new();
    for component in absolute.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            other => resolved.push(other),
        }
    }
    Ok(resolved)
}

fn clear_output(output: &Path, force: bool) -> Result<()> {
    if !output.exists() {
        return Ok(());
    }
    let is_empty = output.is_dir() && fs::read_dir(output)?.next().is_none();
    if is_empty {
        fs::remove_dir(output)?;
    } else if force {
        warn!("Replacing existing directory {:?}", output);
        if output.is_dir() {
            fs::remove_dir_all(output)?;
        } else {
            fs::remove_file(output)?;
        }
    } else {
        return Err(CommandError::InvalidArgument(format!(
            "Output directory is not empty: {}",
            output.display()
        ))
        .into());
    }
    Ok(())
}

/// Rename the staging dir onto `output`, copying when they sit on different
/// filesystems. The staging dir itself is removed by its guard.
fn move_into_place(staging: &Path, output: &Path) -> Result<()> {
    if let Err(e) = fs::rename(staging, output) {
        debug!("Rename failed ({}); copying instead", e);
        fs::create_dir_all(output)?;
        let mut options = CopyOptions::new();
        options.content_only = true;
        fs_extra::dir::copy(staging, output, &options)
            .with_context(|| format!("Failed to move project into {}", output.display()))?;
    }
    Ok(())
}
