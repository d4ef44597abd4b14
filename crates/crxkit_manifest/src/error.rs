//! Error types for manifest validation.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for manifest operations.
pub type ManifestResult<T> = Result<T, ManifestError>;

/// Errors that stop validation from running at all.
///
/// A manifest that fails validation is not an error; it yields an invalid
/// [`crate::ValidationReport`].
#[derive(Error, Debug)]
pub enum ManifestError {
    #[error("Failed to compile manifest schema: {0}")]
    Schema(String),

    #[error("Failed to read manifest {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
