//! # crxkit_manifest
//!
//! Validation of Chrome extension `manifest.json` files against a bundled
//! Manifest V3 JSON Schema.
//!
//! ## Example
//!
//! ```rust
//! use crxkit_manifest::{ManifestValidator, SchemaValidator};
//! use serde_json::json;
//!
//! let validator = SchemaValidator::new().unwrap();
//! let report = validator.validate(&json!({
//!     "manifest_version": 3,
//!     "name": "Tab Saver",
//!     "version": "0.1.0"
//! }));
//! assert!(report.valid);
//! ```

pub mod error;
pub mod validator;

pub use error::{ManifestError, ManifestResult};
pub use validator::{
    ManifestValidator, SchemaValidator, ValidationIssue, ValidationReport, MANIFEST_FILE_NAME,
    MANIFEST_V3_SCHEMA,
};
