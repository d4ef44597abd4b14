//! Manifest validation.

use std::fmt;
use std::fs;
use std::path::Path;

use jsonschema::JSONSchema;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::error::{ManifestError, ManifestResult};

/// File name of an extension manifest.
pub const MANIFEST_FILE_NAME: &str = "manifest.json";

/// Bundled JSON Schema for Manifest V3.
pub const MANIFEST_V3_SCHEMA: &str = include_str!("../schemas/manifest.v3.schema.json");

/// A single validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationIssue {
    /// JSON pointer to the offending value (`""` for the document root)
    pub pointer: String,
    pub message: String,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let pointer = if self.pointer.is_empty() { "/" } else { &self.pointer };
        write!(f, "{}: {}", pointer, self.message)
    }
}

/// Validation result with details.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<ValidationIssue>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn new() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }

    pub fn add_error(&mut self, pointer: impl Into<String>, message: impl Into<String>) {
        self.valid = false;
        self.errors.push(ValidationIssue {
            pointer: pointer.into(),
            message: message.into(),
        });
    }

    pub fn add_warning(&mut self, message: impl Into<String>) {
        self.warnings.push(message.into());
    }
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Pass/fail check of a parsed extension manifest.
pub trait ManifestValidator {
    fn validate(&self, manifest: &Value) -> ValidationReport;

    /// Parse and validate. A parse failure is reported, not returned.
    fn validate_str(&self, content: &str) -> ValidationReport {
        match serde_json::from_str::<Value>(content) {
            Ok(value) => self.validate(&value),
            Err(e) => {
                let mut report = ValidationReport::new();
                report.add_error("", format!("not valid JSON: {}", e));
                report
            }
        }
    }

    /// Read, parse and validate a manifest file.
    fn validate_file(&self, path: &Path) -> ManifestResult<ValidationReport> {
        let content = fs::read_to_string(path).map_err(|source| ManifestError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(self.validate_str(&content))
    }
}

/// Validator backed by the bundled Manifest V3 schema.
pub struct SchemaValidator {
    schema: JSONSchema,
}

impl SchemaValidator {
    /// Compile the bundled schema.
    pub fn new() -> ManifestResult<Self> {
        let schema: Value = serde_json::from_str(MANIFEST_V3_SCHEMA)?;
        Self::with_schema(&schema)
    }

    /// Compile a custom schema.
    pub fn with_schema(schema: &Value) -> ManifestResult<Self> {
        let schema =
            JSONSchema::compile(schema).map_err(|e| ManifestError::Schema(e.to_string()))?;
        Ok(Self { schema })
    }
}

impl ManifestValidator for SchemaValidator {
    fn validate(&self, manifest: &Value) -> ValidationReport {
        let mut report = ValidationReport::new();

        if let Err(errors) = self.schema.validate(manifest) {
            for error in errors {
                report.add_error(error.instance_path.to_string(), error.to_string());
            }
        }

        if manifest.get("description").is_none() {
            report.add_warning("No description; the Chrome Web Store requires one");
        }
        if manifest.get("icons").is_none() {
            report.add_warning("No icons declared; Chrome will use a generic icon");
        }

        debug!(
            "Manifest validation: {} errors, {} warnings",
            report.errors.len(),
            report.warnings.len()
        );
        report
    }
}
