//! Integration tests for manifest validation.

use std::fs;

use crxkit_manifest::{ManifestError, ManifestValidator, SchemaValidator, MANIFEST_FILE_NAME};
use serde_json::json;
use tempfile::tempdir;

#[test]
fn test_validate_file() {
    let temp = tempdir().unwrap();
    let path = temp.path().join(MANIFEST_FILE_NAME);
    fs::write(
        &path,
        r#"{
  "manifest_version": 3,
  "name": "Tab Saver",
  "version": "0.1.0",
  "action": {"default_popup": "src/popup/index.html"},
  "background": {"service_worker": "background.js", "type": "module"},
  "permissions": ["tabs", "storage"]
}"#,
    )
    .unwrap();

    let report = SchemaValidator::new().unwrap().validate_file(&path).unwrap();
    assert!(report.valid, "{:?}", report.errors);
    assert_eq!(report.warnings.len(), 2);
}

#[test]
fn test_validate_missing_file_is_error() {
    let temp = tempdir().unwrap();
    let result = SchemaValidator::new()
        .unwrap()
        .validate_file(&temp.path().join(MANIFEST_FILE_NAME));
    assert!(matches!(result, Err(ManifestError::Read { .. })));
}

#[test]
fn test_duplicate_permissions_rejected() {
    let report = SchemaValidator::new().unwrap().validate(&json!({
        "manifest_version": 3,
        "name": "Tab Saver",
        "version": "0.1.0",
        "permissions": ["tabs", "tabs"]
    }));
    assert!(!report.valid);
    assert_eq!(report.errors[0].pointer, "/permissions");
}

#[test]
fn test_custom_schema() {
    let validator = SchemaValidator::with_schema(&json!({"required": ["key"]})).unwrap();
    assert!(!validator.validate(&json!({})).valid);
    assert!(validator.validate(&json!({"key": "abc"})).valid);

    assert!(matches!(
        SchemaValidator::with_schema(&json!({"type": 12})),
        Err(ManifestError::Schema(_))
    ));
}

#[test]
fn test_shipped_template_manifests_are_valid_after_render() {
    let validator = SchemaValidator::new().unwrap();
    let templates = std::path::Path::new(env!("CARGO_MANIFEST_DIR")).join("../../templates");

    for id in ["vanilla", "react", "vue"] {
        let raw = fs::read_to_string(templates.join(id).join("template/public/manifest.json")).unwrap();
        let rendered = raw
            .replace("{{projectName}}", "Tab Saver")
            .replace("{{version}}", "0.1.0")
            .replace("{{description}}", "Saves tabs");
        let report = validator.validate_str(&rendered);
        assert!(report.valid, "{}: {:?}", id, report.errors);
    }
}
