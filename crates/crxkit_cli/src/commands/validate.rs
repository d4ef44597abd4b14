//! Validate command - Check a manifest.json against Manifest V3.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use crxkit_manifest::{ManifestValidator, SchemaValidator, MANIFEST_FILE_NAME};

use super::CommandError;

/// Places a project keeps its manifest, in lookup order.
const MANIFEST_LOCATIONS: &[&str] = &["", "public", "dist"];

#[derive(Args)]
pub struct ValidateArgs {
    /// manifest.json file or extension project directory
    #[arg(default_value = ".")]
    path: PathBuf,

    /// Treat warnings as errors
    #[arg(long)]
    strict: bool,
}

pub async fn execute(args: ValidateArgs) -> Result<()> {
    let manifest_path = locate_manifest(&args.path)?;
    info!("Validating {:?}", manifest_path);

    let validator = SchemaValidator::new().context("Failed to load manifest schema")?;
    let report = validator
        .validate_file(&manifest_path)
        .with_context(|| format!("Failed to validate {}", manifest_path.display()))?;

    println!("📋 {}", manifest_path.display());
    for warning in &report.warnings {
        println!("   ⚠️  {}", warning);
    }

    let failures = report.errors.len() + if args.strict { report.warnings.len() } else { 0 };
    if failures == 0 {
        println!("   ✅ Valid Manifest V3");
        return Ok(());
    }

    for error in &report.errors {
        println!("   ❌ {}", error);
    }
    Err(CommandError::ValidationFailed {
        file: manifest_path.display().to_string(),
        errors: failures,
    }
    .into())
}

/// Resolve `path` to a manifest file.
fn locate_manifest(path: &Path) -> Result<PathBuf> {
    if path.is_file() {
        return Ok(path.to_path_buf());
    }
    if path.is_dir() {
        if let Some(found) = MANIFEST_LOCATIONS
            .iter()
            .map(|dir| path.join(dir).join(MANIFEST_FILE_NAME))
            .find(|candidate| candidate.is_file())
        {
            return Ok(found);
        }
    }
    Err(CommandError::InvalidArgument(format!(
        "No {} found at {}",
        MANIFEST_FILE_NAME,
        path.display()
    ))
    .into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    const VALID: &str = r#"{"manifest_version": 3, "name": "x", "version": "1.0"}"#;

    #[test]
    fn test_locate_manifest() {
        let temp = tempdir().unwrap();
        assert!(locate_manifest(temp.path()).is_err());

        fs::create_dir_all(temp.path().join("public")).unwrap();
        fs::write(temp.path().join("public/manifest.json"), VALID).unwrap();
        assert_eq!(
            locate_manifest(temp.path()).unwrap(),
            temp.path().join("public/manifest.json")
        );

        fs::write(temp.path().join("manifest.json"), VALID).unwrap();
        assert_eq!(
            locate_manifest(temp.path()).unwrap(),
            temp.path().join("manifest.json")
        );
    }

    #[tokio::test]
    async fn test_validate_outcomes() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("manifest.json");
        fs::write(&path, VALID).unwrap();

        let lenient = ValidateArgs {
            path: path.clone(),
            strict: false,
        };
        assert!(execute(lenient).await.is_ok());

        // Missing description and icons become failures.
        let strict = ValidateArgs {
            path: path.clone(),
            strict: true,
        };
        let err = execute(strict).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CommandError>(),
            Some(CommandError::ValidationFailed { errors: 2, .. })
        ));

        fs::write(&path, r#"{"manifest_version": 2}"#).unwrap();
        let invalid = ValidateArgs {
            path,
            strict: false,
        };
        assert!(execute(invalid).await.is_err());
    }
}
