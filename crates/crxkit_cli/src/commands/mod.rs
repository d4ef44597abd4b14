//! CLI command definitions.
//!
//! Each subcommand maps to one step of the scaffolding workflow.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use thiserror::Error;

use crxkit_templates::{TemplateLoader, TemplateRegistry};

pub mod check_templates;
pub mod create;
pub mod info;
pub mod list;
pub mod validate;

/// crxkit - Chrome Manifest V3 extension scaffolding
#[derive(Parser)]
#[command(name = "crxkit")]
#[command(version, about = "crxkit - Chrome Manifest V3 extension scaffolding")]
#[command(long_about = r#"
crxkit generates Chrome Manifest V3 extension starter projects from framework
templates. Every template inherits shared tooling from the base template: a
browser auto-launch dev workflow, packaging scripts and README sections.

COMMANDS:
  create          → Create a new extension project from a template
  list            → List available templates
  info            → Show a template's merged scripts and dependencies
  validate        → Validate a manifest.json against Manifest V3
  check-templates → Verify all template directories are well-formed

EXIT CODES:
  0 - Success
  1 - General error
  2 - Invalid arguments
  3 - Validation failure
  4 - Template error
"#)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Templates directory
    #[arg(
        long,
        global = true,
        env = "CRXKIT_TEMPLATES_DIR",
        default_value = "templates"
    )]
    pub templates_dir: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Create a new extension project from a template
    Create(create::CreateArgs),

    /// List available templates
    List(list::ListArgs),

    /// Show merged metadata for a template
    Info(info::InfoArgs),

    /// Validate a manifest.json file or project directory
    Validate(validate::ValidateArgs),

    /// Run structural checks on all templates
    #[command(name = "check-templates")]
    CheckTemplates(check_templates::CheckTemplatesArgs),
}

/// Failures that map to a specific exit code.
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Validation failed for {file}: {errors} error(s)")]
    ValidationFailed { file: String, errors: usize },

    #[error("{0} template(s) failed checks")]
    TemplateIssues(usize),
}

/// Load the template registry once for the running command.
pub fn load_registry(templates_dir: &Path) -> Result<TemplateRegistry> {
    if !templates_dir.is_dir() {
        return Err(CommandError::InvalidArgument(format!(
            "Templates directory not found: {}",
            templates_dir.display()
        ))
        .into());
    }
    TemplateLoader::new(templates_dir)
        .load_all()
        .context("Failed to load templates")
}

/// Error for an unknown template id, listing what is available.
pub fn unknown_template(id: &str, registry: &TemplateRegistry) -> CommandError {
    let available: Vec<_> = registry.list().iter().map(|t| t.id.as_str()).collect();
    CommandError::InvalidArgument(format!(
        "Unknown template '{}'. Available: {}",
        id,
        available.join(", ")
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_create() {
        let cli = Cli::try_parse_from([
            "crxkit",
            "create",
            "tab-saver",
            "--template",
            "react",
            "--var",
            "homepage=https://example.com",
            "--templates-dir",
            "/opt/templates",
        ])
        .unwrap();
        assert_eq!(cli.templates_dir, PathBuf::from("/opt/templates"));
        assert!(matches!(cli.command, Commands::Create(_)));
    }

    #[test]
    fn test_verbose_conflicts_with_quiet() {
        assert!(Cli::try_parse_from(["crxkit", "-v", "-q", "list"]).is_err());
    }

    #[test]
    fn test_load_registry_missing_dir() {
        let temp = tempfile::tempdir().unwrap();
        let err = load_registry(&temp.path().join("nope")).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CommandError>(),
            Some(CommandError::InvalidArgument(_))
        ));
    }
}
