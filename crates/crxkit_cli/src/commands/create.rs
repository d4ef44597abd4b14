//! Create command - Create a new extension project from a template.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;
use tracing::{info, warn};

use crxkit_manifest::{ManifestValidator, SchemaValidator, MANIFEST_FILE_NAME};
use crxkit_templates::context::DEFAULT_VERSION;
use crxkit_templates::{RenderContext, RenderedFile, TemplateRenderer};

use super::{load_registry, unknown_template, CommandError};
use crate::writer;

#[derive(Args)]
pub struct CreateArgs {
    /// Name of the extension project to create
    name: String,

    /// Template to use
    #[arg(short, long, default_value = "vanilla")]
    template: String,

    /// Output directory (defaults to ./<name>)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Extension description
    #[arg(short, long)]
    description: Option<String>,

    /// Author written into README and package.json
    #[arg(long)]
    author: Option<String>,

    /// Initial extension version
    #[arg(long = "project-version", default_value = DEFAULT_VERSION)]
    project_version: String,

    /// Extra template variable as KEY=VALUE (repeatable)
    #[arg(long = "var", value_name = "KEY=VALUE", value_parser = parse_key_val)]
    vars: Vec<(String, String)>,

    /// Replace a non-empty output directory
    #[arg(long)]
    force: bool,

    /// Skip manifest.json validation
    #[arg(long)]
    skip_validation: bool,
}

pub async fn execute(args: CreateArgs, templates_dir: &Path) -> Result<()> {
    info!("Creating extension: {}", args.name);
    validate_name(&args.name)?;
    check_json_safe("name", &args.name)?;
    check_json_safe("project version", &args.project_version)?;
    if let Some(description) = &args.description {
        check_json_safe("description", description)?;
    }

    let current_dir = std::env::current_dir()?;
    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| current_dir.join(&args.name));

    if !args.force && is_non_empty_dir(&output_path)? {
        return Err(CommandError::InvalidArgument(format!(
            "Output directory is not empty: {} (use --force to replace it)",
            output_path.display()
        ))
        .into());
    }

    let registry = load_registry(templates_dir)?;
    let template = registry
        .get_with_base(&args.template)
        .ok_or_else(|| unknown_template(&args.template, &registry))?;
    info!("Using template: {} ({})", template.name, template.id);

    let context = build_context(&args);
    let files_root = template.files_root.clone();
    let base_root = registry.base_files_root(&template.id).map(Path::to_path_buf);

    let files = tokio::task::spawn_blocking(move || {
        TemplateRenderer::new().render_with_inheritance(&files_root, base_root.as_deref(), &context)
    })
    .await
    .context("Render task failed")?
    .context("Failed to render template")?;

    if args.skip_validation {
        warn!("Skipping manifest validation");
    } else {
        validate_manifests(&files)?;
    }

    let written = writer::write_project(&files, &output_path, args.force)
        .with_context(|| format!("Failed to write project to {}", output_path.display()))?;

    println!("✅ Extension '{}' created from the {} template!", args.name, template.name);
    println!();
    println!("Location: {}", output_path.display());
    println!("Files:    {}", written.len());
    println!();
    println!("Next steps:");
    println!("  cd {}", output_path.display());
    println!("  npm install");
    for script in ["dev", "build", "zip"] {
        if let Some(command) = template.scripts.get(script) {
            println!("  npm run {:<6} # {}", script, command);
        }
    }

    Ok(())
}

/// Render context for the new project.
fn build_context(args: &CreateArgs) -> RenderContext {
    let mut context = RenderContext::for_project(&args.name)
        .with_version(&args.project_version)
        .with_variable("year", chrono::Local::now().format("%Y").to_string());
    if let Some(description) = &args.description {
        context = context.with_description(description);
    }
    if let Some(author) = &args.author {
        context = context.with_author(author);
    }
    context.with_variables(args.vars.iter().cloned())
}

/// Check every rendered manifest.json and print the outcome.
fn validate_manifests(files: &[RenderedFile]) -> Result<()> {
    let validator = SchemaValidator::new().context("Failed to load manifest schema")?;

    for file in files
        .iter()
        .filter(|f| f.path.file_name() == MANIFEST_FILE_NAME)
    {
        let Some(content) = file.as_text() else {
            warn!("{} is not text; skipping validation", file.path);
            continue;
        };

        let report = validator.validate_str(content);
        for warning in &report.warnings {
            println!("⚠️  {}: {}", file.path, warning);
        }
        if !report.valid {
            println!("❌ {} failed Manifest V3 validation:", file.path);
            for error in &report.errors {
                println!("   - {}", error);
            }
            return Err(CommandError::ValidationFailed {
                file: file.path.to_string(),
                errors: report.errors.len(),
            }
            .into());
        }
    }

    Ok(())
}

fn validate_name(name: &str) -> Result<()> {
    let trimmed = name.trim();
    if trimmed.is_empty() || trimmed == "." || trimmed == ".." || trimmed.contains(['/', '\\']) {
        return Err(
            CommandError::InvalidArgument(format!("Invalid project name: '{}'", name)).into(),
        );
    }
    Ok(())
}

/// Values substituted into JSON string literals (`package.json`,
/// `manifest.json`) must not need escaping.
fn check_json_safe(field: &str, value: &str) -> Result<()> {
    if let Some(c) = value.chars().find(|c| *c == '"' || *c == '\\' || c.is_control()) {
        return Err(CommandError::InvalidArgument(format!(
            "{} must not contain {:?}",
            field, c
        ))
        .into());
    }
    Ok(())
}

fn is_non_empty_dir(path: &Path) -> Result<bool> {
    if !path.exists() {
        return Ok(false);
    }
    if !path.is_dir() {
        return Err(CommandError::InvalidArgument(format!(
            "Output path exists and is not a directory: {}",
            path.display()
        ))
        .into());
    }
    Ok(fs::read_dir(path)?.next().is_some())
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{}'", s))?;
    let key = key.trim();
    if key.is_empty() || !key.chars().all(|c| c.is_alphanumeric() || c == '_') {
        return Err(format!("invalid variable name '{}'", key));
    }
    Ok((key.to_string(), value.to_string()))
}
