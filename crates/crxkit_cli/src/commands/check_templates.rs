//! Check-templates command - Run structural checks on templates.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use tracing::info;

use crxkit_templates::{RenderContext, TemplateLoader, TemplateRenderer};

use super::{load_registry, unknown_template, CommandError};

#[derive(Args)]
pub struct CheckTemplatesArgs {
    /// Specific template to check (checks all if not specified)
    #[arg(short, long)]
    template: Option<String>,

    /// Also render each template with sample values
    #[arg(long)]
    render: bool,
}

pub async fn execute(args: CheckTemplatesArgs, templates_dir: &Path) -> Result<()> {
    info!("Checking templates in {:?}", templates_dir);

    let registry = load_registry(templates_dir)?;
    let loader = TemplateLoader::new(templates_dir);

    let templates = match &args.template {
        Some(id) => vec![registry
            .get(id)
            .ok_or_else(|| unknown_template(id, &registry))?],
        None => registry.list(),
    };

    if templates.is_empty() {
        println!("⚠️  No templates found to check");
        return Ok(());
    }

    println!("🧪 Checking {} template(s)...\n", templates.len());

    let context = RenderContext::for_project("crxkit-check");
    let renderer = TemplateRenderer::new();
    let mut failed = 0;

    for template in &templates {
        let Some(template_dir) = template.files_root.parent() else {
            continue;
        };
        let mut issues = loader
            .validate_template(template_dir, &registry)
            .with_context(|| format!("Failed to check {}", template.id))?;

        if args.render && issues.is_empty() {
            if let Err(e) = renderer.render_with_inheritance(
                &template.files_root,
                registry.base_files_root(&template.id),
                &context,
            ) {
                issues.push(format!("Render failed: {}", e));
            }
        }

        if issues.is_empty() {
            println!("  ✅ {}", template.id);
        } else {
            failed += 1;
            println!("  ❌ {}", template.id);
            for issue in issues {
                println!("     - {}", issue);
            }
        }
    }

    println!();
    println!(
        "Results: {} passed, {} failed",
        templates.len() - failed,
        failed
    );

    if failed > 0 {
        return Err(CommandError::TemplateIssues(failed).into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_shipped_templates_pass() {
        let templates = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../templates");
        let args = CheckTemplatesArgs {
            template: None,
            render: true,
        };
        assert!(execute(args, &templates).await.is_ok());
    }

    #[tokio::test]
    async fn test_broken_template_reported() {
        let temp = tempdir().unwrap();
        let dir = temp.path().join("solid");
        fs::create_dir_all(&dir).unwrap();
        fs::write(
            dir.join("template.yaml"),
            "id: solid\nname: Solid\nextends: missing\n",
        )
        .unwrap();

        let args = CheckTemplatesArgs {
            template: Some("solid".to_string()),
            render: false,
        };
        let err = execute(args, temp.path()).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CommandError>(),
            Some(CommandError::TemplateIssues(1))
        ));
    }
}
