//! Info command - Show a template with its inherited scripts and dependencies.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Result;
use clap::Args;
use serde_json::json;
use tracing::info;

use crxkit_templates::TemplateDescriptor;

use super::{load_registry, unknown_template};

#[derive(Args)]
pub struct InfoArgs {
    /// Template id
    template: String,

    /// Print as JSON
    #[arg(long)]
    json: bool,
}

pub async fn execute(args: InfoArgs, templates_dir: &Path) -> Result<()> {
    info!("Showing template: {}", args.template);

    let registry = load_registry(templates_dir)?;
    let template = registry
        .get_with_base(&args.template)
        .ok_or_else(|| unknown_template(&args.template, &registry))?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary(&template))?);
        return Ok(());
    }

    println!("📦 {} ({})", template.name, template.id);
    if !template.description.is_empty() {
        println!("   {}", template.description);
    }
    if let Some(base) = &template.extends {
        println!("   extends: {}", base);
    }
    if !template.tags.is_empty() {
        println!("   tags:    {}", template.tags.join(", "));
    }

    print_map("Scripts", &template.scripts);
    print_map("Dependencies", &template.dependency_map());
    print_map("Dev dependencies", &template.dev_dependency_map());

    Ok(())
}

fn summary(template: &TemplateDescriptor) -> serde_json::Value {
    json!({
        "id": template.id,
        "name": template.name,
        "description": template.description,
        "extends": template.extends,
        "tags": template.tags,
        "scripts": template.scripts,
        "dependencies": template.dependency_map(),
        "devDependencies": template.dev_dependency_map(),
    })
}

fn print_map(title: &str, map: &BTreeMap<String, String>) {
    if map.is_empty() {
        return;
    }
    println!();
    println!("{}:", title);
    for (key, value) in map {
        println!("  {:<24} {}", key, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::CommandError;

    fn templates() -> std::path::PathBuf {
        Path::new(env!("CARGO_MANIFEST_DIR")).join("../../templates")
    }

    #[test]
    fn test_summary_includes_inherited_entries() {
        let registry = load_registry(&templates()).unwrap();
        let template = registry.get_with_base("vue").unwrap();
        let summary = summary(&template);

        assert_eq!(summary["extends"], "base");
        assert!(summary["scripts"]["dev"].is_string());
        assert!(summary["scripts"]["build"].is_string());
        assert_eq!(summary["devDependencies"]["web-ext"], "^8.3.0");
        assert!(summary["dependencies"]["vue"].is_string());
    }

    #[tokio::test]
    async fn test_info_unknown_template() {
        let args = InfoArgs {
            template: "svelte".to_string(),
            json: false,
        };
        let err = execute(args, &templates()).await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<CommandError>(),
            Some(CommandError::InvalidArgument(_))
        ));
    }
}
