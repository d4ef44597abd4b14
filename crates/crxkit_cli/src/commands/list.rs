//! List command - Show available templates.

use std::path::Path;

use anyhow::Result;
use clap::Args;
use serde_json::json;
use tracing::info;

use super::load_registry;

#[derive(Args)]
pub struct ListArgs {
    /// Print as JSON
    #[arg(long)]
    json: bool,

    /// Filter by tag
    #[arg(long)]
    tag: Option<String>,
}

pub async fn execute(args: ListArgs, templates_dir: &Path) -> Result<()> {
    info!("Listing templates in {:?}", templates_dir);

    let registry = load_registry(templates_dir)?;
    let templates: Vec<_> = registry
        .list()
        .into_iter()
        .filter(|t| args.tag.as_ref().map_or(true, |tag| t.tags.contains(tag)))
        .collect();

    if args.json {
        let entries: Vec<_> = templates
            .iter()
            .map(|t| {
                json!({
                    "id": t.id,
                    "name": t.name,
                    "description": t.description,
                    "extends": t.extends,
                    "tags": t.tags,
                })
            })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(());
    }

    if templates.is_empty() {
        println!("⚠️  No templates found in {}", templates_dir.display());
        return Ok(());
    }

    println!("📦 Available templates:\n");
    for template in &templates {
        let extends = template
            .extends
            .as_deref()
            .map(|base| format!(" (extends {})", base))
            .unwrap_or_default();
        println!("  {:<10} {}{}", template.id, template.name, extends);
        if !template.description.is_empty() {
            println!("  {:<10} {}", "", template.description);
        }
    }
    println!();
    println!("Use: crxkit create <name> --template <id>");

    Ok(())
}
