//! `folio check` - load the configuration and report what would be served.

use std::path::Path;

use anyhow::{Context, Result};
use folio_core::{Operation, StoreConfig};
use folio_mcp::store;

use super::{build_registry, build_resolver, load_config};

pub fn run(config_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;
    println!("🔍 Checking {}", config_path.display());
    println!("   Project: {}", config.project_name());
    println!(
        "   Registered: {} collections, {} globals",
        config.content_types.collections.len(),
        config.content_types.globals.len()
    );

    let registry = build_registry(&config);
    let mut last_type = None;
    for tool in registry.list() {
        let analysis = &tool.analysis;
        if last_type != Some(analysis.slug.as_str()) {
            let kind = if analysis.is_global { "global" } else { "collection" };
            let ops: Vec<&str> = analysis.operations.enabled().iter().map(Operation::as_str).collect();
            println!("\n   📄 {} ({}): {}", analysis.slug, kind, ops.join(", "));
            last_type = Some(analysis.slug.as_str());
        }
        println!("      • {}", tool.descriptor.name);
    }

    build_resolver(&config)?;
    match &config.store {
        StoreConfig::Memory { .. } => println!("\n   Store: in-memory"),
        StoreConfig::Rest { base_url, .. } => println!("\n   Store: REST at {}", base_url),
    }
    store::from_config(&config.store).context("Document store configuration is invalid")?;

    if registry.is_empty() {
        println!("\n⚠️  No tools would be served");
    } else {
        println!("\n✅ {} tools", registry.len());
    }
    Ok(())
}
