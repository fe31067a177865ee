//! Tools introspection commands.
//!
//! `folio tools list` - List the tools the configuration produces (offline).
//! `folio tools describe` - Show schemas and required scopes of one tool.

use std::path::Path;

use anyhow::{Result, bail};
use folio_mcp::RegisteredTool;

use super::{build_registry, load_config};

fn badges(tool: &RegisteredTool) -> Vec<&'static str> {
    let annotations = &tool.descriptor.annotations;
    let mut badges = Vec::new();
    if annotations.read_only == Some(true) {
        badges.push("read");
    } else {
        badges.push("write");
    }
    if annotations.destructive == Some(true) {
        badges.push("destructive");
    }
    if tool.descriptor.is_global {
        badges.push("global");
    }
    badges
}

/// Scopes any one of which permits the tool.
fn required_scopes(tool: &RegisteredTool) -> Vec<String> {
    let slug = &tool.descriptor.collection;
    let operation = tool.descriptor.operation;
    vec![
        folio_auth::ALL_COLLECTIONS.to_string(),
        format!("collections:{}:*", slug),
        format!("collections:{}:{}", slug, operation.class()),
        format!("collections:{}:{}", slug, operation),
    ]
}

/// List the tools generated from the configuration.
pub fn list(config_path: &Path, verbose: bool) -> Result<()> {
    let config = load_config(config_path)?;
    let registry = build_registry(&config);

    println!("\n🔧 Available Tools ({}):", registry.len());
    for tool in registry.list() {
        println!("   • {} ({})", tool.descriptor.name, badges(tool).join(", "));
        let summary = tool.descriptor.description.lines().next().unwrap_or_default();
        println!("     {}", summary);
        if verbose {
            println!(
                "     Schema: {}",
                serde_json::to_string_pretty(&tool.descriptor.input_schema)?
            );
        }
    }
    Ok(())
}

/// Describe one tool.
pub fn describe(config_path: &Path, tool_name: &str) -> Result<()> {
    let config = load_config(config_path)?;
    let registry = build_registry(&config);

    let Some(tool) = registry.get(tool_name) else {
        bail!(
            "Tool '{}' is not generated by this configuration. Available: {}",
            tool_name,
            registry.names().join(", ")
        );
    };

    println!("\n🔧 {}", tool.descriptor.name);
    println!("   Content type: {}", tool.descriptor.collection);
    println!("   Operation: {}", tool.descriptor.operation);
    println!("   Badges: {}", badges(tool).join(", "));
    println!("\n📝 Description:\n{}", tool.descriptor.description);
    println!("\n🔑 Any of these scopes permits it:");
    for scope in required_scopes(tool) {
        println!("   • {}", scope);
    }
    println!(
        "\n📥 Input schema:\n{}",
        serde_json::to_string_pretty(&tool.descriptor.input_schema)?
    );
    println!(
        "\n📤 Output schema:\n{}",
        serde_json::to_string_pretty(&tool.descriptor.output_schema)?
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::super::test_support::project;
    use super::*;
    use folio_auth::AuthContext;

    #[test]
    fn test_required_scopes_all_permit() {
        let (_dir, path) = project("defaults: { list: true, get: true, delete: true }");
        let config = load_config(&path).unwrap();
        let registry = build_registry(&config);
        let tool = registry.get("posts_delete").unwrap();

        assert_eq!(badges(tool), ["write", "destructive"]);
        for scope in required_scopes(tool) {
            assert!(
                AuthContext::new([scope.clone()]).permits("posts", tool.descriptor.operation),
                "{} should permit delete",
                scope
            );
        }
    }

    #[test]
    fn test_describe_unknown_tool() {
        let (_dir, path) = project("");
        assert!(describe(&path, "posts_delete").is_err());
        assert!(describe(&path, "posts_get").is_ok());
        assert!(list(&path, true).is_ok());
    }
}
