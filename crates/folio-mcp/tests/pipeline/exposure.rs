//! Exposure resolution and the tool set it produces.

use super::common::*;
use folio_core::{FolioConfig, Operation, OperationSet};
use folio_mcp::exposure;
use folio_mcp::tools::ToolRegistry;
use serde_json::json;

fn registry_for(yaml: &str) -> ToolRegistry {
    let config = FolioConfig::from_yaml(yaml).expect("fixture config parses");
    ToolRegistry::build(exposure::resolve(&content_types(), &config.exposure, &config.defaults))
}

pub fn test_resolution_is_idempotent() {
    println!("  🧪 test_resolution_is_idempotent");
    let config = FolioConfig::from_yaml("defaults: { list: true, get: true, create: true }").unwrap();
    let first = ToolRegistry::build(exposure::resolve(&content_types(), &config.exposure, &config.defaults));
    let second = ToolRegistry::build(exposure::resolve(&content_types(), &config.exposure, &config.defaults));
    assert_eq!(first.names(), second.names());
    assert_eq!(first.definitions(), second.definitions());
    println!("     ✓ identical inputs give identical tools");
}

pub fn test_internal_types_are_never_exposed() {
    println!("  🧪 test_internal_types_are_never_exposed");
    let ctx = TestContext::new();
    assert!(ctx.registry.names().iter().all(|n| !n.starts_with("payload-")));

    let registry = registry_for("collections: [payload-preferences, article]\nglobals: []");
    assert_eq!(registry.names(), ["article_list", "article_get"]);
    println!("     ✓ CMS-internal collections skipped in both modes");
}

pub fn test_singleton_operations_are_clamped() {
    println!("  🧪 test_singleton_operations_are_clamped");
    let registry = registry_for(
        r#"
collections: []
globals:
  - slug: site-settings
    operations: { list: true, create: true, update: true, delete: true }
"#,
    );
    assert_eq!(registry.names(), ["site-settings_get", "site-settings_update"]);

    let analyses = exposure::resolve(
        &content_types(),
        &FolioConfig::default().exposure,
        &OperationSet::all(),
    );
    for analysis in analyses.iter().filter(|a| a.is_global) {
        assert!(
            analysis
                .operations
                .enabled()
                .iter()
                .all(|op| matches!(op, Operation::Get | Operation::Update))
        );
    }
    println!("     ✓ globals only ever get and update");
}

pub fn test_misconfigured_entries_are_skipped() {
    println!("  🧪 test_misconfigured_entries_are_skipped");
    let registry = registry_for(
        r#"
collections:
  - ghost
  - slug: article
    toolPrefix: post
    excludeFields: [seo.description]
  - article
globals: [missing-global]
"#,
    );
    assert_eq!(registry.names(), ["post_list", "post_get"]);

    let tool = registry.get("post_get").unwrap();
    assert!(tool.analysis.field("seo.title").is_some());
    assert!(tool.analysis.field("seo.description").is_none());
    println!("     ✓ unknown and duplicate entries dropped, the rest resolved");
}

pub fn test_groups_are_flattened() {
    println!("  🧪 test_groups_are_flattened");
    let ctx = TestContext::new();
    let tool = ctx.registry.get("article_create").unwrap();
    let names: Vec<&str> = tool.analysis.fields.iter().map(|f| f.name.as_str()).collect();
    assert!(names.contains(&"seo.title"));
    assert!(names.contains(&"seo.description"));
    assert!(!names.contains(&"seo"));
    println!("     ✓ seo → seo.title, seo.description");
}

pub fn test_advertised_schema_agrees_with_validator() {
    println!("  🧪 test_advertised_schema_agrees_with_validator");
    let ctx = TestContext::new();
    let payloads = [
        json!({}),
        json!({ "id": "a1" }),
        json!({ "data": {} }),
        json!({ "data": { "title": "Hello" } }),
        json!({ "id": "a1", "data": { "title": "Hello" } }),
        json!({ "data": { "title": "ok", "status": "archived" } }),
        json!({ "data": { "title": "ok", "seo": { "title": "t" } } }),
        json!({ "id": "a1", "data": { "siteName": 1 } }),
        json!({ "data": { "siteName": "Folio" } }),
        json!({ "limit": 5, "page": 2, "sort": "-title" }),
        json!({ "limit": 0 }),
        json!({ "bogus": true }),
    ];

    let mut checked = 0;
    for tool in ctx.registry.list() {
        let schema = &tool.descriptor.input_schema;
        let compiled = jsonschema::validator_for(schema)
            .unwrap_or_else(|e| panic!("{} schema compiles: {}", tool.descriptor.name, e));
        for payload in &payloads {
            let ours = tool.descriptor.validator.validate(payload.clone()).is_ok();
            let theirs = compiled.is_valid(payload);
            assert_eq!(
                ours, theirs,
                "{} disagrees on {}: validator={}, schema={}",
                tool.descriptor.name, payload, ours, theirs
            );
            checked += 1;
        }
    }
    println!("     ✓ {} tool/payload pairs agree", checked);
}

pub fn run_all_tests() {
    println!("\n🧭 Exposure");
    test_resolution_is_idempotent();
    test_internal_types_are_never_exposed();
    test_singleton_operations_are_clamped();
    test_misconfigured_entries_are_skipped();
    test_groups_are_flattened();
    test_advertised_schema_agrees_with_validator();
}
