//! Tool scenarios against the Article collection and the site-settings global.

use super::common::*;
use serde_json::{Value, json};

fn without_timestamps(mut doc: Value) -> Value {
    if let Some(map) = doc.as_object_mut() {
        map.remove("id");
        map.remove("createdAt");
        map.remove("updatedAt");
    }
    doc
}

// =============================================================================
// CREATE
// =============================================================================

pub async fn test_create_requires_title() {
    println!("  🧪 test_create_requires_title");
    let ctx = TestContext::new();

    let result = ctx.call("article_create", json!({ "data": {} }), Some(&editor())).await;
    assert_error_kind(&result, "validation_error", "missing title");
    assert_eq!(result.structured["error"]["field"], "data.title");
    assert_eq!(ctx.store.call_count(), 0);

    let result = ctx
        .call("article_create", json!({ "data": { "title": "Hello" } }), Some(&editor()))
        .await;
    assert_success(&result, "title only");
    assert_eq!(result.structured["title"], "Hello");
    assert!(result.structured["id"].is_string());

    println!("     ✓ {{}} rejected, {{title}} accepted");
}

pub async fn test_string_encoded_data() {
    println!("  🧪 test_string_encoded_data");
    let ctx = TestContext::new();

    let encoded = ctx
        .execute("article_create", json!({ "data": "{\"title\":\"Hi\"}" }), Some(&editor()))
        .await
        .expect("string-encoded data is accepted");
    let parsed = ctx
        .execute("article_create", json!({ "data": { "title": "Hi" } }), Some(&editor()))
        .await
        .expect("object data is accepted");

    assert_eq!(without_timestamps(encoded), without_timestamps(parsed));
    assert_eq!(ctx.store.document_count("article").await, 2);

    let result = ctx
        .call("article_create", json!({ "data": "{not json" }), Some(&editor()))
        .await;
    assert_error_kind(&result, "validation_error", "undecodable data");

    println!("     ✓ encoded and parsed data behave identically");
}

pub async fn test_constraints_are_enforced() {
    println!("  🧪 test_constraints_are_enforced");
    let ctx = TestContext::new();

    let cases = [
        (json!({ "title": "x".repeat(201) }), "data.title"),
        (json!({ "title": "ok", "status": "archived" }), "data.status"),
        (json!({ "title": "ok", "seo": { "title": 3 } }), "data.seo.title"),
        (json!({ "title": "ok", "sections": [{ "blockType": "video" }] }), "data.sections[0].blockType"),
    ];
    for (data, field) in cases {
        let result = ctx.call("article_create", json!({ "data": data }), Some(&editor())).await;
        assert_error_kind(&result, "validation_error", field);
        assert_eq!(result.structured["error"]["field"], field);
    }

    let result = ctx
        .call("article_list", json!({ "limit": 101 }), Some(&editor()))
        .await;
    assert_error_kind(&result, "validation_error", "limit over maximum");

    let result = ctx
        .call("article_get", json!({ "id": "x", "page": 2 }), Some(&editor()))
        .await;
    assert_error_kind(&result, "validation_error", "get takes no pagination");

    assert_eq!(ctx.store.call_count(), 0);
    println!("     ✓ every constraint rejected before the store");
}

// =============================================================================
// READ / UPDATE / DELETE
// =============================================================================

pub async fn test_crud_lifecycle() {
    println!("  🧪 test_crud_lifecycle");
    let ctx = TestContext::new();
    let auth = editor();

    let created = ctx
        .execute(
            "article_create",
            json!({ "data": { "title": "Draft post", "status": "draft", "seo": { "title": "SEO" } } }),
            Some(&auth),
        )
        .await
        .unwrap();
    let id = created["id"].as_str().unwrap().to_string();
    ctx.execute(
        "article_create",
        json!({ "data": { "title": "Live post", "status": "published" } }),
        Some(&auth),
    )
    .await
    .unwrap();

    let updated = ctx
        .execute(
            "article_update",
            json!({ "id": id, "data": { "seo": { "description": "About drafts" } } }),
            Some(&auth),
        )
        .await
        .unwrap();
    assert_eq!(updated["title"], "Draft post");
    assert_eq!(updated["seo"]["title"], "SEO");
    assert_eq!(updated["seo"]["description"], "About drafts");

    let page = ctx
        .execute(
            "article_list",
            json!({ "where": { "status": { "equals": "published" } } }),
            Some(&auth),
        )
        .await
        .unwrap();
    assert_eq!(page["totalDocs"], 1);
    assert_eq!(page["docs"][0]["title"], "Live post");

    let page = ctx
        .execute(
            "article_list",
            json!({ "sort": "-title", "limit": 1, "page": 2, "fields": ["title"] }),
            Some(&auth),
        )
        .await
        .unwrap();
    assert_eq!(page["totalPages"], 2);
    assert_eq!(page["docs"][0], json!({ "id": id, "title": "Draft post" }));

    let deleted = ctx
        .execute("article_delete", json!({ "id": id }), Some(&auth))
        .await
        .unwrap();
    assert_eq!(deleted, json!({ "id": id, "deleted": true }));

    let result = ctx.call("article_get", json!({ "id": id }), Some(&auth)).await;
    assert_success(&result, "missing document is not a failure");
    assert_eq!(result.structured["found"], false);

    let result = ctx
        .call("article_update", json!({ "id": id, "data": { "title": "x" } }), Some(&auth))
        .await;
    assert_eq!(result.structured["found"], false);

    println!("     ✓ create, update, list, delete, not-found");
}

pub async fn test_unknown_filter_operator_is_upstream_error() {
    println!("  🧪 test_unknown_filter_operator_is_upstream_error");
    let ctx = TestContext::new();
    let result = ctx
        .call("article_list", json!({ "where": { "title": { "equals": "x", "regex": "x" } } }), Some(&editor()))
        .await;
    assert_error_kind(&result, "upstream_error", "unknown operator");
    println!("     ✓ store failure propagated with its message");
}

// =============================================================================
// GLOBALS
// =============================================================================

pub async fn test_global_get_and_update() {
    println!("  🧪 test_global_get_and_update");
    let ctx = TestContext::new();
    let auth = editor();

    let empty = ctx.execute("site-settings_get", json!({}), Some(&auth)).await.unwrap();
    assert_eq!(empty, json!({}));

    ctx.execute(
        "site-settings_update",
        json!({ "data": { "siteName": "Folio", "footer": "Made with *care*" } }),
        Some(&auth),
    )
    .await
    .unwrap();

    let settings = ctx.execute("site-settings_get", json!({}), Some(&auth)).await.unwrap();
    assert_eq!(settings["siteName"], "Folio");
    assert_eq!(settings["footer"], "Made with *care*");

    assert!(ctx.registry.get("site-settings_list").is_none());
    assert!(ctx.registry.get("site-settings_delete").is_none());
    println!("     ✓ singleton read and patched");
}

pub async fn test_huge_page_number_is_empty_page() {
    println!("  🧪 test_huge_page_number_is_empty_page");
    let ctx = TestContext::new();
    ctx.execute("article_create", json!({ "data": { "title": "Only" } }), Some(&editor()))
        .await
        .unwrap();

    let result = ctx
        .call("article_list", json!({ "page": 9223372036854775807u64, "limit": 10 }), Some(&editor()))
        .await;
    assert_success(&result, "page past the end");
    assert_eq!(result.structured["docs"], json!([]));
    assert_eq!(result.structured["totalDocs"], 1);
    println!("     ✓ no overflow, just an empty page");
}

pub async fn run_all_tests() {
    println!("\n📦 Scenarios");
    test_create_requires_title().await;
    test_string_encoded_data().await;
    test_constraints_are_enforced().await;
    test_crud_lifecycle().await;
    test_unknown_filter_operator_is_upstream_error().await;
    test_huge_page_number_is_empty_page().await;
    test_global_get_and_update().await;
}
