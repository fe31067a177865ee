//! Scope enforcement and the operation context handed to the store.

use super::common::*;
use folio_auth::AuthContext;
use folio_mcp::InMemoryStore;
use folio_mcp::store::OperationContext;
use serde_json::json;

fn seeded() -> TestContext {
    TestContext::with_store(
        InMemoryStore::new().with_documents("article", vec![json!({ "id": "a1", "title": "Seeded" })]),
    )
}

pub async fn test_read_scope_denies_writes() {
    println!("  🧪 test_read_scope_denies_writes");
    let ctx = seeded();
    let reader = article_reader();

    let result = ctx
        .call("article_create", json!({ "data": { "title": "Nope" } }), Some(&reader))
        .await;
    assert_error_kind(&result, "scope_denied", "read scope on create");
    assert_eq!(ctx.store.call_count(), 0);

    let result = ctx.call("article_list", json!({}), Some(&reader)).await;
    assert_success(&result, "read scope on list");
    assert_eq!(result.structured["totalDocs"], 1);
    println!("     ✓ collections:article:read lists but cannot create");
}

pub async fn test_denied_calls_never_reach_the_store() {
    println!("  🧪 test_denied_calls_never_reach_the_store");
    let ctx = seeded();
    let contexts = [
        AuthContext::new(Vec::<String>::new()),
        AuthContext::new(["collections:pages:*"]),
        AuthContext::new(["collections:article:get"]),
        AuthContext::new(["collections:site-settings:*"]),
    ];

    for auth in &contexts {
        for (tool, arguments) in [
            ("article_list", json!({})),
            ("article_update", json!({ "id": "a1", "data": { "title": "x" } })),
            ("article_delete", json!({ "id": "a1" })),
        ] {
            let err = ctx.execute(tool, arguments, Some(auth)).await.unwrap_err();
            assert_eq!(err.kind().as_str(), "scope_denied", "{} with {:?}", tool, auth.scopes);
        }
    }

    let err = ctx.execute("article_get", json!({ "id": "a1" }), None).await.unwrap_err();
    assert_eq!(err.kind().as_str(), "scope_denied");

    assert_eq!(ctx.store.call_count(), 0);
    assert_eq!(ctx.store.document_count("article").await, 1);
    println!("     ✓ no store call for any denied combination");
}

pub async fn test_operation_scope_and_wildcards() {
    println!("  🧪 test_operation_scope_and_wildcards");
    let ctx = seeded();

    let getter = AuthContext::new(["collections:article:get"]);
    let result = ctx.call("article_get", json!({ "id": "a1" }), Some(&getter)).await;
    assert_success(&result, "operation-level scope");

    let result = ctx
        .call("article_delete", json!({ "id": "a1" }), Some(&AuthContext::master()))
        .await;
    assert_success(&result, "master credential");

    let everything = AuthContext::new(["collections:*:*"]);
    let result = ctx
        .call("site-settings_update", json!({ "data": { "siteName": "x" } }), Some(&everything))
        .await;
    assert_success(&result, "wildcard on a global");
    println!("     ✓ operation, type and global wildcards honored");
}

pub async fn test_hook_context_identifies_the_caller() {
    println!("  🧪 test_hook_context_identifies_the_caller");
    let ctx = seeded();
    let auth = editor().with_user("u-42", Some("editor".into()));

    ctx.execute("article_update", json!({ "id": "a1", "data": { "title": "Edited" } }), Some(&auth))
        .await
        .unwrap();
    ctx.execute("article_get", json!({ "id": "a1" }), Some(&auth))
        .await
        .unwrap();

    let events = ctx.store.hook_events().await;
    assert_eq!(events.len(), 2);
    assert_eq!(events[0].operation, "update");
    assert_eq!(events[0].id.as_deref(), Some("a1"));

    let context: &OperationContext = &events[0].context;
    assert_eq!(context.source, OperationContext::SOURCE);
    assert!(context.trigger_hooks);
    assert_eq!(context.token_id.as_deref(), Some("tok_editor"));
    assert_eq!(context.user_id.as_deref(), Some("u-42"));
    assert_eq!(context.user_role.as_deref(), Some("editor"));
    assert_ne!(events[0].context.request_id, events[1].context.request_id);
    println!("     ✓ hooks see source=mcp and the caller's identity");
}

pub async fn run_all_tests() {
    println!("\n🔐 Scopes");
    test_read_scope_denies_writes().await;
    test_denied_calls_never_reach_the_store().await;
    test_operation_scope_and_wildcards().await;
    test_hook_context_identifies_the_caller().await;
}
