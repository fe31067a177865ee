//! Markdown on the wire, editor trees in the store.

use super::common::*;
use folio_core::EditorProfile;
use folio_mcp::InMemoryStore;
use folio_mcp::richtext::{to_storage_format, to_wire_format};
use serde_json::{Value, json};

fn normalize(markdown: &str) -> String {
    markdown
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

pub async fn test_markdown_round_trip() {
    println!("  🧪 test_markdown_round_trip");
    let profile = EditorProfile::default();
    let samples = [
        "Plain paragraph.",
        "# Heading\n\nBody with **bold**, *italic* and `code`.",
        "## Second level\n\n### Third level",
        "- one\n- two\n- three",
        "1. first\n2. second",
        "> quoted line",
        "A [link](https://example.com/docs) inline.",
        "```rust\nfn main() {}\n```",
        "~~gone~~ but not forgotten",
        "Before\n\n---\n\nAfter",
        "Literal \\* star and \\_ underscore",
        "\\# not a heading",
        "\\> not a quote",
        "\\- not a list\n\\+ nor this",
        "1\\. not a list either",
        "> run it\n> ```sh\n> make\n> ```",
        "- step\n  ```rust\n  fn main() {}\n  ```",
    ];
    for markdown in samples {
        let tree = to_storage_format(markdown, &profile);
        let rendered = to_wire_format(&tree).expect("tree renders");
        assert_eq!(normalize(&rendered), normalize(markdown), "round trip of {:?}", markdown);
    }
    println!("     ✓ {} samples survive markdown → tree → markdown", samples.len());
}

pub async fn test_stored_as_tree_returned_as_markdown() {
    println!("  🧪 test_stored_as_tree_returned_as_markdown");
    let ctx = TestContext::new();
    let body = "# Launch\n\nWe shipped **today**.";

    let created = ctx
        .execute(
            "article_create",
            json!({ "data": {
                "title": "Launch",
                "body": body,
                "sections": [
                    { "blockType": "prose", "content": "Block *prose*" },
                    { "blockType": "quote", "text": "plain text" }
                ]
            } }),
            Some(&editor()),
        )
        .await
        .unwrap();
    assert_eq!(created["body"], body);
    assert_eq!(created["sections"][0]["content"], "Block *prose*");

    let result = ctx
        .execute("article_list", json!({ "fields": ["body"] }), Some(&editor()))
        .await
        .unwrap();
    let id = result["docs"][0]["id"].as_str().unwrap().to_string();

    // The store holds the tree, not the markdown.
    let stored = raw_document(&ctx, &id).await;
    assert_eq!(stored["body"]["root"]["type"], "root");
    assert_eq!(stored["body"]["root"]["children"][0]["type"], "heading");
    assert_eq!(stored["sections"][0]["content"]["root"]["type"], "root");
    assert_eq!(stored["sections"][1]["text"], "plain text");
    println!("     ✓ trees stored, markdown returned (including inside blocks)");
}

async fn raw_document(ctx: &TestContext, id: &str) -> Value {
    use folio_mcp::store::{DocumentStore, OperationContext, ReadOptions};
    ctx.store
        .find_by_id("article", id, ReadOptions::default(), &OperationContext::new())
        .await
        .unwrap()
        .unwrap()
}

pub async fn test_block_rows_converted_at_depth_zero() {
    println!("  🧪 test_block_rows_converted_at_depth_zero");
    let row = to_storage_format("Row *text*", &EditorProfile::default());
    let ctx = TestContext::with_store(InMemoryStore::new().with_documents(
        "article",
        vec![json!({
            "id": "a1",
            "title": "Rows",
            "body": to_storage_format("top", &EditorProfile::default()),
            "sections": [ { "id": "r1", "blockType": "prose", "content": row } ]
        })],
    ));

    let fetched = ctx
        .execute("article_get", json!({ "id": "a1", "depth": 0 }), Some(&editor()))
        .await
        .unwrap();
    assert_eq!(fetched["body"], "top");
    assert_eq!(fetched["sections"][0]["content"], "Row *text*");

    let listed = ctx
        .execute("article_list", json!({ "depth": 0 }), Some(&editor()))
        .await
        .unwrap();
    assert_eq!(listed["docs"][0]["sections"][0]["content"], "Row *text*");
    println!("     ✓ rows with ids are not relation hops");
}

pub async fn test_structured_input_is_rejected() {
    println!("  🧪 test_structured_input_is_rejected");
    let ctx = TestContext::new();
    let tree = to_storage_format("already a tree", &EditorProfile::default());

    let result = ctx
        .call(
            "article_create",
            json!({ "data": { "title": "x", "body": tree } }),
            Some(&editor()),
        )
        .await;
    assert!(!result.success);
    assert_eq!(result.structured["error"]["field"], "data.body");
    assert_eq!(ctx.store.document_count("article").await, 0);

    let result = ctx
        .call("article_create", json!({ "data": { "title": "x", "body": null } }), Some(&editor()))
        .await;
    assert_success(&result, "null clears a rich-text field");
    println!("     ✓ only markdown strings (or null) accepted on write");
}

pub async fn test_list_truncates_get_does_not() {
    println!("  🧪 test_list_truncates_get_does_not");
    let long = "a".repeat(5000);
    let tree = to_storage_format(&long, &EditorProfile::default());
    let ctx = TestContext::with_store(
        InMemoryStore::new().with_documents("article", vec![json!({ "id": "long", "title": "Long", "body": tree })]),
    );

    let listed = ctx.execute("article_list", json!({}), Some(&editor())).await.unwrap();
    let listed_body = listed["docs"][0]["body"].as_str().unwrap();
    assert!(listed_body.chars().count() <= LIST_TRUNCATE + 3);
    assert_eq!(listed_body.chars().count(), 203);
    assert!(listed_body.ends_with("..."));

    let fetched = ctx
        .execute("article_get", json!({ "id": "long" }), Some(&editor()))
        .await
        .unwrap();
    assert_eq!(fetched["body"].as_str().unwrap(), long);
    println!("     ✓ 5000 chars → 203 on list, 5000 on get");
}

pub async fn test_unreadable_tree_degrades_to_empty() {
    println!("  🧪 test_unreadable_tree_degrades_to_empty");
    let broken = json!({ "root": { "type": "root", "children": [{ "type": "paragraph", "children": "nope" }] } });
    let ctx = TestContext::with_store(
        InMemoryStore::new().with_documents("article", vec![json!({ "id": "b", "title": "Broken", "body": broken })]),
    );

    let fetched = ctx
        .execute("article_get", json!({ "id": "b" }), Some(&editor()))
        .await
        .unwrap();
    assert_eq!(fetched["title"], "Broken");
    assert_eq!(fetched["body"], "");
    println!("     ✓ partial result kept, broken field blanked");
}

pub async fn run_all_tests() {
    println!("\n📝 Rich text");
    test_markdown_round_trip().await;
    test_stored_as_tree_returned_as_markdown().await;
    test_block_rows_converted_at_depth_zero().await;
    test_structured_input_is_rejected().await;
    test_list_truncates_get_does_not().await;
    test_unreadable_tree_degrades_to_empty().await;
}
