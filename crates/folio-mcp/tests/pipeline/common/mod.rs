//! Shared test infrastructure for the Folio pipeline tests.
//!
//! This module provides:
//! - the content types every scenario runs against
//! - a [`TestContext`] wiring exposure, registry, executor and an in-memory store
//! - credential fixtures and assertion helpers

#![allow(dead_code)]

use std::sync::Arc;

use folio_auth::AuthContext;
use folio_core::{ContentTypeSet, EditorProfile, ExposureConfig, OperationSet};
use folio_mcp::executor::{ExecutionResult, ScopedExecutor};
use folio_mcp::richtext::{ProfileCache, RichTextBridge};
use folio_mcp::store::InMemoryStore;
use folio_mcp::tools::ToolRegistry;
use folio_mcp::{ToolError, exposure};
use serde_json::Value;

// =============================================================================
// CONTENT TYPES
// =============================================================================

pub const CONTENT_TYPES: &str = r#"
collections:
  - slug: article
    labels: { singular: Article, plural: Articles }
    fields:
      - { name: title, type: text, required: true, maxLength: 200 }
      - { name: body, type: richText }
      - name: seo
        type: group
        fields:
          - { name: title, type: text }
          - { name: description, type: textarea }
      - name: status
        type: select
        defaultValue: draft
        options: [draft, published]
      - name: sections
        type: blocks
        blocks:
          - slug: prose
            fields:
              - { name: content, type: richText }
          - slug: quote
            fields:
              - { name: text, type: text }
  - slug: payload-preferences
    fields:
      - { name: key, type: text }
globals:
  - slug: site-settings
    fields:
      - { name: siteName, type: text }
      - { name: footer, type: richText }
"#;

pub const LIST_TRUNCATE: usize = 200;

pub fn content_types() -> ContentTypeSet {
    ContentTypeSet::from_yaml(CONTENT_TYPES).expect("fixture content types parse")
}

// =============================================================================
// TEST CONTEXT
// =============================================================================

pub struct TestContext {
    pub store: Arc<InMemoryStore>,
    pub registry: ToolRegistry,
    pub executor: ScopedExecutor,
}

impl TestContext {
    /// Every type exposed with every operation, backed by an empty store.
    pub fn new() -> Self {
        Self::with_store(InMemoryStore::new())
    }

    pub fn with_store(store: InMemoryStore) -> Self {
        let analyses = exposure::resolve(&content_types(), &ExposureConfig::default(), &OperationSet::all());
        let registry = ToolRegistry::build(analyses);
        let store = Arc::new(store);
        let bridge = Arc::new(RichTextBridge::new(
            ProfileCache::fixed(EditorProfile::default()),
            Some(LIST_TRUNCATE),
        ));
        let executor = ScopedExecutor::new(store.clone(), bridge);
        Self {
            store,
            registry,
            executor,
        }
    }

    /// Run a tool and return the raw outcome.
    pub async fn execute(&self, tool: &str, arguments: Value, auth: Option<&AuthContext>) -> Result<Value, ToolError> {
        let registered = self
            .registry
            .get(tool)
            .unwrap_or_else(|| panic!("tool {} is registered", tool));
        self.executor
            .execute(&registered.descriptor, arguments, auth, &registered.analysis)
            .await
    }

    /// Run a tool and return the caller-facing result.
    pub async fn call(&self, tool: &str, arguments: Value, auth: Option<&AuthContext>) -> ExecutionResult {
        let registered = self
            .registry
            .get(tool)
            .unwrap_or_else(|| panic!("tool {} is registered", tool));
        self.executor
            .call(&registered.descriptor, arguments, auth, &registered.analysis)
            .await
    }
}

// =============================================================================
// CREDENTIALS
// =============================================================================

pub fn editor() -> AuthContext {
    AuthContext::new(["collections:article:*", "collections:site-settings:*"]).with_token_id("tok_editor")
}

pub fn article_reader() -> AuthContext {
    AuthContext::new(["collections:article:read"]).with_token_id("tok_reader")
}

// =============================================================================
// ASSERTIONS
// =============================================================================

pub fn assert_success(result: &ExecutionResult, message: &str) {
    assert!(
        result.success,
        "{}: expected success, got {:?}",
        message, result.error
    );
}

pub fn assert_error_kind(result: &ExecutionResult, kind: &str, message: &str) {
    assert!(!result.success, "{}: expected failure, got {}", message, result.structured);
    assert_eq!(result.structured["error"]["kind"], kind, "{}", message);
}
