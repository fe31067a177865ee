//! Document store boundary.
//!
//! The executor never talks to the CMS directly; it goes through
//! [`DocumentStore`]. Every call carries an [`OperationContext`] so the
//! store's change hooks fire and can tell agent writes from editor writes.

mod memory;
mod rest;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use folio_auth::AuthContext;
use folio_core::StoreConfig;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

pub use memory::{HookEvent, InMemoryStore};
pub use rest::{CONTEXT_HEADER, RestStore};

/// Marker attached to every store call made on behalf of an agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationContext {
    /// Always `mcp`.
    pub source: String,
    pub trigger_hooks: bool,
    pub request_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_role: Option<String>,
}

impl OperationContext {
    pub const SOURCE: &'static str = "mcp";

    pub fn new() -> Self {
        Self {
            source: Self::SOURCE.to_string(),
            trigger_hooks: true,
            request_id: Uuid::new_v4(),
            token_id: None,
            user_id: None,
            user_role: None,
        }
    }

    /// Context carrying the caller's token and user identity.
    pub fn for_caller(auth: &AuthContext) -> Self {
        Self {
            token_id: auth.token_id.clone(),
            user_id: auth.user_id.clone(),
            user_role: auth.user_role.clone(),
            ..Self::new()
        }
    }
}

impl Default for OperationContext {
    fn default() -> Self {
        Self::new()
    }
}

/// Collection query.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FindQuery {
    pub filter: Option<Value>,
    pub sort: Option<String>,
    pub page: u64,
    pub limit: u64,
    pub depth: Option<u8>,
    /// Dot paths to return; `None` returns everything.
    pub select: Option<Vec<String>>,
    pub locale: Option<String>,
    pub draft: Option<bool>,
}

/// Options for single-document reads.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReadOptions {
    pub depth: Option<u8>,
    pub select: Option<Vec<String>>,
    pub locale: Option<String>,
    pub draft: Option<bool>,
}

/// Options for writes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WriteOptions {
    pub depth: Option<u8>,
    pub locale: Option<String>,
    pub draft: Option<bool>,
}

/// One page of a collection query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginatedDocs {
    pub docs: Vec<Value>,
    pub total_docs: u64,
    pub page: u64,
    pub limit: u64,
    pub total_pages: u64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
}

impl PaginatedDocs {
    pub fn new(docs: Vec<Value>, total_docs: u64, page: u64, limit: u64) -> Self {
        let total_pages = if limit == 0 {
            0
        } else {
            total_docs.div_ceil(limit)
        };
        Self {
            docs,
            total_docs,
            page,
            limit,
            total_pages,
            has_next_page: page < total_pages,
            has_prev_page: page > 1,
        }
    }
}

#[derive(Debug, Error)]
pub enum StoreError {
    /// The store rejected the call; the message is the store's own.
    #[error("{0}")]
    Upstream(String),

    #[error("store request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected store response: {0}")]
    InvalidResponse(String),

    #[error("invalid store request: {0}")]
    InvalidRequest(String),
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn find(
        &self,
        collection: &str,
        query: FindQuery,
        context: &OperationContext,
    ) -> Result<PaginatedDocs, StoreError>;

    async fn find_by_id(
        &self,
        collection: &str,
        id: &str,
        options: ReadOptions,
        context: &OperationContext,
    ) -> Result<Option<Value>, StoreError>;

    async fn create(
        &self,
        collection: &str,
        data: Map<String, Value>,
        options: WriteOptions,
        context: &OperationContext,
    ) -> Result<Value, StoreError>;

    /// `None` when no document has this id.
    async fn update(
        &self,
        collection: &str,
        id: &str,
        data: Map<String, Value>,
        options: WriteOptions,
        context: &OperationContext,
    ) -> Result<Option<Value>, StoreError>;

    /// Returns the deleted document, `None` when no document has this id.
    async fn delete(
        &self,
        collection: &str,
        id: &str,
        context: &OperationContext,
    ) -> Result<Option<Value>, StoreError>;

    async fn find_global(
        &self,
        slug: &str,
        options: ReadOptions,
        context: &OperationContext,
    ) -> Result<Value, StoreError>;

    async fn update_global(
        &self,
        slug: &str,
        data: Map<String, Value>,
        options: WriteOptions,
        context: &OperationContext,
    ) -> Result<Value, StoreError>;
}

/// Build the configured store.
pub fn from_config(config: &StoreConfig) -> Result<Arc<dyn DocumentStore>, StoreError> {
    match config {
        StoreConfig::Memory { seed_file } => {
            let store = match seed_file {
                Some(path) => InMemoryStore::from_seed_file(path)?,
                None => InMemoryStore::new(),
            };
            tracing::info!(seeded = seed_file.is_some(), "Using in-memory document store");
            Ok(Arc::new(store))
        }
        StoreConfig::Rest {
            base_url,
            api_key_env,
            timeout_secs,
        } => {
            let api_key = api_key_env.as_deref().and_then(|var| {
                let key = std::env::var(var).ok().filter(|k| !k.is_empty());
                if key.is_none() {
                    tracing::warn!(env = %var, "CMS API key variable is not set");
                }
                key
            });
            tracing::info!(base_url = %base_url, "Using CMS REST document store");
            Ok(Arc::new(RestStore::new(
                base_url.clone(),
                api_key,
                Duration::from_secs(*timeout_secs),
            )?))
        }
    }
}
