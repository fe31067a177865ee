//! API tokens and token stores.
//!
//! Tokens are never stored in clear: a record holds the SHA-256 hex digest of
//! the secret, and lookups hash the presented credential first.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tokio::sync::RwLock;

use crate::error::AuthError;

/// A stored API token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    pub id: String,

    /// SHA-256 hex digest of the token secret.
    pub token_hash: String,

    #[serde(default)]
    pub scopes: Vec<String>,

    #[serde(default)]
    pub expires_at: Option<DateTime<Utc>>,

    #[serde(default)]
    pub user_id: Option<String>,

    #[serde(default)]
    pub user_role: Option<String>,

    #[serde(default)]
    pub revoked: bool,
}

impl TokenRecord {
    /// Build a record from a clear-text secret.
    pub fn new<I, S>(id: impl Into<String>, secret: &str, scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            id: id.into(),
            token_hash: hash_token(secret),
            scopes: scopes.into_iter().map(Into::into).collect(),
            expires_at: None,
            user_id: None,
            user_role: None,
            revoked: false,
        }
    }

    pub fn with_expiry(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.map(|exp| exp <= now).unwrap_or(false)
    }
}

/// SHA-256 hex digest of a token secret.
pub fn hash_token(secret: &str) -> String {
    format!("{:x}", Sha256::digest(secret.as_bytes()))
}

/// Lookup of tokens by digest.
#[async_trait]
pub trait TokenStore: Send + Sync {
    /// Find a token by the digest of its secret. Revoked tokens are returned
    /// as-is; the resolver decides how to treat them.
    async fn find_by_hash(&self, token_hash: &str) -> Result<Option<TokenRecord>, AuthError>;
}

/// Token file layout.
#[derive(Debug, Default, Serialize, Deserialize)]
struct TokenFile {
    #[serde(default)]
    tokens: Vec<TokenRecord>,
}

/// In-process token store, loaded from a YAML file or built in code.
#[derive(Debug, Default)]
pub struct InMemoryTokenStore {
    tokens: RwLock<HashMap<String, TokenRecord>>,
}

impl InMemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_tokens(tokens: impl IntoIterator<Item = TokenRecord>) -> Self {
        let map = tokens
            .into_iter()
            .map(|t| (t.token_hash.clone(), t))
            .collect();
        Self {
            tokens: RwLock::new(map),
        }
    }

    /// Load tokens from a YAML file with a top-level `tokens` list.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, AuthError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    pub fn from_yaml(content: &str) -> Result<Self, AuthError> {
        let file: TokenFile = serde_yaml::from_str(content)?;
        for token in &file.tokens {
            let valid_digest = token.token_hash.len() == 64
                && token.token_hash.chars().all(|c| c.is_ascii_hexdigit());
            if !valid_digest {
                return Err(AuthError::InvalidRecord {
                    id: token.id.clone(),
                    reason: "token_hash must be a SHA-256 hex digest".to_string(),
                });
            }
        }
        tracing::debug!(count = file.tokens.len(), "Loaded API tokens");
        Ok(Self::with_tokens(file.tokens))
    }

    pub async fn insert(&self, record: TokenRecord) {
        self.tokens
            .write()
            .await
            .insert(record.token_hash.clone(), record);
    }

    /// Mark a token revoked by id. Returns false if no such token exists.
    pub async fn revoke(&self, id: &str) -> bool {
        let mut tokens = self.tokens.write().await;
        match tokens.values_mut().find(|t| t.id == id) {
            Some(record) => {
                record.revoked = true;
                true
            }
            None => false,
        }
    }

    pub async fn len(&self) -> usize {
        self.tokens.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.tokens.read().await.is_empty()
    }
}

#[async_trait]
impl TokenStore for InMemoryTokenStore {
    async fn find_by_hash(&self, token_hash: &str) -> Result<Option<TokenRecord>, AuthError> {
        Ok(self.tokens.read().await.get(token_hash).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_is_sha256_hex() {
        assert_eq!(
            hash_token("abc"),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_from_yaml_rejects_clear_text() {
        let yaml = "tokens:\n  - id: bad\n    token_hash: not-a-digest\n";
        assert!(matches!(
            InMemoryTokenStore::from_yaml(yaml),
            Err(AuthError::InvalidRecord { .. })
        ));
    }

    #[tokio::test]
    async fn test_lookup_and_revoke() {
        let store = InMemoryTokenStore::with_tokens([TokenRecord::new(
            "bot",
            "s3cret",
            ["collections:posts:read"],
        )]);
        let found = store.find_by_hash(&hash_token("s3cret")).await.unwrap();
        assert_eq!(found.map(|t| t.id), Some("bot".to_string()));

        assert!(store.revoke("bot").await);
        let found = store.find_by_hash(&hash_token("s3cret")).await.unwrap();
        assert!(found.unwrap().revoked);
        assert!(!store.revoke("ghost").await);
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tokens.yaml");
        let yaml = format!(
            "tokens:\n  - id: editor\n    token_hash: {}\n    scopes: [\"collections:*:*\"]\n    expires_at: 2030-01-01T00:00:00Z\n",
            hash_token("editor-secret")
        );
        fs::write(&path, yaml).unwrap();

        let store = InMemoryTokenStore::from_file(&path).unwrap();
        let runtime = tokio::runtime::Builder::new_current_thread()
            .build()
            .unwrap();
        let record = runtime
            .block_on(store.find_by_hash(&hash_token("editor-secret")))
            .unwrap()
            .unwrap();
        assert_eq!(record.scopes, vec!["collections:*:*"]);
        assert!(record.expires_at.is_some());
    }
}
