//! Bearer credential resolution.

use chrono::Utc;
use std::sync::Arc;

use crate::context::AuthContext;
use crate::error::AuthDenial;
use crate::token::{TokenStore, hash_token};

/// Resolves presented bearer credentials to authorization contexts.
///
/// The master credential, when configured, resolves to full wildcard scopes
/// without consulting the token store.
pub struct AuthResolver {
    /// Digest of the master credential.
    master_digest: Option<String>,
    store: Arc<dyn TokenStore>,
}

impl AuthResolver {
    pub fn new(store: Arc<dyn TokenStore>) -> Self {
        Self {
            master_digest: None,
            store,
        }
    }

    /// Set the master credential. Empty values are ignored.
    pub fn with_master_key(mut self, master_key: Option<String>) -> Self {
        self.master_digest = master_key.filter(|k| !k.is_empty()).map(|k| hash_token(&k));
        self
    }

    /// Resolve a raw `Authorization` header value.
    pub async fn resolve_header(&self, header: Option<&str>) -> Result<AuthContext, AuthDenial> {
        let token = match header {
            None => return Err(AuthDenial::MissingToken),
            Some(value) => extract_bearer(value)?,
        };
        self.resolve(Some(token)).await
    }

    /// Resolve a bare token secret.
    pub async fn resolve(&self, token: Option<&str>) -> Result<AuthContext, AuthDenial> {
        let token = token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AuthDenial::MissingToken)?;

        let digest = hash_token(token);
        if let Some(master) = &self.master_digest {
            if digests_match(master, &digest) {
                tracing::debug!("Resolved master credential");
                return Ok(AuthContext::master());
            }
        }

        let record = self
            .store
            .find_by_hash(&digest)
            .await
            .map_err(|e| AuthDenial::VerificationError(e.to_string()))?
            .ok_or(AuthDenial::TokenNotFound)?;

        if record.revoked {
            tracing::debug!(token_id = %record.id, "Rejected revoked token");
            return Err(AuthDenial::TokenNotFound);
        }

        if record.is_expired_at(Utc::now()) {
            let expired_at = record
                .expires_at
                .map(|t| t.to_rfc3339())
                .unwrap_or_default();
            return Err(AuthDenial::TokenExpired { expired_at });
        }

        tracing::debug!(token_id = %record.id, scopes = record.scopes.len(), "Resolved API token");

        let mut context = AuthContext::new(record.scopes).with_token_id(record.id);
        if let Some(user_id) = record.user_id {
            context = context.with_user(user_id, record.user_role);
        }
        Ok(context)
    }
}

/// Compare two digests without stopping at the first differing byte.
fn digests_match(a: &str, b: &str) -> bool {
    a.len() == b.len() && a.bytes().zip(b.bytes()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}

/// Extract the token from a `Bearer <token>` header value.
pub fn extract_bearer(header: &str) -> Result<&str, AuthDenial> {
    header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AuthDenial::VerificationError("expected 'Bearer <token>'".to_string()))
}
