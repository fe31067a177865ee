//! Per-invocation authorization context.

use folio_core::Operation;
use serde::{Deserialize, Serialize};

use crate::scope::{ALL_COLLECTIONS, CollectionScope, MCP_DESCRIBE, MEDIA_UPLOAD};

/// Capabilities and identity of the caller of one tool invocation.
///
/// Passed explicitly down the execution path; there is no ambient context.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthContext {
    pub scopes: Vec<String>,

    #[serde(default)]
    pub token_id: Option<String>,

    /// Impersonated CMS user, if the token is bound to one.
    #[serde(default)]
    pub user_id: Option<String>,

    #[serde(default)]
    pub user_role: Option<String>,
}

impl AuthContext {
    pub fn new<I, S>(scopes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            scopes: scopes.into_iter().map(Into::into).collect(),
            ..Default::default()
        }
    }

    /// Context of the master credential.
    pub fn master() -> Self {
        Self {
            token_id: Some("master".to_string()),
            ..Self::new([ALL_COLLECTIONS, MCP_DESCRIBE, MEDIA_UPLOAD])
        }
    }

    pub fn with_token_id(mut self, token_id: impl Into<String>) -> Self {
        self.token_id = Some(token_id.into());
        self
    }

    pub fn with_user(mut self, user_id: impl Into<String>, role: Option<String>) -> Self {
        self.user_id = Some(user_id.into());
        self.user_role = role;
        self
    }

    /// Whether any held scope permits `operation` on `slug`.
    pub fn permits(&self, slug: &str, operation: Operation) -> bool {
        self.scopes
            .iter()
            .filter_map(|s| CollectionScope::parse(s))
            .any(|s| s.permits(slug, operation))
    }

    pub fn has_scope(&self, scope: &str) -> bool {
        self.scopes.iter().any(|s| s == scope)
    }
}
