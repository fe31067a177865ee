//! Capability-scoped authorization for Folio tools.
//!
//! A bearer credential resolves to an [`AuthContext`] (a set of scopes plus
//! optional identity) or an [`AuthDenial`]. The context is then passed
//! explicitly to every tool invocation, which checks it with
//! [`AuthContext::permits`] before touching the document store.
//!
//! ```text
//! Authorization: Bearer <secret>
//!        │
//!        ▼
//! ┌──────────────┐   master key?   ┌──────────────────────────┐
//! │ AuthResolver │ ──────────────▶ │ collections:*:* + extras │
//! └──────┬───────┘                 └──────────────────────────┘
//!        │ sha256(secret)
//!        ▼
//! ┌──────────────┐
//! │  TokenStore  │ ──▶ revoked / expired / scopes
//! └──────────────┘
//! ```

pub mod context;
pub mod error;
pub mod resolver;
pub mod scope;
pub mod token;

pub use context::AuthContext;
pub use error::{AuthDenial, AuthError};
pub use resolver::{AuthResolver, extract_bearer};
pub use scope::{ALL_COLLECTIONS, CollectionScope, MCP_DESCRIBE, MEDIA_UPLOAD, ScopeAction};
pub use token::{InMemoryTokenStore, TokenRecord, TokenStore, hash_token};
