//! Error types for the auth crate.

use thiserror::Error;

/// Why a presented credential did not produce an authorization context.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthDenial {
    /// No bearer credential was presented.
    #[error("missing bearer token")]
    MissingToken,

    /// The credential matches no known (unrevoked) token.
    #[error("token not found")]
    TokenNotFound,

    /// The token exists but is past its expiry.
    #[error("token expired at {expired_at}")]
    TokenExpired { expired_at: String },

    /// The credential could not be checked (malformed header, store failure).
    #[error("token verification failed: {0}")]
    VerificationError(String),
}

impl AuthDenial {
    /// Machine-readable denial reason.
    pub fn code(&self) -> &'static str {
        match self {
            AuthDenial::MissingToken => "missing_token",
            AuthDenial::TokenNotFound => "token_not_found",
            AuthDenial::TokenExpired { .. } => "token_expired",
            AuthDenial::VerificationError(_) => "verification_error",
        }
    }
}

/// Errors loading or querying a token store.
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid token record '{id}': {reason}")]
    InvalidRecord { id: String, reason: String },

    #[error("token store unavailable: {0}")]
    Store(String),
}
