//! Authorization settings: where the master credential and tokens come from.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Authorization configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Environment variable holding the master credential.
    #[serde(default = "default_master_key_env")]
    pub master_key_env: String,

    /// YAML file of hashed API tokens.
    #[serde(default)]
    pub tokens_file: Option<PathBuf>,

    /// Environment variable holding the bearer credential for stdio sessions.
    #[serde(default = "default_stdio_token_env")]
    pub stdio_token_env: String,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            master_key_env: default_master_key_env(),
            tokens_file: None,
            stdio_token_env: default_stdio_token_env(),
        }
    }
}

fn default_master_key_env() -> String {
    "FOLIO_MASTER_KEY".to_string()
}

fn default_stdio_token_env() -> String {
    "FOLIO_TOKEN".to_string()
}
