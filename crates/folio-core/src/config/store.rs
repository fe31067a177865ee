//! Document store selection.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Which document store backs tool execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StoreConfig {
    /// In-process store, optionally seeded from a YAML/JSON file.
    Memory {
        #[serde(default)]
        seed_file: Option<PathBuf>,
    },
    /// The CMS REST API.
    Rest {
        /// API root, e.g. `http://localhost:3000/api`.
        base_url: String,

        /// Environment variable holding the CMS API key.
        #[serde(default)]
        api_key_env: Option<String>,

        #[serde(default = "default_timeout_secs")]
        timeout_secs: u64,
    },
}

impl Default for StoreConfig {
    fn default() -> Self {
        StoreConfig::Memory { seed_file: None }
    }
}

fn default_timeout_secs() -> u64 {
    30
}
