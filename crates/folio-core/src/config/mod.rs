//! Configuration types for Folio.
//!
//! Configuration is loaded from a single `folio.yaml`, which may reference
//! further files (the content-type export, the editor profile, the token file,
//! a store seed). Relative references resolve against the directory of
//! `folio.yaml`.
//!
//! # Example
//!
//! ```yaml
//! project: blog
//! content_types_file: content-types.yaml
//! mcp:
//!   transport: http
//!   port: 3030
//! defaults: { list: true, get: true }
//! collections:
//!   - posts
//!   - slug: pages
//!     operations: { create: true, update: true }
//! globals: all
//! rich_text:
//!   list_truncate_chars: 200
//! store:
//!   kind: rest
//!   base_url: http://localhost:3000/api
//! ```

pub mod auth;
pub mod exposure;
pub mod mcp;
pub mod rich_text;
pub mod store;

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::content_type::ContentTypeSet;
use crate::operation::OperationSet;

pub use auth::AuthConfig;
pub use exposure::{AllTypes, ExposureConfig, ExposureEntry, ExposureMode, TypeExposure};
pub use mcp::{McpConfig, Transport};
pub use rich_text::{EditorProfile, RichTextConfig};
pub use store::StoreConfig;

/// Complete Folio configuration loaded from files.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FolioConfig {
    /// Project name.
    #[serde(default)]
    pub project: Option<String>,

    /// Content-type export file (alternative to inline `content_types`).
    #[serde(default)]
    pub content_types_file: Option<PathBuf>,

    /// Inline content types.
    #[serde(default)]
    pub content_types: ContentTypeSet,

    /// MCP server configuration.
    #[serde(default)]
    pub mcp: McpConfig,

    /// Which content types are exposed as tools.
    #[serde(flatten)]
    pub exposure: ExposureConfig,

    /// Operations enabled for a type unless its entry overrides them.
    #[serde(default)]
    pub defaults: OperationSet,

    /// Rich-text conversion settings.
    #[serde(default)]
    pub rich_text: RichTextConfig,

    /// Authorization settings.
    #[serde(default)]
    pub auth: AuthConfig,

    /// Document store backing tool execution.
    #[serde(default)]
    pub store: StoreConfig,
}

/// Error type for configuration loading.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl FolioConfig {
    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse configuration from YAML content.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        serde_yaml::from_str(content).map_err(ConfigError::from)
    }

    /// Load configuration and resolve all external references.
    ///
    /// This loads content types from `content_types_file` (merged over any
    /// inline definitions) and rewrites every other file reference to an
    /// absolute path so later stages can read them lazily.
    pub fn load_with_context(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let mut config = Self::from_file(path)?;

        let base_dir = path
            .parent()
            .map(|p| p.to_path_buf())
            .unwrap_or_else(|| PathBuf::from("."));

        if let Some(types_file) = &config.content_types_file {
            let types_path = resolve(&base_dir, types_file);
            if !types_path.exists() {
                return Err(ConfigError::Config(format!(
                    "content types file not found: {}",
                    types_path.display()
                )));
            }
            let loaded = ContentTypeSet::from_file(&types_path)?;
            config.content_types.extend(loaded);
            config.content_types_file = Some(types_path);
        }

        if let Some(editor_file) = &config.rich_text.editor_file {
            config.rich_text.editor_file = Some(resolve(&base_dir, editor_file));
        }

        if let Some(tokens_file) = &config.auth.tokens_file {
            config.auth.tokens_file = Some(resolve(&base_dir, tokens_file));
        }

        if let StoreConfig::Memory {
            seed_file: Some(seed),
        } = &config.store
        {
            config.store = StoreConfig::Memory {
                seed_file: Some(resolve(&base_dir, seed)),
            };
        }

        Ok(config)
    }

    /// Project name, falling back to the MCP server name.
    pub fn project_name(&self) -> &str {
        self.project.as_deref().unwrap_or(&self.mcp.server_name)
    }
}

fn resolve(base_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}
