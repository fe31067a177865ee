//! CLI command implementations for the Folio MCP server.

use std::env;
use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use folio_auth::{AuthResolver, InMemoryTokenStore};
use folio_core::FolioConfig;
use folio_mcp::ToolRegistry;
use folio_mcp::exposure;

pub mod check;
pub mod serve;
pub mod token;
pub mod tools;

/// Load the configuration with every file reference resolved.
pub fn load_config(path: &Path) -> Result<FolioConfig> {
    let config = FolioConfig::load_with_context(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    if config.content_types.is_empty() {
        tracing::warn!(config = %path.display(), "No content types registered");
    }
    Ok(config)
}

/// Resolve exposure and generate the tool registry.
pub fn build_registry(config: &FolioConfig) -> ToolRegistry {
    let analyses = exposure::resolve(&config.content_types, &config.exposure, &config.defaults);
    ToolRegistry::build(analyses)
}

/// Token store from the configured file (empty without one), plus the
/// master credential from the environment.
pub fn build_resolver(config: &FolioConfig) -> Result<AuthResolver> {
    let tokens = match &config.auth.tokens_file {
        Some(path) => InMemoryTokenStore::from_file(path)
            .with_context(|| format!("Failed to load tokens from {}", path.display()))?,
        None => {
            tracing::info!("No tokens file configured; only the master credential will authenticate");
            InMemoryTokenStore::new()
        }
    };

    let master_key = env::var(&config.auth.master_key_env).ok();
    if master_key.is_none() {
        tracing::debug!(env = %config.auth.master_key_env, "Master credential not set");
    }

    Ok(AuthResolver::new(Arc::new(tokens)).with_master_key(master_key))
}
