//! `folio serve` - run the MCP server over stdio or HTTP.

use std::env;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use folio_core::{FolioConfig, Transport};
use folio_mcp::{McpServer, RichTextBridge, ScopedExecutor, store};

use super::{build_registry, build_resolver, load_config};

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum TransportArg {
    Stdio,
    Http,
}

impl From<TransportArg> for Transport {
    fn from(arg: TransportArg) -> Self {
        match arg {
            TransportArg::Stdio => Transport::Stdio,
            TransportArg::Http => Transport::Http,
        }
    }
}

/// Arguments for `folio serve`.
#[derive(Debug, Args)]
pub struct ServeArgs {
    /// Configuration file path.
    #[arg(short, long, default_value = "folio.yaml", env = "FOLIO_CONFIG")]
    pub config: PathBuf,

    /// Transport type. Overrides the config file.
    #[arg(long, value_enum)]
    pub transport: Option<TransportArg>,

    /// HTTP host. Overrides the config file.
    #[arg(long)]
    pub host: Option<String>,

    /// HTTP port. Overrides the config file.
    #[arg(long)]
    pub port: Option<u16>,
}

/// Apply command-line overrides to the loaded configuration.
fn apply_overrides(config: &mut FolioConfig, args: &ServeArgs) {
    if let Some(transport) = args.transport {
        config.mcp.transport = transport.into();
    }
    if let Some(host) = &args.host {
        config.mcp.host = host.clone();
    }
    if let Some(port) = args.port {
        config.mcp.port = port;
    }
}

pub async fn run(args: ServeArgs) -> Result<()> {
    let mut config = load_config(&args.config)?;
    apply_overrides(&mut config, &args);

    let registry = Arc::new(build_registry(&config));
    if registry.is_empty() {
        tracing::warn!("No tools generated; check the exposure configuration");
    }

    let document_store = store::from_config(&config.store).context("Failed to initialize document store")?;
    let bridge = Arc::new(RichTextBridge::from_config(&config.rich_text));
    let executor = Arc::new(ScopedExecutor::new(document_store, bridge));
    let resolver = Arc::new(build_resolver(&config)?);

    let stdio_token = env::var(&config.auth.stdio_token_env).ok();

    tracing::info!(
        project = %config.project_name(),
        transport = ?config.mcp.transport,
        tools = registry.len(),
        "Starting Folio MCP server"
    );

    let server = Arc::new(McpServer::new(config.mcp.clone(), registry, executor));
    server
        .run(resolver, stdio_token)
        .await
        .context("MCP server failed")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides() {
        let mut config = FolioConfig::default();
        let args = ServeArgs {
            config: PathBuf::from("folio.yaml"),
            transport: Some(TransportArg::Http),
            host: None,
            port: Some(9100),
        };
        apply_overrides(&mut config, &args);
        assert!(config.mcp.is_http());
        assert_eq!(config.mcp.port, 9100);
        assert_eq!(config.mcp.host, FolioConfig::default().mcp.host);
    }
}
