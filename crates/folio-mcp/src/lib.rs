//! # folio-mcp
//!
//! Turns the content types of a headless CMS into MCP tools that AI agents
//! can call under capability-scoped tokens.
//!
//! - **Content-type analysis**: nested field definitions flattened into typed descriptors
//! - **Schema synthesis**: one validator per (type, operation); the advertised JSON Schema is emitted from it
//! - **Rich text**: agents read and write markdown, the store keeps Lexical trees
//! - **Scoped execution**: every call is checked against the caller's scopes before the store is touched
//! - **Transports**: stdio and HTTP
//!
//! ## Architecture
//!
//! ```text
//!  folio.yaml + content types
//!          │
//!          ▼
//!  ┌────────────────┐    ┌──────────┐    ┌────────────────┐
//!  │ exposure       │──▶ │ analyzer │──▶ │ tool_generator │──▶ ToolRegistry
//!  └────────────────┘    └──────────┘    └────────────────┘
//!
//!  AI agent ── tools/call ──▶ McpServer
//!                               │
//!                               ▼
//!                      ┌─────────────────┐
//!                      │ ScopedExecutor  │
//!                      │ 1. scope check  │  ← folio-auth
//!                      │ 2. validate     │
//!                      │ 3. md → tree    │  ← richtext
//!                      │ 4. store call   │  ← store (memory / REST)
//!                      │ 5. tree → md    │
//!                      └─────────────────┘
//! ```
//!
//! ## Tool Generation
//!
//! | Tool | Generated When | Description |
//! |------|----------------|-------------|
//! | `{prefix}_list` | collection, list enabled | Paginated query |
//! | `{prefix}_get` | get enabled | One document, or the global |
//! | `{prefix}_create` | collection, create enabled | New document |
//! | `{prefix}_update` | update enabled | Patch a document, or the global |
//! | `{prefix}_delete` | collection, delete enabled | Remove a document |
//!
//! ## Example Usage
//!
//! ```ignore
//! use folio_core::{ContentTypeSet, FolioConfig};
//! use folio_mcp::{McpServer, RichTextBridge, ScopedExecutor, ToolRegistry, exposure, store};
//!
//! let config = FolioConfig::load_with_context("folio.yaml")?;
//! let analyses = exposure::resolve(&config.content_types, &config.exposure, &config.defaults);
//! let registry = Arc::new(ToolRegistry::build(analyses));
//!
//! let executor = ScopedExecutor::new(
//!     store::from_config(&config.store)?,
//!     Arc::new(RichTextBridge::from_config(&config.rich_text)),
//! );
//! let server = Arc::new(McpServer::new(config.mcp.clone(), registry, Arc::new(executor)));
//! server.run(resolver, std::env::var("FOLIO_TOKEN").ok()).await?;
//! ```

pub mod analyzer;
pub mod error;
pub mod executor;
pub mod exposure;
pub mod field;
pub mod http_transport;
pub mod protocol;
pub mod redact;
pub mod richtext;
pub mod schema;
pub mod server;
pub mod store;
pub mod tool_generator;
pub mod tools;
pub mod validator;

// Re-export main types
pub use analyzer::{AnalyzeOptions, ContentTypeAnalysis, analyze, is_hidden_type};
pub use error::{McpError, ToolError, ToolErrorKind};
pub use executor::{ExecutionResult, ScopedExecutor};
pub use field::{FieldDescriptor, FieldKind};
pub use protocol::{
    CallToolParams, JsonRpcRequest, JsonRpcResponse, RequestContext, ToolAnnotations, ToolContent,
    ToolDefinition,
};
pub use richtext::{ProfileCache, RichTextBridge};
pub use schema::{ValidatorSchema, build_output_schema, build_validator};
pub use server::McpServer;
pub use store::{DocumentStore, InMemoryStore, OperationContext, RestStore};
pub use tool_generator::{ToolDescriptor, generate};
pub use tools::{RegisteredTool, ToolRegistry};
pub use validator::ValidatedInput;
