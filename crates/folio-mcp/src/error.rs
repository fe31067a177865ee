//! Error types for the MCP crate.
//!
//! [`McpError`] covers server lifecycle failures. [`ToolError`] is the
//! structured, per-invocation error returned to the caller of a tool: it is
//! always recovered into a response and never aborts the server.

use serde::Serialize;
use serde_json::{Value, json};
use std::fmt;
use thiserror::Error;

/// Errors that can occur in the MCP server.
#[derive(Debug, Error)]
pub enum McpError {
    /// Failed to start the server.
    #[error("failed to start MCP server: {0}")]
    StartupFailed(String),

    /// Invalid request format.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Configuration could not be turned into a tool set.
    #[error("configuration error: {0}")]
    Configuration(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Internal error.
    #[error("internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

// =============================================================================
// TOOL ERRORS
// =============================================================================

/// Error returned from a single tool invocation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolError {
    /// The kind of error.
    pub kind: ToolErrorKind,
    /// Human-readable error message.
    pub message: String,
    /// Offending field path, when the error concerns one input field.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
}

impl ToolError {
    /// Create a new tool error.
    pub fn new(kind: ToolErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            field: None,
        }
    }

    /// Attach the offending field path.
    pub fn with_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Type or operation cannot be served as configured.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Configuration, message)
    }

    /// Input violates the synthesized schema.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        let field = field.into();
        let message = message.into();
        Self::new(
            ToolErrorKind::Validation,
            format!("Invalid value for '{}': {}", field, message),
        )
        .with_field(field)
    }

    /// No scope in the caller's context permits the operation.
    pub fn scope_denied(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::ScopeDenied, message)
    }

    /// Target document does not exist.
    pub fn not_found(collection: &str, id: &str) -> Self {
        Self::new(
            ToolErrorKind::NotFound,
            format!("No document with id '{}' exists in '{}'", id, collection),
        )
    }

    /// A rich-text field received something other than markdown.
    pub fn conversion(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Conversion, message).with_field(field)
    }

    /// The document store failed.
    pub fn upstream(message: impl Into<String>) -> Self {
        Self::new(ToolErrorKind::Upstream, message)
    }

    /// The operation is disabled for the content type.
    pub fn operation_not_permitted(collection: &str, operation: &str) -> Self {
        Self::new(
            ToolErrorKind::OperationNotPermitted,
            format!(
                "Operation '{}' is not enabled for '{}'",
                operation, collection
            ),
        )
    }

    /// No tool with this name is registered.
    pub fn unknown_tool(name: &str) -> Self {
        Self::new(ToolErrorKind::UnknownTool, format!("Unknown tool '{}'", name))
    }

    pub fn kind(&self) -> ToolErrorKind {
        self.kind
    }

    /// The structured error payload returned to callers.
    pub fn to_json(&self) -> Value {
        let mut value = json!({
            "kind": self.kind.as_str(),
            "message": self.message,
        });
        if let Some(field) = &self.field {
            value["field"] = json!(field);
        }
        value
    }
}

impl fmt::Display for ToolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind.as_str(), self.message)
    }
}

impl std::error::Error for ToolError {}

/// Kinds of tool errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolErrorKind {
    #[serde(rename = "configuration_error")]
    Configuration,
    #[serde(rename = "validation_error")]
    Validation,
    ScopeDenied,
    NotFound,
    #[serde(rename = "conversion_error")]
    Conversion,
    #[serde(rename = "upstream_error")]
    Upstream,
    OperationNotPermitted,
    UnknownTool,
}

impl ToolErrorKind {
    /// Machine-readable kind string.
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolErrorKind::Configuration => "configuration_error",
            ToolErrorKind::Validation => "validation_error",
            ToolErrorKind::ScopeDenied => "scope_denied",
            ToolErrorKind::NotFound => "not_found",
            ToolErrorKind::Conversion => "conversion_error",
            ToolErrorKind::Upstream => "upstream_error",
            ToolErrorKind::OperationNotPermitted => "operation_not_permitted",
            ToolErrorKind::UnknownTool => "unknown_tool",
        }
    }
}
