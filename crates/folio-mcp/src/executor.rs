//! Scoped tool execution.
//!
//! One invocation runs these steps in order and stops at the first failure:
//!
//! 1. log the arguments, with sensitive keys redacted
//! 2. refuse operations the content type does not enable
//! 3. check the caller's scopes; a denied call never reaches the store
//! 4. validate the arguments against the tool's validator
//! 5. convert markdown in rich-text fields to storage trees
//! 6. call the store with an [`OperationContext`] so change hooks fire
//! 7. convert stored trees in the result back to markdown (truncated for list)
//!
//! There are no retries. A missing document is not an error for the caller:
//! it becomes an explanatory result.

use std::sync::Arc;

use folio_auth::AuthContext;
use folio_core::Operation;
use serde::Serialize;
use serde_json::{Map, Value, json};

use crate::analyzer::ContentTypeAnalysis;
use crate::error::{ToolError, ToolErrorKind};
use crate::protocol::ToolContent;
use crate::redact::redact;
use crate::richtext::RichTextBridge;
use crate::store::{
    DocumentStore, FindQuery, OperationContext, ReadOptions, StoreError, WriteOptions,
};
use crate::tool_generator::ToolDescriptor;
use crate::validator::ValidatedInput;

/// Relation depth assumed when a request does not give one.
pub const DEFAULT_DEPTH: u8 = 2;

/// Result of a tool execution.
#[derive(Debug, Clone, Serialize)]
pub struct ExecutionResult {
    /// Whether the execution was successful.
    pub success: bool,
    /// The result content.
    pub content: Vec<ToolContent>,
    /// The result payload, or the structured error.
    pub structured: Value,
    /// Error if failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ToolError>,
}

impl ExecutionResult {
    /// Create a successful result with JSON content.
    pub fn success_json(value: Value) -> Self {
        Self {
            success: true,
            content: vec![ToolContent::json(&value)],
            structured: value,
            error: None,
        }
    }

    /// Create an error result.
    pub fn error(error: ToolError) -> Self {
        let payload = json!({ "error": error.to_json() });
        Self {
            success: false,
            content: vec![ToolContent::Text {
                text: error.to_string(),
            }],
            structured: payload,
            error: Some(error),
        }
    }

    /// A missing document explained to the caller.
    pub fn not_found(error: &ToolError) -> Self {
        Self::success_json(json!({
            "found": false,
            "message": error.message,
        }))
    }
}

impl From<Result<Value, ToolError>> for ExecutionResult {
    fn from(result: Result<Value, ToolError>) -> Self {
        match result {
            Ok(value) => ExecutionResult::success_json(value),
            Err(e) if e.kind() == ToolErrorKind::NotFound => ExecutionResult::not_found(&e),
            Err(e) => ExecutionResult::error(e),
        }
    }
}

/// Runs tools against the document store on behalf of an authorized caller.
pub struct ScopedExecutor {
    store: Arc<dyn DocumentStore>,
    bridge: Arc<RichTextBridge>,
}

impl ScopedExecutor {
    pub fn new(store: Arc<dyn DocumentStore>, bridge: Arc<RichTextBridge>) -> Self {
        Self { store, bridge }
    }

    /// Execute and fold the outcome into a caller-facing result.
    pub async fn call(
        &self,
        descriptor: &ToolDescriptor,
        arguments: Value,
        auth: Option<&AuthContext>,
        analysis: &ContentTypeAnalysis,
    ) -> ExecutionResult {
        self.execute(descriptor, arguments, auth, analysis).await.into()
    }

    /// Execute one tool invocation.
    pub async fn execute(
        &self,
        descriptor: &ToolDescriptor,
        arguments: Value,
        auth: Option<&AuthContext>,
        analysis: &ContentTypeAnalysis,
    ) -> Result<Value, ToolError> {
        let operation = descriptor.operation;
        let slug = analysis.slug.as_str();

        tracing::debug!(
            tool = %descriptor.name,
            collection = %slug,
            operation = %operation,
            arguments = %redact(&arguments),
            "Executing tool"
        );

        if !analysis.operations.is_enabled(operation) {
            return Err(ToolError::operation_not_permitted(slug, operation.as_str()));
        }

        let auth = authorize(auth, slug, operation)?;

        let mut input = descriptor.validator.validate(arguments)?;

        if let Some(data) = input.data.as_mut() {
            self.bridge.convert_input(data, &analysis.fields).await?;
        }

        let hops = usize::from(input.depth.unwrap_or(DEFAULT_DEPTH)) + 1;
        let context = OperationContext::for_caller(auth);
        let mut result = if analysis.is_global {
            self.run_global(slug, operation, input, &context).await?
        } else {
            self.run_collection(slug, operation, input, &context).await?
        };

        if operation != Operation::Delete {
            self.bridge.convert_output(
                &mut result,
                &analysis.fields,
                operation == Operation::List,
                hops,
            );
        }

        tracing::info!(
            tool = %descriptor.name,
            collection = %slug,
            operation = %operation,
            token_id = auth.token_id.as_deref().unwrap_or("-"),
            request_id = %context.request_id,
            "Tool executed"
        );
        Ok(result)
    }

    async fn run_collection(
        &self,
        slug: &str,
        operation: Operation,
        input: ValidatedInput,
        context: &OperationContext,
    ) -> Result<Value, ToolError> {
        match operation {
            Operation::List => {
                let query = FindQuery {
                    page: input.page(),
                    limit: input.limit(),
                    select: input.selection(),
                    filter: input.filter,
                    sort: input.sort,
                    depth: input.depth,
                    locale: input.locale,
                    draft: input.draft,
                };
                let page = self.store.find(slug, query, context).await.map_err(upstream)?;
                serde_json::to_value(page).map_err(|e| ToolError::upstream(e.to_string()))
            }
            Operation::Get => {
                let id = require_id(&input)?;
                let options = ReadOptions {
                    select: input.selection(),
                    depth: input.depth,
                    locale: input.locale,
                    draft: input.draft,
                };
                self.store
                    .find_by_id(slug, &id, options, context)
                    .await
                    .map_err(upstream)?
                    .ok_or_else(|| ToolError::not_found(slug, &id))
            }
            Operation::Create => {
                let data = input.data.unwrap_or_default();
                let options = write_options(input.depth, input.locale, input.draft);
                self.store
                    .create(slug, data, options, context)
                    .await
                    .map_err(upstream)
            }
            Operation::Update => {
                let id = require_id(&input)?;
                let data = input.data.unwrap_or_default();
                let options = write_options(input.depth, input.locale, input.draft);
                self.store
                    .update(slug, &id, data, options, context)
                    .await
                    .map_err(upstream)?
                    .ok_or_else(|| ToolError::not_found(slug, &id))
            }
            Operation::Delete => {
                let id = require_id(&input)?;
                self.store
                    .delete(slug, &id, context)
                    .await
                    .map_err(upstream)?
                    .ok_or_else(|| ToolError::not_found(slug, &id))?;
                Ok(json!({ "id": id, "deleted": true }))
            }
        }
    }

    async fn run_global(
        &self,
        slug: &str,
        operation: Operation,
        input: ValidatedInput,
        context: &OperationContext,
    ) -> Result<Value, ToolError> {
        match operation {
            Operation::Get => {
                let options = ReadOptions {
                    select: input.selection(),
                    depth: input.depth,
                    locale: input.locale,
                    draft: input.draft,
                };
                self.store
                    .find_global(slug, options, context)
                    .await
                    .map_err(upstream)
            }
            Operation::Update => {
                let data: Map<String, Value> = input.data.unwrap_or_default();
                let options = write_options(input.depth, input.locale, input.draft);
                self.store
                    .update_global(slug, data, options, context)
                    .await
                    .map_err(upstream)
            }
            other => Err(ToolError::configuration(format!(
                "Global '{}' does not support '{}'",
                slug, other
            ))),
        }
    }
}

/// Check the caller's scopes for `operation` on `slug`.
fn authorize<'a>(
    auth: Option<&'a AuthContext>,
    slug: &str,
    operation: Operation,
) -> Result<&'a AuthContext, ToolError> {
    let class = operation.class().as_str();
    let required = format!(
        "one of collections:*:*, collections:{slug}:*, collections:{slug}:{class} or collections:{slug}:{op}",
        op = operation.as_str()
    );

    let Some(auth) = auth else {
        tracing::warn!(collection = %slug, operation = %operation, "Tool call without authorization context");
        return Err(ToolError::scope_denied(format!(
            "No credentials presented; '{}' on '{}' requires {}",
            operation, slug, required
        )));
    };

    if !auth.permits(slug, operation) {
        tracing::warn!(
            collection = %slug,
            operation = %operation,
            token_id = auth.token_id.as_deref().unwrap_or("-"),
            "Scope denied"
        );
        return Err(ToolError::scope_denied(format!(
            "Token lacks scope for '{}' on '{}'; requires {}",
            operation, slug, required
        )));
    }
    Ok(auth)
}

fn require_id(input: &ValidatedInput) -> Result<String, ToolError> {
    input
        .id
        .clone()
        .ok_or_else(|| ToolError::validation("id", "is required"))
}

fn write_options(depth: Option<u8>, locale: Option<String>, draft: Option<bool>) -> WriteOptions {
    WriteOptions {
        depth,
        locale,
        draft,
    }
}

fn upstream(error: StoreError) -> ToolError {
    tracing::warn!(error = %error, "Document store call failed");
    ToolError::upstream(error.to_string())
}
