//! Tool descriptor generation.
//!
//! One tool per exposed content type and enabled operation:
//!
//! | Tool | Collection | Global |
//! |------|------------|--------|
//! | `{prefix}_list` | paginated query | never |
//! | `{prefix}_get` | one document by id | the singleton |
//! | `{prefix}_create` | new document | never |
//! | `{prefix}_update` | patch by id | patch the singleton |
//! | `{prefix}_delete` | delete by id | never |
//!
//! The input schema of every tool is emitted from the same
//! [`ValidatorSchema`] that validates its arguments.

use std::collections::HashSet;

use folio_core::Operation;
use serde_json::Value;

use crate::analyzer::ContentTypeAnalysis;
use crate::protocol::{ToolAnnotations, ToolDefinition};
use crate::schema::{ValidatorSchema, build_output_schema, build_validator};

/// A generated tool, bound to the content type and operation it runs.
#[derive(Debug, Clone)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub collection: String,
    pub operation: Operation,
    pub is_global: bool,
    pub input_schema: Value,
    pub output_schema: Value,
    pub annotations: ToolAnnotations,
    /// The validator `input_schema` was emitted from.
    pub validator: ValidatorSchema,
}

impl ToolDescriptor {
    /// Protocol form for `tools/list`.
    pub fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name.clone(),
            description: Some(self.description.clone()),
            input_schema: self.input_schema.clone(),
            output_schema: Some(self.output_schema.clone()),
            annotations: Some(self.annotations.clone()),
        }
    }
}

/// Generate descriptors for every enabled operation of every analysis.
///
/// A name already taken by an earlier descriptor is a configuration error;
/// the later descriptor is skipped with a warning.
pub fn generate(analyses: &[ContentTypeAnalysis]) -> Vec<ToolDescriptor> {
    let mut seen = HashSet::new();
    let mut tools = Vec::new();

    for analysis in analyses {
        for descriptor in generate_for(analysis) {
            if !seen.insert(descriptor.name.clone()) {
                tracing::warn!(
                    tool = %descriptor.name,
                    collection = %analysis.slug,
                    "Tool name already registered by another content type; skipping"
                );
                continue;
            }
            tools.push(descriptor);
        }
    }

    tracing::debug!(
        tools = ?tools.iter().map(|t| &t.name).collect::<Vec<_>>(),
        "Generated tools"
    );
    tools
}

/// Descriptors for one content type.
pub fn generate_for(analysis: &ContentTypeAnalysis) -> Vec<ToolDescriptor> {
    analysis
        .operations
        .enabled()
        .into_iter()
        .filter_map(|operation| match build_descriptor(analysis, operation) {
            Ok(descriptor) => Some(descriptor),
            Err(e) => {
                tracing::warn!(
                    collection = %analysis.slug,
                    operation = %operation,
                    error = %e,
                    "Skipping tool"
                );
                None
            }
        })
        .collect()
}

fn build_descriptor(
    analysis: &ContentTypeAnalysis,
    operation: Operation,
) -> Result<ToolDescriptor, crate::error::ToolError> {
    let validator = build_validator(analysis, operation)?;
    Ok(ToolDescriptor {
        name: analysis.tool_name(operation),
        description: describe(analysis, operation),
        collection: analysis.slug.clone(),
        operation,
        is_global: analysis.is_global,
        input_schema: validator.to_json_schema(),
        output_schema: build_output_schema(analysis, operation),
        annotations: annotations(analysis, operation),
        validator,
    })
}

fn annotations(analysis: &ContentTypeAnalysis, operation: Operation) -> ToolAnnotations {
    let title = match operation {
        Operation::List => format!("List {}", analysis.plural_label),
        Operation::Get => format!("Get {}", analysis.label),
        Operation::Create => format!("Create {}", analysis.label),
        Operation::Update => format!("Update {}", analysis.label),
        Operation::Delete => format!("Delete {}", analysis.label),
    };
    ToolAnnotations {
        title: Some(title),
        read_only: Some(operation.is_read()),
        destructive: Some(operation == Operation::Delete),
        idempotent: Some(!matches!(operation, Operation::Create)),
    }
}

fn describe(analysis: &ContentTypeAnalysis, operation: Operation) -> String {
    let label = &analysis.label;
    let mut description = if analysis.is_global {
        match operation {
            Operation::Get => format!("Read the {} settings.", label),
            Operation::Update => format!(
                "Update the {} settings. Only the fields given in `data` change.",
                label
            ),
            // Not generated for globals.
            _ => format!("{} {}.", operation, label),
        }
    } else {
        match operation {
            Operation::List => format!(
                "List {} documents. Supports a `where` filter, `sort` (prefix `-` for descending), \
                 `page`/`limit` pagination and `fields` selection.",
                analysis.plural_label
            ),
            Operation::Get => format!("Get one {} document by `id`.", label),
            Operation::Create => format!("Create a new {} document from `data`.", label),
            Operation::Update => format!(
                "Update the {} document with the given `id`. Only the fields given in `data` change.",
                label
            ),
            Operation::Delete => format!("Delete the {} document with the given `id`.", label),
        }
    };

    if analysis.has_rich_text() {
        if operation.is_read() {
            description.push_str(" Rich-text fields are returned as markdown.");
            if operation == Operation::List {
                description.push_str(" Long rich-text values are truncated; use get for the full text.");
            }
        } else if operation != Operation::Delete {
            description.push_str(" Rich-text fields take markdown.");
        }
    }

    if let Some(extra) = &analysis.description {
        description.push_str("\n\n");
        description.push_str(extra);
    }
    description
}
