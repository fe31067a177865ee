//! Content-type analyzer.
//!
//! Flattens a recursively nested content-type definition into an ordered list
//! of [`FieldDescriptor`]s:
//!
//! - groups prefix their children with `group.` and produce no descriptor
//!   of their own
//! - rows, tabs and collapsibles are transparent (no prefix)
//! - array rows and block variants are analyzed separately, relative to the row
//! - `ui` fields and other unnamed fields are skipped
//! - unrecognized field types become [`FieldKind::Unknown`]
//!
//! Analysis never fails.

use folio_core::{ContentTypeDefinition, FieldConfig, Operation, OperationSet};
use serde::Serialize;

use crate::field::{
    ArrayConstraints, BlockDescriptor, BlocksConstraints, ChoiceConstraints, FieldDescriptor,
    FieldKind, NumberConstraints, RelationConstraints, StringConstraints, UploadConstraints,
};

/// CMS bookkeeping types that are never exposed.
pub const INTERNAL_TYPES: [&str; 3] = [
    "payload-migrations",
    "payload-preferences",
    "payload-locked-documents",
];

/// The collection holding MCP API credentials; never exposed.
pub const CREDENTIAL_TYPE: &str = "payload-mcp-api-keys";

/// Whether a slug names an internal or credential type.
pub fn is_hidden_type(slug: &str) -> bool {
    INTERNAL_TYPES.contains(&slug) || slug == CREDENTIAL_TYPE
}

/// Per-type settings resolved from the exposure configuration.
#[derive(Debug, Clone, Default)]
pub struct AnalyzeOptions {
    pub operations: OperationSet,
    pub tool_prefix: Option<String>,
    pub exclude_fields: Vec<String>,
    pub description: Option<String>,
}

/// The analyzed, immutable form of one exposed content type.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentTypeAnalysis {
    pub slug: String,
    pub label: String,
    pub plural_label: String,
    pub fields: Vec<FieldDescriptor>,
    pub has_auth: bool,
    pub has_upload: bool,
    pub is_global: bool,
    pub timestamps: bool,
    pub operations: OperationSet,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_prefix: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub exclude_fields: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ContentTypeAnalysis {
    /// Tool name prefix: the override, or the slug.
    pub fn prefix(&self) -> &str {
        self.tool_prefix.as_deref().unwrap_or(&self.slug)
    }

    pub fn tool_name(&self, operation: Operation) -> String {
        format!("{}_{}", self.prefix(), operation.as_str())
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn has_rich_text(&self) -> bool {
        fn any_rich(fields: &[FieldDescriptor]) -> bool {
            fields.iter().any(|f| match &f.kind {
                FieldKind::RichText => true,
                FieldKind::Array(a) => any_rich(&a.fields),
                FieldKind::Blocks(b) => b.blocks.iter().any(|blk| any_rich(&blk.fields)),
                _ => false,
            })
        }
        any_rich(&self.fields)
    }
}

/// Analyze a content type.
pub fn analyze(definition: &ContentTypeDefinition, options: AnalyzeOptions) -> ContentTypeAnalysis {
    let walker = FieldWalker {
        slug: &definition.slug,
        exclude: &options.exclude_fields,
    };
    let mut fields = Vec::new();
    walker.collect(&definition.fields, "", "", &mut fields);

    let operations = if definition.is_global() {
        options.operations.clamp_to_global()
    } else {
        options.operations
    };

    tracing::debug!(
        collection = %definition.slug,
        fields = fields.len(),
        operations = ?operations.enabled(),
        "Analyzed content type"
    );

    ContentTypeAnalysis {
        slug: definition.slug.clone(),
        label: definition.display_label(),
        plural_label: definition.plural_label(),
        fields,
        has_auth: definition.auth,
        has_upload: definition.upload,
        is_global: definition.is_global(),
        timestamps: definition.timestamps,
        operations,
        tool_prefix: options.tool_prefix,
        exclude_fields: options.exclude_fields,
        description: options.description.or_else(|| definition.description.clone()),
    }
}

struct FieldWalker<'a> {
    slug: &'a str,
    exclude: &'a [String],
}

impl FieldWalker<'_> {
    /// Collect descriptors for `fields`.
    ///
    /// `name_prefix` is prepended to descriptor names; `path_prefix` is the
    /// full document path used for exclusion matching. They differ inside
    /// array rows, whose descriptors are named relative to the row.
    fn collect(
        &self,
        fields: &[FieldConfig],
        name_prefix: &str,
        path_prefix: &str,
        out: &mut Vec<FieldDescriptor>,
    ) {
        for field in fields {
            match field.field_type.as_str() {
                "row" | "collapsible" => self.collect(&field.fields, name_prefix, path_prefix, out),
                "tabs" => {
                    for tab in &field.tabs {
                        self.collect(&tab.fields, name_prefix, path_prefix, out);
                    }
                }
                "ui" => {}
                "group" => {
                    let Some(name) = &field.name else {
                        // Unnamed groups are presentational.
                        self.collect(&field.fields, name_prefix, path_prefix, out);
                        continue;
                    };
                    let path = format!("{}{}", path_prefix, name);
                    if self.is_excluded(&path, name) {
                        continue;
                    }
                    self.collect(
                        &field.fields,
                        &format!("{}{}.", name_prefix, name),
                        &format!("{}.", path),
                        out,
                    );
                }
                _ => {
                    let Some(name) = &field.name else {
                        continue;
                    };
                    let path = format!("{}{}", path_prefix, name);
                    if self.is_excluded(&path, name) {
                        continue;
                    }
                    let full_name = format!("{}{}", name_prefix, name);
                    if out.iter().any(|d| d.name == full_name) {
                        tracing::warn!(
                            collection = %self.slug,
                            field = %full_name,
                            "Duplicate field name, keeping the first definition"
                        );
                        continue;
                    }
                    let kind = self.classify(field, &path);
                    out.push(FieldDescriptor {
                        name: full_name,
                        kind,
                        required: field.required,
                        has_default: field.default_value.is_some(),
                        description: field.effective_description(),
                        label: field.label.clone(),
                        localized: field.localized,
                    });
                }
            }
        }
    }

    fn is_excluded(&self, path: &str, name: &str) -> bool {
        self.exclude.iter().any(|e| e == path || e == name)
    }

    fn classify(&self, field: &FieldConfig, path: &str) -> FieldKind {
        match field.field_type.as_str() {
            "text" => FieldKind::Text(string_constraints(field)),
            "textarea" => FieldKind::Textarea(string_constraints(field)),
            "email" => FieldKind::Email(string_constraints(field)),
            "code" => FieldKind::Code(string_constraints(field)),
            "number" => FieldKind::Number(NumberConstraints {
                min: field.min,
                max: field.max,
                integer: field.integer,
                has_many: field.has_many,
            }),
            "checkbox" => FieldKind::Checkbox,
            "date" => FieldKind::Date,
            "select" => FieldKind::Select(choice_constraints(field, field.has_many)),
            "radio" => FieldKind::Radio(choice_constraints(field, false)),
            "array" => {
                let mut rows = Vec::new();
                self.collect(&field.fields, "", &format!("{}.", path), &mut rows);
                FieldKind::Array(ArrayConstraints {
                    min_rows: field.min_rows,
                    max_rows: field.max_rows,
                    fields: rows,
                })
            }
            "blocks" => {
                let blocks = field
                    .blocks
                    .iter()
                    .map(|block| {
                        let mut rows = Vec::new();
                        self.collect(&block.fields, "", &format!("{}.", path), &mut rows);
                        BlockDescriptor {
                            slug: block.slug.clone(),
                            fields: rows,
                        }
                    })
                    .collect();
                FieldKind::Blocks(BlocksConstraints {
                    min_rows: field.min_rows,
                    max_rows: field.max_rows,
                    blocks,
                })
            }
            "json" => FieldKind::Json,
            "point" => FieldKind::Point,
            "relationship" => FieldKind::Relationship(RelationConstraints {
                relation_to: relation_targets(field),
                has_many: field.has_many,
            }),
            "upload" => FieldKind::Upload(UploadConstraints {
                relation_to: relation_targets(field),
                has_many: field.has_many,
                mime_types: field.mime_types.clone(),
                max_size: field.max_file_size,
            }),
            "richText" => FieldKind::RichText,
            other => {
                tracing::debug!(
                    collection = %self.slug,
                    field = %path,
                    field_type = %other,
                    "Unrecognized field type"
                );
                FieldKind::Unknown {
                    original: other.to_string(),
                }
            }
        }
    }
}

fn string_constraints(field: &FieldConfig) -> StringConstraints {
    StringConstraints {
        min_length: field.min_length,
        max_length: field.max_length,
        pattern: field.pattern.clone(),
        has_many: field.has_many,
    }
}

fn choice_constraints(field: &FieldConfig, has_many: bool) -> ChoiceConstraints {
    ChoiceConstraints {
        options: field.options.iter().map(|o| o.value().to_string()).collect(),
        has_many,
    }
}

fn relation_targets(field: &FieldConfig) -> Vec<String> {
    field
        .relation_to
        .as_ref()
        .map(|r| r.slugs())
        .unwrap_or_default()
}
