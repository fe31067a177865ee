//! Schema synthesis.
//!
//! For every (content type, operation) pair this module builds a typed
//! [`ValidatorSchema`]: a tree of [`ValueRule`]s that the validator checks
//! tool arguments against. The JSON Schema advertised as the tool's
//! `inputSchema` is emitted *from* that tree, so the advertised schema and
//! the enforced one cannot drift apart.
//!
//! Operation shapes:
//!
//! | Operation | Collection                                   | Global                  |
//! |-----------|----------------------------------------------|-------------------------|
//! | list      | page, limit, sort, where, depth, fields, ... | configuration error     |
//! | get       | **id**, depth, fields, locale, draft         | depth, fields, locale.. |
//! | create    | **data**, depth, locale, draft               | configuration error     |
//! | update    | **id**, **data**, depth, locale, draft       | **data**, depth, ...    |
//! | delete    | **id**                                       | configuration error     |

use folio_core::Operation;
use regex::Regex;
use serde_json::{Map, Value, json};

use crate::analyzer::ContentTypeAnalysis;
use crate::error::ToolError;
use crate::field::{FieldDescriptor, FieldKind, StringConstraints};

/// Default page size for `list`.
pub const DEFAULT_LIMIT: u64 = 10;
/// Largest page size accepted by `list`.
pub const MAX_LIMIT: u64 = 100;
/// Deepest relationship population accepted.
pub const MAX_DEPTH: u64 = 10;

// =============================================================================
// RULES
// =============================================================================

/// Validation rule for one JSON value.
#[derive(Debug, Clone)]
pub enum ValueRule {
    String(StringRule),
    Number(NumberRule),
    Boolean,
    /// Closed set of string values.
    Enum(Vec<String>),
    Array(ArrayRule),
    Object(ObjectRule),
    Blocks(BlocksRule),
    /// Document identifier: non-empty string or integer.
    Id,
    /// Relationship target: identifier or embedded document. Nullable.
    Reference,
    /// `[longitude, latitude]`.
    Point,
    /// Rich text at the wire boundary: a markdown string or null.
    Markdown,
    /// Free-form query filter object.
    Filter,
    Any,
}

/// Constraints on a string value.
#[derive(Debug, Clone, Default)]
pub struct StringRule {
    pub min_length: Option<u64>,
    pub max_length: Option<u64>,
    pub pattern: Option<Regex>,
    pub format: Option<StringFormat>,
}

/// Checked string formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StringFormat {
    Email,
    DateTime,
}

/// Constraints on a number value.
#[derive(Debug, Clone, Default)]
pub struct NumberRule {
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub integer: bool,
}

/// Constraints on an array value.
#[derive(Debug, Clone)]
pub struct ArrayRule {
    pub items: Box<ValueRule>,
    pub min_items: Option<u64>,
    pub max_items: Option<u64>,
}

/// An object with known properties.
#[derive(Debug, Clone, Default)]
pub struct ObjectRule {
    pub properties: Vec<PropertyRule>,
    /// Keys not listed in `properties` are accepted and preserved.
    pub allow_unknown: bool,
}

/// One named property of an object rule.
#[derive(Debug, Clone)]
pub struct PropertyRule {
    pub name: String,
    pub rule: ValueRule,
    pub required: bool,
    pub description: Option<String>,
    pub default: Option<Value>,
}

/// Array of block rows discriminated by `blockType`.
#[derive(Debug, Clone)]
pub struct BlocksRule {
    pub variants: Vec<BlockVariant>,
    pub min_items: Option<u64>,
    pub max_items: Option<u64>,
}

/// One block type and the fields of its rows.
#[derive(Debug, Clone)]
pub struct BlockVariant {
    pub slug: String,
    pub fields: ObjectRule,
}

impl BlocksRule {
    pub fn variant(&self, slug: &str) -> Option<&BlockVariant> {
        self.variants.iter().find(|v| v.slug == slug)
    }
}

impl PropertyRule {
    pub fn new(name: impl Into<String>, rule: ValueRule) -> Self {
        Self {
            name: name.into(),
            rule,
            required: false,
            description: None,
            default: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn describe(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = Some(default);
        self
    }
}

impl ObjectRule {
    /// Object that rejects keys it does not list.
    pub fn strict(properties: Vec<PropertyRule>) -> Self {
        Self {
            properties,
            allow_unknown: false,
        }
    }

    /// Object that preserves keys it does not list.
    pub fn open(properties: Vec<PropertyRule>) -> Self {
        Self {
            properties,
            allow_unknown: true,
        }
    }

    pub fn property(&self, name: &str) -> Option<&PropertyRule> {
        self.properties.iter().find(|p| p.name == name)
    }

    fn any_required(&self) -> bool {
        self.properties.iter().any(|p| p.required)
    }
}

/// The synthesized input validator for one tool.
#[derive(Debug, Clone)]
pub struct ValidatorSchema {
    pub collection: String,
    pub operation: Operation,
    pub is_global: bool,
    /// Rule for the whole `arguments` object.
    pub root: ObjectRule,
}

// =============================================================================
// BUILDERS
// =============================================================================

/// Whether required-without-default fields are enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DataMode {
    Create,
    Update,
}

/// Build the input validator for `operation` on `analysis`.
///
/// Fails with a configuration error for operations a global cannot support.
pub fn build_validator(
    analysis: &ContentTypeAnalysis,
    operation: Operation,
) -> Result<ValidatorSchema, ToolError> {
    let root = if analysis.is_global {
        global_arguments(analysis, operation)?
    } else {
        collection_arguments(analysis, operation)
    };

    Ok(ValidatorSchema {
        collection: analysis.slug.clone(),
        operation,
        is_global: analysis.is_global,
        root,
    })
}

fn collection_arguments(analysis: &ContentTypeAnalysis, operation: Operation) -> ObjectRule {
    match operation {
        Operation::List => ObjectRule::strict(vec![
            page_param(),
            limit_param(),
            sort_param(),
            where_param(),
            depth_param(),
            fields_param(),
            locale_param(),
            draft_param(),
        ]),
        Operation::Get => ObjectRule::strict(vec![
            id_param(&analysis.label),
            depth_param(),
            fields_param(),
            locale_param(),
            draft_param(),
        ]),
        Operation::Create => ObjectRule::strict(vec![
            data_param(analysis, DataMode::Create),
            depth_param(),
            locale_param(),
            draft_param(),
        ]),
        Operation::Update => ObjectRule::strict(vec![
            id_param(&analysis.label),
            data_param(analysis, DataMode::Update),
            depth_param(),
            locale_param(),
            draft_param(),
        ]),
        Operation::Delete => ObjectRule::strict(vec![id_param(&analysis.label)]),
    }
}

fn global_arguments(
    analysis: &ContentTypeAnalysis,
    operation: Operation,
) -> Result<ObjectRule, ToolError> {
    match operation {
        Operation::Get => Ok(ObjectRule::strict(vec![
            depth_param(),
            fields_param(),
            locale_param(),
            draft_param(),
        ])),
        Operation::Update => Ok(ObjectRule::strict(vec![
            data_param(analysis, DataMode::Update),
            depth_param(),
            locale_param(),
            draft_param(),
        ])),
        Operation::List | Operation::Create | Operation::Delete => {
            Err(ToolError::configuration(format!(
                "Global '{}' does not support the '{}' operation",
                analysis.slug, operation
            )))
        }
    }
}

fn integer(min: Option<f64>, max: Option<f64>) -> ValueRule {
    ValueRule::Number(NumberRule {
        min,
        max,
        integer: true,
    })
}

fn page_param() -> PropertyRule {
    PropertyRule::new("page", integer(Some(1.0), None)).describe("Page number, starting at 1")
}

fn limit_param() -> PropertyRule {
    PropertyRule::new("limit", integer(Some(1.0), Some(MAX_LIMIT as f64)))
        .describe(format!("Documents per page (1-{})", MAX_LIMIT))
        .with_default(json!(DEFAULT_LIMIT))
}

fn sort_param() -> PropertyRule {
    PropertyRule::new("sort", ValueRule::String(StringRule::default()))
        .describe("Field to sort by; prefix with '-' for descending order")
}

fn where_param() -> PropertyRule {
    PropertyRule::new("where", ValueRule::Filter).describe(
        "Filter, e.g. {\"status\": {\"equals\": \"published\"}}. A JSON-encoded string is also accepted",
    )
}

fn depth_param() -> PropertyRule {
    PropertyRule::new("depth", integer(Some(0.0), Some(MAX_DEPTH as f64)))
        .describe("Relationship population depth (0-10)")
}

fn fields_param() -> PropertyRule {
    PropertyRule::new(
        "fields",
        ValueRule::Array(ArrayRule {
            items: Box::new(ValueRule::String(StringRule::default())),
            min_items: None,
            max_items: None,
        }),
    )
    .describe("Fields to return (dot paths); 'id' is always included")
}

fn locale_param() -> PropertyRule {
    PropertyRule::new("locale", ValueRule::String(StringRule::default()))
        .describe("Locale of localized fields")
}

fn draft_param() -> PropertyRule {
    PropertyRule::new("draft", ValueRule::Boolean).describe("Operate on the draft version")
}

fn id_param(label: &str) -> PropertyRule {
    PropertyRule::new("id", ValueRule::Id)
        .required()
        .describe(format!("ID of the {}", label))
}

fn data_param(analysis: &ContentTypeAnalysis, mode: DataMode) -> PropertyRule {
    let description = match mode {
        DataMode::Create => format!(
            "{} fields. Rich-text fields take markdown. A JSON-encoded string is also accepted",
            analysis.label
        ),
        DataMode::Update => format!(
            "{} fields to change; omitted fields are left as they are. Rich-text fields take markdown",
            analysis.label
        ),
    };
    PropertyRule::new(
        "data",
        ValueRule::Object(object_rule(&analysis.fields, mode)),
    )
    .required()
    .describe(description)
}

/// Build a nested object rule from descriptors with dotted names.
fn object_rule(fields: &[FieldDescriptor], mode: DataMode) -> ObjectRule {
    let entries: Vec<(Vec<&str>, &FieldDescriptor)> =
        fields.iter().map(|f| (f.path(), f)).collect();
    nest(&entries, mode)
}

fn nest(entries: &[(Vec<&str>, &FieldDescriptor)], mode: DataMode) -> ObjectRule {
    let mut object = ObjectRule::open(Vec::new());
    let mut groups_done: Vec<&str> = Vec::new();

    for (path, field) in entries {
        match path.as_slice() {
            [] => {}
            [leaf] => {
                let mut prop = PropertyRule::new(*leaf, value_rule(&field.kind, mode));
                prop.required = mode == DataMode::Create && field.required_on_create();
                prop.description = field.description.clone();
                object.properties.push(prop);
            }
            [group, ..] => {
                if groups_done.contains(group) {
                    continue;
                }
                groups_done.push(*group);
                let children: Vec<(Vec<&str>, &FieldDescriptor)> = entries
                    .iter()
                    .filter(|(p, _)| p.len() > 1 && p[0] == *group)
                    .map(|(p, f)| (p[1..].to_vec(), *f))
                    .collect();
                let child = nest(&children, mode);
                let mut prop = PropertyRule::new(*group, ValueRule::Object(child));
                if let ValueRule::Object(o) = &prop.rule {
                    prop.required = o.any_required();
                }
                object.properties.push(prop);
            }
        }
    }

    object
}

fn many(has_many: bool, rule: ValueRule) -> ValueRule {
    if has_many {
        ValueRule::Array(ArrayRule {
            items: Box::new(rule),
            min_items: None,
            max_items: None,
        })
    } else {
        rule
    }
}

fn string_rule(c: &StringConstraints, format: Option<StringFormat>) -> StringRule {
    let pattern = c.pattern.as_deref().and_then(|p| match Regex::new(p) {
        Ok(re) => Some(re),
        Err(e) => {
            tracing::warn!(pattern = %p, error = %e, "Ignoring invalid field pattern");
            None
        }
    });
    StringRule {
        min_length: c.min_length,
        max_length: c.max_length,
        pattern,
        format,
    }
}

fn value_rule(kind: &FieldKind, mode: DataMode) -> ValueRule {
    match kind {
        FieldKind::Text(c) | FieldKind::Textarea(c) | FieldKind::Code(c) => {
            many(c.has_many, ValueRule::String(string_rule(c, None)))
        }
        FieldKind::Email(c) => many(
            c.has_many,
            ValueRule::String(string_rule(c, Some(StringFormat::Email))),
        ),
        FieldKind::Number(c) => many(
            c.has_many,
            ValueRule::Number(NumberRule {
                min: c.min,
                max: c.max,
                integer: c.integer,
            }),
        ),
        FieldKind::Checkbox => ValueRule::Boolean,
        FieldKind::Date => ValueRule::String(StringRule {
            format: Some(StringFormat::DateTime),
            ..Default::default()
        }),
        FieldKind::Select(c) | FieldKind::Radio(c) => {
            let rule = if c.options.is_empty() {
                ValueRule::String(StringRule::default())
            } else {
                ValueRule::Enum(c.options.clone())
            };
            many(c.has_many, rule)
        }
        FieldKind::Array(a) => ValueRule::Array(ArrayRule {
            items: Box::new(ValueRule::Object(object_rule(&a.fields, mode))),
            min_items: a.min_rows,
            max_items: a.max_rows,
        }),
        FieldKind::Blocks(b) => ValueRule::Blocks(BlocksRule {
            variants: b
                .blocks
                .iter()
                .map(|block| BlockVariant {
                    slug: block.slug.clone(),
                    fields: object_rule(&block.fields, mode),
                })
                .collect(),
            min_items: b.min_rows,
            max_items: b.max_rows,
        }),
        FieldKind::Json | FieldKind::Unknown { .. } => ValueRule::Any,
        FieldKind::Point => ValueRule::Point,
        FieldKind::Relationship(r) => many(r.has_many, ValueRule::Reference),
        FieldKind::Upload(u) => many(u.has_many, ValueRule::Reference),
        FieldKind::RichText => ValueRule::Markdown,
    }
}

// =============================================================================
// JSON SCHEMA EMISSION
// =============================================================================

impl ValidatorSchema {
    /// The JSON Schema advertised as the tool's `inputSchema`.
    pub fn to_json_schema(&self) -> Value {
        self.root.to_json_schema()
    }
}

impl ObjectRule {
    pub fn to_json_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();
        for prop in &self.properties {
            let mut schema = prop.rule.to_json_schema();
            if let Some(obj) = schema.as_object_mut() {
                if let Some(description) = &prop.description {
                    obj.insert("description".to_string(), json!(description));
                }
                if let Some(default) = &prop.default {
                    obj.insert("default".to_string(), default.clone());
                }
            }
            properties.insert(prop.name.clone(), schema);
            if prop.required {
                required.push(json!(prop.name));
            }
        }

        let mut schema = json!({
            "type": "object",
            "properties": properties,
        });
        if !required.is_empty() {
            schema["required"] = Value::Array(required);
        }
        if !self.allow_unknown {
            schema["additionalProperties"] = json!(false);
        }
        schema
    }
}

impl ValueRule {
    pub fn to_json_schema(&self) -> Value {
        match self {
            ValueRule::String(rule) => {
                let mut schema = json!({ "type": "string" });
                if let Some(min) = rule.min_length {
                    schema["minLength"] = json!(min);
                }
                if let Some(max) = rule.max_length {
                    schema["maxLength"] = json!(max);
                }
                if let Some(pattern) = &rule.pattern {
                    schema["pattern"] = json!(pattern.as_str());
                }
                match rule.format {
                    Some(StringFormat::Email) => schema["format"] = json!("email"),
                    Some(StringFormat::DateTime) => {
                        schema["anyOf"] = json!([{ "format": "date-time" }, { "format": "date" }])
                    }
                    None => {}
                }
                schema
            }
            ValueRule::Number(rule) => {
                let mut schema = json!({
                    "type": if rule.integer { "integer" } else { "number" }
                });
                if let Some(min) = rule.min {
                    schema["minimum"] = json!(min);
                }
                if let Some(max) = rule.max {
                    schema["maximum"] = json!(max);
                }
                schema
            }
            ValueRule::Boolean => json!({ "type": "boolean" }),
            ValueRule::Enum(options) => json!({ "type": "string", "enum": options }),
            ValueRule::Array(rule) => {
                let mut schema = json!({
                    "type": "array",
                    "items": rule.items.to_json_schema(),
                });
                if let Some(min) = rule.min_items {
                    schema["minItems"] = json!(min);
                }
                if let Some(max) = rule.max_items {
                    schema["maxItems"] = json!(max);
                }
                schema
            }
            ValueRule::Object(rule) => rule.to_json_schema(),
            ValueRule::Blocks(rule) => {
                let variants: Vec<Value> = rule
                    .variants
                    .iter()
                    .map(|variant| {
                        let mut schema = variant.fields.to_json_schema();
                        schema["properties"]["blockType"] = json!({ "const": variant.slug });
                        let mut required = vec![json!("blockType")];
                        if let Some(Value::Array(existing)) = schema.get("required") {
                            required.extend(existing.iter().cloned());
                        }
                        schema["required"] = Value::Array(required);
                        schema
                    })
                    .collect();
                let mut schema = json!({
                    "type": "array",
                    "items": { "oneOf": variants },
                });
                if let Some(min) = rule.min_items {
                    schema["minItems"] = json!(min);
                }
                if let Some(max) = rule.max_items {
                    schema["maxItems"] = json!(max);
                }
                schema
            }
            ValueRule::Id => json!({ "type": ["string", "integer"], "minLength": 1 }),
            ValueRule::Reference => json!({
                "type": ["string", "number", "object", "null"],
                "description": "ID of the related document, or the document itself",
            }),
            ValueRule::Point => json!({
                "type": "array",
                "items": { "type": "number" },
                "minItems": 2,
                "maxItems": 2,
                "description": "[longitude, latitude]",
            }),
            ValueRule::Markdown => json!({
                "type": ["string", "null"],
                "description": "Markdown text",
            }),
            ValueRule::Filter => json!({ "type": "object" }),
            ValueRule::Any => json!({}),
        }
    }
}

// =============================================================================
// DOCUMENT AND OUTPUT SCHEMAS
// =============================================================================

/// Structural schema of a stored document as returned by tools.
///
/// Includes the system fields the input schemas leave out. Rich-text fields
/// appear as markdown strings since that is what the read path returns.
pub fn build_doc_schema(analysis: &ContentTypeAnalysis) -> Value {
    let mut document = object_rule(&analysis.fields, DataMode::Update);
    let mut system = Vec::new();

    if !analysis.is_global {
        system.push(PropertyRule::new("id", ValueRule::Id).required());
    }
    if analysis.has_auth {
        system.push(PropertyRule::new(
            "email",
            ValueRule::String(StringRule {
                format: Some(StringFormat::Email),
                ..Default::default()
            }),
        ));
    }
    if analysis.has_upload {
        let text = || ValueRule::String(StringRule::default());
        system.push(PropertyRule::new("filename", text()));
        system.push(PropertyRule::new("mimeType", text()));
        system.push(PropertyRule::new("filesize", integer(Some(0.0), None)));
        system.push(PropertyRule::new("url", text()));
    }
    if analysis.timestamps {
        let timestamp = || {
            ValueRule::String(StringRule {
                format: Some(StringFormat::DateTime),
                ..Default::default()
            })
        };
        system.push(PropertyRule::new("createdAt", timestamp()));
        system.push(PropertyRule::new("updatedAt", timestamp()));
    }

    system.append(&mut document.properties);
    document.properties = system;
    document.to_json_schema()
}

/// Output schema of the tool for `operation`.
pub fn build_output_schema(analysis: &ContentTypeAnalysis, operation: Operation) -> Value {
    let document = build_doc_schema(analysis);
    match operation {
        Operation::List => json!({
            "type": "object",
            "properties": {
                "docs": { "type": "array", "items": document },
                "totalDocs": { "type": "integer" },
                "page": { "type": "integer" },
                "limit": { "type": "integer" },
                "totalPages": { "type": "integer" },
                "hasNextPage": { "type": "boolean" },
                "hasPrevPage": { "type": "boolean" },
            },
            "required": ["docs", "totalDocs"],
        }),
        Operation::Get | Operation::Create | Operation::Update => document,
        Operation::Delete => json!({
            "type": "object",
            "properties": {
                "id": { "type": ["string", "integer"] },
                "deleted": { "type": "boolean" },
            },
            "required": ["id", "deleted"],
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyzer::{AnalyzeOptions, analyze};
    use folio_core::{ContentTypeDefinition, FieldConfig, OperationSet};

    fn article() -> ContentTypeAnalysis {
        let def = ContentTypeDefinition::collection("article")
            .with_field(FieldConfig::new("text", "title").required())
            .with_field(FieldConfig::new("richText", "body"))
            .with_field(FieldConfig::new("group", "seo").with_fields(vec![
                FieldConfig::new("text", "title").required(),
                FieldConfig::new("textarea", "description"),
            ]));
        analyze(
            &def,
            AnalyzeOptions {
                operations: OperationSet::all(),
                ..Default::default()
            },
        )
    }

    #[test]
    fn test_create_schema_requires_title() {
        let schema = build_validator(&article(), Operation::Create)
            .unwrap()
            .to_json_schema();
        assert_eq!(schema["required"], json!(["data"]));
        assert_eq!(schema["additionalProperties"], json!(false));
        let data = &schema["properties"]["data"];
        assert_eq!(data["required"], json!(["title", "seo"]));
        assert!(data.get("additionalProperties").is_none());
        assert_eq!(data["properties"]["seo"]["required"], json!(["title"]));
        assert_eq!(data["properties"]["body"]["type"], json!(["string", "null"]));
    }

    #[test]
    fn test_update_schema_requires_nothing_in_data() {
        let schema = build_validator(&article(), Operation::Update)
            .unwrap()
            .to_json_schema();
        assert_eq!(schema["required"], json!(["id", "data"]));
        assert!(schema["properties"]["data"].get("required").is_none());
    }

    #[test]
    fn test_list_schema_bounds() {
        let schema = build_validator(&article(), Operation::List)
            .unwrap()
            .to_json_schema();
        let limit = &schema["properties"]["limit"];
        assert_eq!(limit["minimum"], json!(1.0));
        assert_eq!(limit["maximum"], json!(100.0));
        assert_eq!(limit["default"], json!(10));
        assert_eq!(schema["properties"]["depth"]["maximum"], json!(10.0));
        assert!(schema.get("required").is_none());
    }

    #[test]
    fn test_global_rejects_delete() {
        let def = ContentTypeDefinition::global("settings")
            .with_field(FieldConfig::new("text", "siteName"));
        let analysis = analyze(&def, AnalyzeOptions::default());
        let err = build_validator(&analysis, Operation::Delete).unwrap_err();
        assert_eq!(err.kind(), crate::error::ToolErrorKind::Configuration);

        let get = build_validator(&analysis, Operation::Get).unwrap().to_json_schema();
        assert!(get["properties"].get("id").is_none());
    }

    #[test]
    fn test_doc_schema_includes_system_fields() {
        let schema = build_doc_schema(&article());
        let props = schema["properties"].as_object().unwrap();
        assert!(props.contains_key("id"));
        assert!(props.contains_key("createdAt"));
        assert!(props.contains_key("updatedAt"));
        assert!(props["seo"]["properties"].get("description").is_some());
    }

    #[test]
    fn test_output_schemas() {
        let analysis = article();
        let list = build_output_schema(&analysis, Operation::List);
        assert_eq!(list["properties"]["docs"]["type"], "array");
        let delete = build_output_schema(&analysis, Operation::Delete);
        assert_eq!(delete["required"], json!(["id", "deleted"]));
    }

    #[test]
    fn test_select_has_many_and_blocks() {
        let mut blocks = FieldConfig::new("blocks", "layout");
        blocks.blocks = vec![folio_core::BlockConfig {
            slug: "cta".to_string(),
            fields: vec![FieldConfig::new("text", "label").required()],
        }];
        let mut tags = FieldConfig::new("select", "tags").with_options(["a", "b"]);
        tags.has_many = true;
        let def = ContentTypeDefinition::collection("pages")
            .with_field(tags)
            .with_field(blocks);
        let analysis = analyze(&def, AnalyzeOptions::default());
        let schema = build_validator(&analysis, Operation::Create)
            .unwrap()
            .to_json_schema();
        let data = &schema["properties"]["data"]["properties"];
        assert_eq!(data["tags"]["type"], "array");
        assert_eq!(data["tags"]["items"]["enum"], json!(["a", "b"]));
        let variant = &data["layout"]["items"]["oneOf"][0];
        assert_eq!(variant["properties"]["blockType"]["const"], "cta");
        assert_eq!(variant["required"], json!(["blockType", "label"]));
    }
}
