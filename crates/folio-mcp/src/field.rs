//! Field descriptors.
//!
//! A descriptor is the flattened, classified form of one stored field. The
//! kind is a closed sum type: every consumer (schema synthesis, rich-text
//! conversion, output schemas) matches on it exhaustively, and field types
//! the CMS knows but we do not land in [`FieldKind::Unknown`].

use serde::Serialize;

/// One leaf field of a content type, addressed by its dotted path.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor {
    /// Dotted path through enclosing groups, e.g. `seo.title`.
    pub name: String,
    pub kind: FieldKind,
    pub required: bool,
    pub has_default: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    pub localized: bool,
}

impl FieldDescriptor {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            required: false,
            has_default: false,
            description: None,
            label: None,
            localized: false,
        }
    }

    /// Required on create: marked required and no default to fall back on.
    pub fn required_on_create(&self) -> bool {
        self.required && !self.has_default
    }

    /// Path segments of the dotted name.
    pub fn path(&self) -> Vec<&str> {
        self.name.split('.').collect()
    }
}

/// Field kinds with their constraint bundles.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum FieldKind {
    Text(StringConstraints),
    Textarea(StringConstraints),
    Email(StringConstraints),
    Code(StringConstraints),
    Number(NumberConstraints),
    Checkbox,
    Date,
    Select(ChoiceConstraints),
    Radio(ChoiceConstraints),
    Array(ArrayConstraints),
    Blocks(BlocksConstraints),
    Json,
    Point,
    Relationship(RelationConstraints),
    Upload(UploadConstraints),
    RichText,
    /// A field type not in the known set; keeps the original tag.
    Unknown {
        #[serde(rename = "originalType")]
        original: String,
    },
}

impl FieldKind {
    /// Type name as used in the CMS field vocabulary.
    pub fn type_name(&self) -> &'static str {
        match self {
            FieldKind::Text(_) => "text",
            FieldKind::Textarea(_) => "textarea",
            FieldKind::Email(_) => "email",
            FieldKind::Code(_) => "code",
            FieldKind::Number(_) => "number",
            FieldKind::Checkbox => "checkbox",
            FieldKind::Date => "date",
            FieldKind::Select(_) => "select",
            FieldKind::Radio(_) => "radio",
            FieldKind::Array(_) => "array",
            FieldKind::Blocks(_) => "blocks",
            FieldKind::Json => "json",
            FieldKind::Point => "point",
            FieldKind::Relationship(_) => "relationship",
            FieldKind::Upload(_) => "upload",
            FieldKind::RichText => "richText",
            FieldKind::Unknown { .. } => "unknown",
        }
    }

    pub fn is_rich_text(&self) -> bool {
        matches!(self, FieldKind::RichText)
    }
}

/// Constraints on text-like fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StringConstraints {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_length: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    pub has_many: bool,
}

/// Constraints on number fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NumberConstraints {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    pub integer: bool,
    pub has_many: bool,
}

/// Closed option set of select/radio fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChoiceConstraints {
    pub options: Vec<String>,
    pub has_many: bool,
}

/// Row constraints and analyzed row fields of an array field.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArrayConstraints {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_rows: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_rows: Option<u64>,
    /// Row fields, named relative to the row.
    pub fields: Vec<FieldDescriptor>,
}

/// Row constraints and block variants of a blocks field.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BlocksConstraints {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_rows: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_rows: Option<u64>,
    pub blocks: Vec<BlockDescriptor>,
}

impl BlocksConstraints {
    pub fn block(&self, slug: &str) -> Option<&BlockDescriptor> {
        self.blocks.iter().find(|b| b.slug == slug)
    }
}

/// One block variant: its `blockType` slug and analyzed fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BlockDescriptor {
    pub slug: String,
    pub fields: Vec<FieldDescriptor>,
}

/// Targets and cardinality of a relationship field.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RelationConstraints {
    pub relation_to: Vec<String>,
    pub has_many: bool,
}

/// Targets, cardinality and file limits of an upload field.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadConstraints {
    pub relation_to: Vec<String>,
    pub has_many: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub mime_types: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_size: Option<u64>,
}
