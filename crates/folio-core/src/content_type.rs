//! Content-type definitions as exported by the CMS.
//!
//! These mirror the CMS's own collection/global configuration closely enough
//! to be deserialized straight from an exported JSON or YAML dump. Field
//! configs keep their type tag as a free string: classification into the
//! closed set of field kinds happens in the analyzer, which must stay total
//! over field types it has never seen.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::Path;

use crate::config::ConfigError;

/// Whether a content type is a multi-document collection or a singleton.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentTypeKind {
    #[default]
    Collection,
    Global,
}

/// Singular/plural labels for a collection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Labels {
    #[serde(default)]
    pub singular: Option<String>,
    #[serde(default)]
    pub plural: Option<String>,
}

/// A registered content type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentTypeDefinition {
    /// Unique identifier.
    pub slug: String,

    #[serde(default)]
    pub kind: ContentTypeKind,

    #[serde(default)]
    pub labels: Option<Labels>,

    /// Globals carry a single label instead of singular/plural.
    #[serde(default)]
    pub label: Option<String>,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub fields: Vec<FieldConfig>,

    /// Collection stores credentials (email/password login).
    #[serde(default)]
    pub auth: bool,

    /// Collection stores binary attachments.
    #[serde(default)]
    pub upload: bool,

    #[serde(default = "default_true")]
    pub timestamps: bool,
}

impl ContentTypeDefinition {
    /// Create an empty collection definition.
    pub fn collection(slug: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            kind: ContentTypeKind::Collection,
            labels: None,
            label: None,
            description: None,
            fields: Vec::new(),
            auth: false,
            upload: false,
            timestamps: true,
        }
    }

    /// Create an empty global definition.
    pub fn global(slug: impl Into<String>) -> Self {
        Self {
            kind: ContentTypeKind::Global,
            ..Self::collection(slug)
        }
    }

    /// Add a field (builder style).
    pub fn with_field(mut self, field: FieldConfig) -> Self {
        self.fields.push(field);
        self
    }

    pub fn is_global(&self) -> bool {
        self.kind == ContentTypeKind::Global
    }

    /// Human label: singular label, then global label, then the slug title-cased.
    pub fn display_label(&self) -> String {
        self.labels
            .as_ref()
            .and_then(|l| l.singular.clone())
            .or_else(|| self.label.clone())
            .unwrap_or_else(|| title_case(&self.slug))
    }

    /// Plural label for list descriptions.
    pub fn plural_label(&self) -> String {
        self.labels
            .as_ref()
            .and_then(|l| l.plural.clone())
            .unwrap_or_else(|| title_case(&self.slug))
    }
}

/// A single field as declared in the CMS configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldConfig {
    /// Type tag (`text`, `group`, `richText`, ...). Unknown tags are allowed.
    #[serde(rename = "type")]
    pub field_type: String,

    /// Presentational containers (rows, collapsibles) have no name.
    #[serde(default)]
    pub name: Option<String>,

    #[serde(default)]
    pub label: Option<String>,

    #[serde(default)]
    pub required: bool,

    #[serde(default)]
    pub default_value: Option<Value>,

    #[serde(default)]
    pub localized: bool,

    #[serde(default)]
    pub has_many: bool,

    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub admin: Option<FieldAdmin>,

    // String constraints
    #[serde(default)]
    pub min_length: Option<u64>,
    #[serde(default)]
    pub max_length: Option<u64>,
    #[serde(default)]
    pub pattern: Option<String>,

    // Number constraints
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
    #[serde(default)]
    pub integer: bool,

    // Array/blocks constraints
    #[serde(default)]
    pub min_rows: Option<u64>,
    #[serde(default)]
    pub max_rows: Option<u64>,

    #[serde(default)]
    pub options: Vec<FieldOption>,

    #[serde(default)]
    pub relation_to: Option<RelationTo>,

    /// Child fields of groups, rows, collapsibles and arrays.
    #[serde(default)]
    pub fields: Vec<FieldConfig>,

    #[serde(default)]
    pub tabs: Vec<TabConfig>,

    #[serde(default)]
    pub blocks: Vec<BlockConfig>,

    // Upload constraints
    #[serde(default)]
    pub mime_types: Vec<String>,
    #[serde(default)]
    pub max_file_size: Option<u64>,
}

impl FieldConfig {
    /// Create a field with only a type and a name.
    pub fn new(field_type: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Self::unnamed(field_type)
        }
    }

    /// Create a nameless field (rows, tabs, collapsibles).
    pub fn unnamed(field_type: impl Into<String>) -> Self {
        Self {
            field_type: field_type.into(),
            name: None,
            label: None,
            required: false,
            default_value: None,
            localized: false,
            has_many: false,
            description: None,
            admin: None,
            min_length: None,
            max_length: None,
            pattern: None,
            min: None,
            max: None,
            integer: false,
            min_rows: None,
            max_rows: None,
            options: Vec::new(),
            relation_to: None,
            fields: Vec::new(),
            tabs: Vec::new(),
            blocks: Vec::new(),
            mime_types: Vec::new(),
            max_file_size: None,
        }
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn with_default(mut self, value: Value) -> Self {
        self.default_value = Some(value);
        self
    }

    pub fn with_fields(mut self, fields: Vec<FieldConfig>) -> Self {
        self.fields = fields;
        self
    }

    pub fn with_options<I, S>(mut self, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.options = options
            .into_iter()
            .map(|o| FieldOption::Value(o.into()))
            .collect();
        self
    }

    pub fn with_relation(mut self, slug: impl Into<String>) -> Self {
        self.relation_to = Some(RelationTo::One(slug.into()));
        self
    }

    /// Description from `description` or `admin.description`.
    pub fn effective_description(&self) -> Option<String> {
        self.description
            .clone()
            .or_else(|| self.admin.as_ref().and_then(|a| a.description.clone()))
    }
}

/// Admin-panel metadata we care about.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FieldAdmin {
    #[serde(default)]
    pub description: Option<String>,
}

/// An option of a select or radio field: a bare value or `{label, value}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldOption {
    Value(String),
    Labeled { label: String, value: String },
}

impl FieldOption {
    pub fn value(&self) -> &str {
        match self {
            FieldOption::Value(v) => v,
            FieldOption::Labeled { value, .. } => value,
        }
    }
}

/// Target of a relationship/upload: one slug or several (polymorphic).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RelationTo {
    One(String),
    Many(Vec<String>),
}

impl RelationTo {
    pub fn slugs(&self) -> Vec<String> {
        match self {
            RelationTo::One(s) => vec![s.clone()],
            RelationTo::Many(v) => v.clone(),
        }
    }
}

/// One tab of a `tabs` field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TabConfig {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub fields: Vec<FieldConfig>,
}

/// One block type of a `blocks` field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BlockConfig {
    pub slug: String,
    #[serde(default)]
    pub fields: Vec<FieldConfig>,
}

/// The full set of registered content types.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentTypeSet {
    #[serde(default)]
    pub collections: Vec<ContentTypeDefinition>,
    #[serde(default)]
    pub globals: Vec<ContentTypeDefinition>,
}

impl ContentTypeSet {
    /// Load from a YAML (or JSON) export.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path.as_ref())?;
        Self::from_yaml(&content)
    }

    /// Parse from YAML content. Entries listed under `globals` are forced to
    /// the global kind regardless of what they declare.
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let mut set: ContentTypeSet = serde_yaml::from_str(content)?;
        for global in &mut set.globals {
            global.kind = ContentTypeKind::Global;
        }
        Ok(set)
    }

    /// Merge another set into this one; later definitions replace earlier ones by slug.
    pub fn extend(&mut self, other: ContentTypeSet) {
        for def in other.collections {
            self.collections.retain(|c| c.slug != def.slug);
            self.collections.push(def);
        }
        for def in other.globals {
            self.globals.retain(|g| g.slug != def.slug);
            self.globals.push(def);
        }
    }

    pub fn get_collection(&self, slug: &str) -> Option<&ContentTypeDefinition> {
        self.collections.iter().find(|c| c.slug == slug)
    }

    pub fn get_global(&self, slug: &str) -> Option<&ContentTypeDefinition> {
        self.globals.iter().find(|g| g.slug == slug)
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty() && self.globals.is_empty()
    }
}

fn title_case(slug: &str) -> String {
    slug.split(['-', '_'])
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(first) => first.to_uppercase().chain(chars).collect(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

fn default_true() -> bool {
    true
}
