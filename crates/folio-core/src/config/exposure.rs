//! Exposure configuration: which content types become tools, and how.
//!
//! Collections and globals are configured by two independent lists. Each is
//! either the literal `all` or a list of entries, where an entry is a bare
//! slug or a full per-type block:
//!
//! ```yaml
//! collections:
//!   - posts
//!   - slug: pages
//!     operations: { create: true, update: true }
//!     toolPrefix: page
//!     excludeFields: [internalNotes]
//! globals: all
//! ```

use serde::{Deserialize, Serialize};

use crate::operation::OperationOverrides;

/// Exposure settings for collections and globals.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExposureConfig {
    #[serde(default)]
    pub collections: ExposureMode,

    #[serde(default)]
    pub globals: ExposureMode,
}

/// Either every registered type, or an explicit list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExposureMode {
    /// `all`: every registered type except internal ones.
    All(AllTypes),
    /// Explicit selection.
    List(Vec<ExposureEntry>),
}

impl Default for ExposureMode {
    fn default() -> Self {
        ExposureMode::All(AllTypes)
    }
}

impl ExposureMode {
    pub fn is_all(&self) -> bool {
        matches!(self, ExposureMode::All(_))
    }
}

/// Marker type for `all`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AllTypes;

impl TryFrom<String> for AllTypes {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if value == "all" {
            Ok(AllTypes)
        } else {
            Err(format!("Expected 'all', got '{}'", value))
        }
    }
}

impl From<AllTypes> for String {
    fn from(_: AllTypes) -> Self {
        "all".to_string()
    }
}

/// One entry of an explicit exposure list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExposureEntry {
    /// Bare slug, default settings.
    Slug(String),
    /// Slug with per-type settings.
    Configured(TypeExposure),
}

impl ExposureEntry {
    pub fn slug(&self) -> &str {
        match self {
            ExposureEntry::Slug(slug) => slug,
            ExposureEntry::Configured(t) => &t.slug,
        }
    }

    /// Per-type settings; a bare slug yields the defaults.
    pub fn settings(&self) -> TypeExposure {
        match self {
            ExposureEntry::Slug(slug) => TypeExposure::new(slug.clone()),
            ExposureEntry::Configured(t) => t.clone(),
        }
    }
}

/// Per-type exposure settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeExposure {
    pub slug: String,

    /// Shallow-merged over the configured default operations.
    #[serde(default)]
    pub operations: OperationOverrides,

    /// Tool name prefix; defaults to the slug.
    #[serde(default)]
    pub tool_prefix: Option<String>,

    /// Fields (dotted or bare names) never exposed.
    #[serde(default)]
    pub exclude_fields: Vec<String>,

    /// Extra sentence appended to every generated tool description.
    #[serde(default)]
    pub description: Option<String>,
}

impl TypeExposure {
    pub fn new(slug: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            operations: OperationOverrides::default(),
            tool_prefix: None,
            exclude_fields: Vec::new(),
            description: None,
        }
    }
}
