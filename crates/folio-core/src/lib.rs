//! Folio core types.
//!
//! Shared by every Folio crate: the configuration model loaded from
//! `folio.yaml`, the content-type definitions exported by the CMS, and the
//! operation vocabulary tools are generated for.

pub mod config;
pub mod content_type;
pub mod operation;

pub use config::{
    AuthConfig, ConfigError, EditorProfile, ExposureConfig, ExposureEntry, ExposureMode,
    FolioConfig, McpConfig, RichTextConfig, StoreConfig, Transport, TypeExposure,
};
pub use content_type::{
    BlockConfig, ContentTypeDefinition, ContentTypeKind, ContentTypeSet, FieldConfig, FieldOption,
    Labels, RelationTo, TabConfig,
};
pub use operation::{Operation, OperationClass, OperationOverrides, OperationSet};
