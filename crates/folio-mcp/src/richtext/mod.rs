//! Rich-text bridge.
//!
//! Agents read and write markdown; the CMS stores an editor node tree. The
//! write path converts exactly the `richText` fields named by the analysis
//! (including those inside array rows and blocks). The read path walks whole
//! results by shape, since populated relations carry rich text the requested
//! type's descriptors know nothing about.

mod markdown;
mod nodes;
mod render;
mod walk;

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use folio_core::{ConfigError, EditorProfile, RichTextConfig};
use serde_json::{Map, Value};
use thiserror::Error;
use tokio::sync::OnceCell;

use crate::error::ToolError;
use crate::field::{FieldDescriptor, FieldKind};

pub use markdown::to_storage_format;
pub use nodes::{FORMAT_BOLD, FORMAT_CODE, FORMAT_ITALIC, FORMAT_STRIKETHROUGH, FORMAT_UNDERLINE};
pub use render::to_wire_format;
pub use walk::{LexicalShape, ReadWalker, StorageShape, relation_keys};

/// Storage tree could not be rendered as markdown.
#[derive(Debug, Error, PartialEq)]
pub enum ConversionError {
    #[error("malformed rich-text tree: {0}")]
    Malformed(String),

    #[error("rich-text tree nested deeper than {0} levels")]
    TooDeep(usize),
}

// =============================================================================
// Editor profile
// =============================================================================

/// Where the editor profile comes from.
#[async_trait]
pub trait ProfileSource: Send + Sync {
    async fn load(&self) -> Result<EditorProfile, ConfigError>;
}

/// A profile known up front.
pub struct StaticProfile(pub EditorProfile);

#[async_trait]
impl ProfileSource for StaticProfile {
    async fn load(&self) -> Result<EditorProfile, ConfigError> {
        Ok(self.0.clone())
    }
}

/// A profile read from a YAML or JSON file.
pub struct FileProfile {
    path: PathBuf,
}

impl FileProfile {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl ProfileSource for FileProfile {
    async fn load(&self) -> Result<EditorProfile, ConfigError> {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || EditorProfile::from_file(path))
            .await
            .map_err(|e| ConfigError::Config(format!("profile loader panicked: {}", e)))?
    }
}

/// Loads the profile once, on first use. Concurrent first callers wait for
/// the same load.
pub struct ProfileCache {
    source: Arc<dyn ProfileSource>,
    cell: OnceCell<EditorProfile>,
}

impl ProfileCache {
    pub fn new(source: Arc<dyn ProfileSource>) -> Self {
        Self {
            source,
            cell: OnceCell::new(),
        }
    }

    pub fn fixed(profile: EditorProfile) -> Self {
        Self::new(Arc::new(StaticProfile(profile)))
    }

    pub fn from_config(config: &RichTextConfig) -> Self {
        match &config.editor_file {
            Some(path) => Self::new(Arc::new(FileProfile::new(path))),
            None => Self::fixed(config.editor.clone()),
        }
    }

    /// The profile; a failed load falls back to the default profile.
    pub async fn get(&self) -> &EditorProfile {
        self.cell
            .get_or_init(|| async {
                match self.source.load().await {
                    Ok(profile) => profile,
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to load editor profile; using defaults");
                        EditorProfile::default()
                    }
                }
            })
            .await
    }
}

// =============================================================================
// Bridge
// =============================================================================

pub struct RichTextBridge {
    profiles: ProfileCache,
    list_truncate: Option<usize>,
    shape: Arc<dyn StorageShape>,
}

impl RichTextBridge {
    pub fn new(profiles: ProfileCache, list_truncate: Option<usize>) -> Self {
        Self {
            profiles,
            list_truncate,
            shape: Arc::new(LexicalShape),
        }
    }

    pub fn from_config(config: &RichTextConfig) -> Self {
        Self::new(ProfileCache::from_config(config), config.list_truncate_chars)
    }

    pub fn with_shape(mut self, shape: Arc<dyn StorageShape>) -> Self {
        self.shape = shape;
        self
    }

    pub fn list_truncate(&self) -> Option<usize> {
        self.list_truncate
    }

    /// Convert one markdown string with the loaded profile.
    pub async fn to_storage(&self, markdown: &str) -> Value {
        to_storage_format(markdown, self.profiles.get().await)
    }

    /// Convert the rich-text fields of a write payload to storage trees.
    ///
    /// Absent and `null` values pass through. Anything other than a string
    /// is rejected.
    pub async fn convert_input(
        &self,
        data: &mut Map<String, Value>,
        fields: &[FieldDescriptor],
    ) -> Result<usize, ToolError> {
        let profile = self.profiles.get().await;
        convert_fields(data, fields, profile, "data")
    }

    /// Convert stored trees in a result back to markdown, truncating them
    /// when `truncate` is set and a budget is configured. `fields` name the
    /// relation boundaries that count toward `max_hops`.
    pub fn convert_output(
        &self,
        value: &mut Value,
        fields: &[FieldDescriptor],
        truncate: bool,
        max_hops: usize,
    ) -> usize {
        let budget = if truncate { self.list_truncate } else { None };
        ReadWalker::new(self.shape.as_ref(), max_hops)
            .with_relations(relation_keys(fields))
            .with_truncate(budget)
            .walk(value)
    }
}

fn convert_fields(
    map: &mut Map<String, Value>,
    fields: &[FieldDescriptor],
    profile: &EditorProfile,
    prefix: &str,
) -> Result<usize, ToolError> {
    let mut converted = 0;
    for field in fields {
        let segments = field.path();
        let Some(slot) = slot_mut(map, &segments) else {
            continue;
        };
        let path = format!("{}.{}", prefix, field.name);

        match &field.kind {
            FieldKind::RichText => match slot {
                Value::Null => {}
                Value::String(markdown) => {
                    *slot = to_storage_format(markdown, profile);
                    converted += 1;
                }
                _ => {
                    return Err(ToolError::conversion(
                        path,
                        "expected a markdown string; structured rich-text trees are not accepted",
                    ));
                }
            },
            FieldKind::Array(constraints) => {
                if let Value::Array(rows) = slot {
                    for (i, row) in rows.iter_mut().enumerate() {
                        if let Value::Object(row) = row {
                            converted += convert_fields(
                                row,
                                &constraints.fields,
                                profile,
                                &format!("{}[{}]", path, i),
                            )?;
                        }
                    }
                }
            }
            FieldKind::Blocks(constraints) => {
                if let Value::Array(rows) = slot {
                    for (i, row) in rows.iter_mut().enumerate() {
                        let Value::Object(row) = row else {
                            continue;
                        };
                        let block = row
                            .get("blockType")
                            .and_then(Value::as_str)
                            .and_then(|slug| constraints.block(slug));
                        if let Some(block) = block {
                            converted += convert_fields(
                                row,
                                &block.fields,
                                profile,
                                &format!("{}[{}]", path, i),
                            )?;
                        }
                    }
                }
            }
            _ => {}
        }
    }
    Ok(converted)
}

fn slot_mut<'a>(map: &'a mut Map<String, Value>, path: &[&str]) -> Option<&'a mut Value> {
    let (last, parents) = path.split_last()?;
    let mut current = map;
    for segment in parents {
        current = current.get_mut(*segment)?.as_object_mut()?;
    }
    current.get_mut(*last)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::field::{ArrayConstraints, BlockDescriptor, BlocksConstraints};
    use crate::error::ToolErrorKind;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingSource(AtomicUsize);

    #[async_trait]
    impl ProfileSource for CountingSource {
        async fn load(&self) -> Result<EditorProfile, ConfigError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(EditorProfile::minimal())
        }
    }

    struct FailingSource;

    #[async_trait]
    impl ProfileSource for FailingSource {
        async fn load(&self) -> Result<EditorProfile, ConfigError> {
            Err(ConfigError::Config("unreachable".into()))
        }
    }

    fn fields() -> Vec<FieldDescriptor> {
        vec![
            FieldDescriptor::new("body", FieldKind::RichText),
            FieldDescriptor::new("seo.summary", FieldKind::RichText),
            FieldDescriptor::new(
                "sections",
                FieldKind::Array(ArrayConstraints {
                    fields: vec![FieldDescriptor::new("content", FieldKind::RichText)],
                    ..Default::default()
                }),
            ),
            FieldDescriptor::new(
                "layout",
                FieldKind::Blocks(BlocksConstraints {
                    blocks: vec![BlockDescriptor {
                        slug: "text".into(),
                        fields: vec![FieldDescriptor::new("copy", FieldKind::RichText)],
                    }],
                    ..Default::default()
                }),
            ),
        ]
    }

    fn bridge() -> RichTextBridge {
        RichTextBridge::new(ProfileCache::fixed(EditorProfile::default()), Some(200))
    }

    #[tokio::test]
    async fn test_profile_loaded_once() {
        let source = Arc::new(CountingSource(AtomicUsize::new(0)));
        let cache = Arc::new(ProfileCache::new(source.clone()));
        let mut handles = Vec::new();
        for _ in 0..8 {
            let cache = cache.clone();
            handles.push(tokio::spawn(async move { cache.get().await.lists }));
        }
        for handle in handles {
            assert!(!handle.await.unwrap());
        }
        assert_eq!(source.0.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_profile_load_failure_uses_default() {
        let cache = ProfileCache::new(Arc::new(FailingSource));
        assert_eq!(cache.get().await, &EditorProfile::default());
    }

    #[tokio::test]
    async fn test_profile_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("editor.yaml");
        std::fs::write(&path, "headings: [2]\nlists: false\n").unwrap();
        let cache = ProfileCache::new(Arc::new(FileProfile::new(&path)));
        let profile = cache.get().await;
        assert_eq!(profile.headings, vec![2]);
        assert!(!profile.lists);
        assert!(profile.links);
    }

    #[tokio::test]
    async fn test_convert_input_reaches_groups_rows_and_blocks() {
        let mut data = json!({
            "title": "Hi",
            "body": "# Heading",
            "seo": { "summary": "*short*" },
            "sections": [ { "content": "row one" }, { "content": null } ],
            "layout": [ { "blockType": "text", "copy": "block copy" }, { "blockType": "other", "copy": "left" } ],
        });
        let map = data.as_object_mut().unwrap();
        let converted = bridge().convert_input(map, &fields()).await.unwrap();
        assert_eq!(converted, 4);
        assert_eq!(data["title"], "Hi");
        assert_eq!(data["body"]["root"]["children"][0]["type"], "heading");
        assert!(data["seo"]["summary"]["root"].is_object());
        assert!(data["sections"][0]["content"]["root"].is_object());
        assert!(data["sections"][1]["content"].is_null());
        assert!(data["layout"][0]["copy"]["root"].is_object());
        assert_eq!(data["layout"][1]["copy"], "left");
    }

    #[tokio::test]
    async fn test_convert_input_rejects_trees() {
        let mut data = json!({ "sections": [ { "content": { "root": {} } } ] });
        let err = bridge()
            .convert_input(data.as_object_mut().unwrap(), &fields())
            .await
            .unwrap_err();
        assert_eq!(err.kind(), ToolErrorKind::Conversion);
        assert_eq!(err.field.as_deref(), Some("data.sections[0].content"));
    }

    #[tokio::test]
    async fn test_disabled_feature_degrades_on_write() {
        let bridge = RichTextBridge::new(ProfileCache::fixed(EditorProfile::minimal()), None);
        let tree = bridge.to_storage("# Title").await;
        assert_eq!(tree["root"]["children"][0]["type"], "paragraph");
    }

    #[tokio::test]
    async fn test_round_trip() {
        let markdown = "# Title\n\nHello **bold** and *it* with `code` and [a link](https://example.com).\n\n- one\n- two\n\n1. first\n2. second\n\n> quoted\n\n```rust\nfn main() {}\n```\n\n---\n\n~~struck~~ 2 \\* 3";
        let tree = bridge().to_storage(markdown).await;
        let rendered = to_wire_format(&tree).unwrap();
        let again = bridge().to_storage(&rendered).await;
        assert_eq!(tree, again);
        assert_eq!(to_wire_format(&again).unwrap(), rendered);
    }

    #[test]
    fn test_convert_output_truncates_only_when_asked() {
        let long = "a".repeat(5000);
        let tree = to_storage_format(&long, &EditorProfile::default());
        let doc = json!({ "id": "1", "body": tree });

        let mut listed = json!({ "docs": [doc.clone()] });
        bridge().convert_output(&mut listed, &[], true, 3);
        assert_eq!(listed["docs"][0]["body"].as_str().unwrap().chars().count(), 203);

        let mut fetched = doc;
        bridge().convert_output(&mut fetched, &[], false, 3);
        assert_eq!(fetched["body"].as_str().unwrap().len(), 5000);
    }
}
