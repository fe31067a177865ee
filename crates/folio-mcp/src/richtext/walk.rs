//! Read-path walk over store results.
//!
//! Store results can embed populated relations to any depth, so rich-text
//! values are found by shape rather than by field descriptor. The walk is
//! bounded twice: by relation hops and by a hard nesting cap. The document
//! itself is the first hop; each step into a relationship or upload key is
//! another. Array and block rows carry an `id` too but never count.

use std::collections::HashSet;

use serde_json::Value;

use crate::field::{FieldDescriptor, FieldKind};

use super::to_wire_format;

/// Hard cap on JSON nesting visited by the walk.
const MAX_NESTING: usize = 64;

/// Recognizes stored rich-text values.
pub trait StorageShape: Send + Sync {
    fn matches(&self, value: &Value) -> bool;
}

/// Matches `{"root": {"type": "root", "children": [...]}}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LexicalShape;

impl StorageShape for LexicalShape {
    fn matches(&self, value: &Value) -> bool {
        value
            .get("root")
            .map(|root| {
                root.get("type").and_then(Value::as_str) == Some("root")
                    && root.get("children").map(Value::is_array).unwrap_or(false)
            })
            .unwrap_or(false)
    }
}

/// Bare keys of every relationship and upload field, rows and blocks included.
pub fn relation_keys(fields: &[FieldDescriptor]) -> HashSet<String> {
    let mut keys = HashSet::new();
    collect_relation_keys(fields, &mut keys);
    keys
}

fn collect_relation_keys(fields: &[FieldDescriptor], keys: &mut HashSet<String>) {
    for field in fields {
        match &field.kind {
            FieldKind::Relationship(_) | FieldKind::Upload(_) => {
                if let Some(key) = field.path().last() {
                    keys.insert((*key).to_string());
                }
            }
            FieldKind::Array(constraints) => collect_relation_keys(&constraints.fields, keys),
            FieldKind::Blocks(constraints) => {
                for block in &constraints.blocks {
                    collect_relation_keys(&block.fields, keys);
                }
            }
            _ => {}
        }
    }
}

pub struct ReadWalker<'a> {
    shape: &'a dyn StorageShape,
    max_hops: usize,
    truncate: Option<usize>,
    relations: HashSet<String>,
}

impl<'a> ReadWalker<'a> {
    pub fn new(shape: &'a dyn StorageShape, max_hops: usize) -> Self {
        Self {
            shape,
            max_hops,
            truncate: None,
            relations: HashSet::new(),
        }
    }

    /// Keys whose values are related documents.
    pub fn with_relations(mut self, relations: HashSet<String>) -> Self {
        self.relations = relations;
        self
    }

    /// Truncate converted markdown to this many characters plus `...`.
    pub fn with_truncate(mut self, budget: Option<usize>) -> Self {
        self.truncate = budget;
        self
    }

    /// Convert every matching value in place. Returns how many were converted.
    pub fn walk(&self, value: &mut Value) -> usize {
        if self.max_hops == 0 {
            return 0;
        }
        self.visit(value, 1, 0, "")
    }

    fn visit(&self, value: &mut Value, hops: usize, nesting: usize, path: &str) -> usize {
        if nesting > MAX_NESTING {
            return 0;
        }

        if self.shape.matches(value) {
            match to_wire_format(value) {
                Ok(markdown) => *value = Value::String(self.truncated(markdown)),
                Err(e) => {
                    tracing::warn!(field = %path, error = %e, "Rich-text field could not be converted; blanking it");
                    *value = Value::String(String::new());
                }
            }
            return 1;
        }

        match value {
            Value::Object(map) => map
                .iter_mut()
                .map(|(key, child)| {
                    let child_hops = if self.relations.contains(key) { hops + 1 } else { hops };
                    if child_hops > self.max_hops {
                        return 0;
                    }
                    let child_path = if path.is_empty() {
                        key.clone()
                    } else {
                        format!("{}.{}", path, key)
                    };
                    self.visit(child, child_hops, nesting + 1, &child_path)
                })
                .sum(),
            Value::Array(items) => items
                .iter_mut()
                .enumerate()
                .map(|(i, child)| {
                    self.visit(child, hops, nesting + 1, &format!("{}[{}]", path, i))
                })
                .sum(),
            _ => 0,
        }
    }

    fn truncated(&self, markdown: String) -> String {
        match self.truncate {
            Some(budget) if markdown.chars().count() > budget => {
                let mut cut: String = markdown.chars().take(budget).collect();
                cut.push_str("...");
                cut
            }
            _ => markdown,
        }
    }
}
