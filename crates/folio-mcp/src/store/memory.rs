//! In-process document store.
//!
//! Backs tests and offline demos. Implements the CMS's query operators over
//! JSON documents, records every call's [`OperationContext`] as a hook event,
//! and counts calls so tests can assert that denied invocations never reach
//! the store. Relation depth, locales and drafts are accepted and ignored.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};

use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};
use tokio::sync::{Mutex, RwLock};
use uuid::Uuid;

use super::{
    DocumentStore, FindQuery, OperationContext, PaginatedDocs, ReadOptions, StoreError,
    WriteOptions,
};

/// One change-hook firing observed by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct HookEvent {
    pub collection: String,
    pub operation: &'static str,
    pub id: Option<String>,
    pub context: OperationContext,
}

#[derive(Debug, Default, Deserialize)]
struct Seed {
    #[serde(default)]
    collections: HashMap<String, Vec<Value>>,
    #[serde(default)]
    globals: HashMap<String, Value>,
}

#[derive(Default)]
pub struct InMemoryStore {
    collections: RwLock<HashMap<String, Vec<Value>>>,
    globals: RwLock<HashMap<String, Value>>,
    calls: AtomicUsize,
    events: Mutex<Vec<HookEvent>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add documents to a collection; documents without an `id` get one.
    pub fn with_documents(mut self, collection: &str, docs: impl IntoIterator<Item = Value>) -> Self {
        let entry = self
            .collections
            .get_mut()
            .entry(collection.to_string())
            .or_default();
        for mut doc in docs {
            if let Value::Object(map) = &mut doc {
                if !map.contains_key("id") {
                    map.insert("id".into(), Value::String(Uuid::new_v4().to_string()));
                }
            }
            entry.push(doc);
        }
        self
    }

    pub fn with_global(mut self, slug: &str, doc: Value) -> Self {
        self.globals.get_mut().insert(slug.to_string(), doc);
        self
    }

    /// Seed from a YAML or JSON file of the form
    /// `{collections: {slug: [docs]}, globals: {slug: doc}}`.
    pub fn from_seed_file(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            StoreError::InvalidResponse(format!("cannot read seed file {}: {}", path.display(), e))
        })?;
        let seed: Seed = serde_yaml::from_str(&content).map_err(|e| {
            StoreError::InvalidResponse(format!("invalid seed file {}: {}", path.display(), e))
        })?;

        let mut store = Self::new();
        for (slug, docs) in seed.collections {
            store = store.with_documents(&slug, docs);
        }
        for (slug, doc) in seed.globals {
            store = store.with_global(&slug, doc);
        }
        Ok(store)
    }

    /// Number of store calls made so far.
    pub fn call_count(&self) -> usize {
        self.calls.load(AtomicOrdering::SeqCst)
    }

    pub async fn hook_events(&self) -> Vec<HookEvent> {
        self.events.lock().await.clone()
    }

    pub async fn document_count(&self, collection: &str) -> usize {
        self.collections
            .read()
            .await
            .get(collection)
            .map(Vec::len)
            .unwrap_or(0)
    }

    async fn record(
        &self,
        collection: &str,
        operation: &'static str,
        id: Option<&str>,
        context: &OperationContext,
    ) {
        self.calls.fetch_add(1, AtomicOrdering::SeqCst);
        self.events.lock().await.push(HookEvent {
            collection: collection.to_string(),
            operation,
            id: id.map(str::to_string),
            context: context.clone(),
        });
        tracing::debug!(
            collection = %collection,
            operation = %operation,
            request_id = %context.request_id,
            "Store call"
        );
    }
}

fn now() -> Value {
    Value::String(Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true))
}

fn id_string(id: &Value) -> Option<String> {
    match id {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn doc_id(doc: &Value) -> Option<String> {
    doc.get("id").and_then(id_string)
}

#[async_trait]
impl DocumentStore for InMemoryStore {
    async fn find(
        &self,
        collection: &str,
        query: FindQuery,
        context: &OperationContext,
    ) -> Result<PaginatedDocs, StoreError> {
        self.record(collection, "find", None, context).await;
        let collections = self.collections.read().await;
        let all = collections.get(collection).map(Vec::as_slice).unwrap_or(&[]);

        let mut matched = Vec::new();
        for doc in all {
            let keep = match &query.filter {
                Some(filter) => matches_filter(doc, filter)?,
                None => true,
            };
            if keep {
                matched.push(doc);
            }
        }

        if let Some(sort) = &query.sort {
            sort_docs(&mut matched, sort);
        }

        let page = query.page.max(1);
        let limit = query.limit;
        let total = matched.len() as u64;
        let skip = usize::try_from((page - 1).saturating_mul(limit)).unwrap_or(usize::MAX);
        let docs = matched
            .into_iter()
            .skip(skip)
            .take(usize::try_from(limit).unwrap_or(usize::MAX))
            .map(|doc| project(doc, query.select.as_deref()))
            .collect();

        Ok(PaginatedDocs::new(docs, total, page, limit))
    }

    async fn find_by_id(
        &self,
        collection: &str,
        id: &str,
        options: ReadOptions,
        context: &OperationContext,
    ) -> Result<Option<Value>, StoreError> {
        self.record(collection, "findByID", Some(id), context).await;
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.iter().find(|d| doc_id(d).as_deref() == Some(id)))
            .map(|doc| project(doc, options.select.as_deref())))
    }

    async fn create(
        &self,
        collection: &str,
        data: Map<String, Value>,
        _options: WriteOptions,
        context: &OperationContext,
    ) -> Result<Value, StoreError> {
        let mut doc = data;
        let id = doc
            .get("id")
            .and_then(id_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());
        self.record(collection, "create", Some(&id), context).await;

        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();
        if docs.iter().any(|d| doc_id(d).as_deref() == Some(id.as_str())) {
            return Err(StoreError::Upstream(format!(
                "A document with id '{}' already exists in '{}'",
                id, collection
            )));
        }

        doc.insert("id".into(), Value::String(id.clone()));
        let timestamp = now();
        doc.insert("createdAt".into(), timestamp.clone());
        doc.insert("updatedAt".into(), timestamp);
        let doc = Value::Object(doc);
        docs.push(doc.clone());
        Ok(doc)
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        data: Map<String, Value>,
        _options: WriteOptions,
        context: &OperationContext,
    ) -> Result<Option<Value>, StoreError> {
        self.record(collection, "update", Some(id), context).await;
        let mut collections = self.collections.write().await;
        let Some(doc) = collections
            .get_mut(collection)
            .and_then(|docs| docs.iter_mut().find(|d| doc_id(d).as_deref() == Some(id)))
        else {
            return Ok(None);
        };

        if let Value::Object(target) = doc {
            let mut data = data;
            data.remove("id");
            merge(target, data);
            target.insert("updatedAt".into(), now());
        }
        Ok(Some(doc.clone()))
    }

    async fn delete(
        &self,
        collection: &str,
        id: &str,
        context: &OperationContext,
    ) -> Result<Option<Value>, StoreError> {
        self.record(collection, "delete", Some(id), context).await;
        let mut collections = self.collections.write().await;
        let Some(docs) = collections.get_mut(collection) else {
            return Ok(None);
        };
        let position = docs.iter().position(|d| doc_id(d).as_deref() == Some(id));
        Ok(position.map(|i| docs.remove(i)))
    }

    async fn find_global(
        &self,
        slug: &str,
        options: ReadOptions,
        context: &OperationContext,
    ) -> Result<Value, StoreError> {
        self.record(slug, "findGlobal", None, context).await;
        let globals = self.globals.read().await;
        let doc = globals
            .get(slug)
            .cloned()
            .unwrap_or_else(|| Value::Object(Map::new()));
        Ok(project(&doc, options.select.as_deref()))
    }

    async fn update_global(
        &self,
        slug: &str,
        data: Map<String, Value>,
        _options: WriteOptions,
        context: &OperationContext,
    ) -> Result<Value, StoreError> {
        self.record(slug, "updateGlobal", None, context).await;
        let mut globals = self.globals.write().await;
        let doc = globals
            .entry(slug.to_string())
            .or_insert_with(|| Value::Object(Map::new()));
        if let Value::Object(target) = doc {
            merge(target, data);
            target.insert("updatedAt".into(), now());
        }
        Ok(doc.clone())
    }
}

// =============================================================================
// Documents
// =============================================================================

/// Merge `data` into `target`; nested objects merge, everything else replaces.
fn merge(target: &mut Map<String, Value>, data: Map<String, Value>) {
    for (key, value) in data {
        match (target.get_mut(&key), value) {
            (Some(Value::Object(existing)), Value::Object(incoming)) => merge(existing, incoming),
            (_, value) => {
                target.insert(key, value);
            }
        }
    }
}

fn get_path<'a>(doc: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(doc, |current, segment| current.get(segment))
}

/// Keep only the selected dot paths (and `id`).
fn project(doc: &Value, select: Option<&[String]>) -> Value {
    let Some(select) = select else {
        return doc.clone();
    };
    let mut out = Map::new();
    if let Some(id) = doc.get("id") {
        out.insert("id".into(), id.clone());
    }
    for path in select {
        let Some(value) = get_path(doc, path) else {
            continue;
        };
        let segments: Vec<&str> = path.split('.').collect();
        insert_path(&mut out, &segments, value.clone());
    }
    Value::Object(out)
}

fn insert_path(out: &mut Map<String, Value>, segments: &[&str], value: Value) {
    match segments {
        [] => {}
        [last] => {
            out.insert(last.to_string(), value);
        }
        [head, rest @ ..] => {
            let entry = out
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !entry.is_object() {
                *entry = Value::Object(Map::new());
            }
            if let Value::Object(next) = entry {
                insert_path(next, rest, value);
            }
        }
    }
}

// =============================================================================
// Filtering
// =============================================================================

fn matches_filter(doc: &Value, filter: &Value) -> Result<bool, StoreError> {
    let Value::Object(conditions) = filter else {
        return Err(StoreError::Upstream("where must be an object".into()));
    };
    for (key, condition) in conditions {
        let ok = match key.as_str() {
            "and" => all_of(doc, condition)?,
            "or" => any_of(doc, condition)?,
            path => matches_field(get_path(doc, path), condition)?,
        };
        if !ok {
            return Ok(false);
        }
    }
    Ok(true)
}

fn all_of(doc: &Value, clauses: &Value) -> Result<bool, StoreError> {
    let Value::Array(clauses) = clauses else {
        return Err(StoreError::Upstream("'and' expects an array of conditions".into()));
    };
    for clause in clauses {
        if !matches_filter(doc, clause)? {
            return Ok(false);
        }
    }
    Ok(true)
}

fn any_of(doc: &Value, clauses: &Value) -> Result<bool, StoreError> {
    let Value::Array(clauses) = clauses else {
        return Err(StoreError::Upstream("'or' expects an array of conditions".into()));
    };
    for clause in clauses {
        if matches_filter(doc, clause)? {
            return Ok(true);
        }
    }
    Ok(false)
}

fn matches_field(value: Option<&Value>, condition: &Value) -> Result<bool, StoreError> {
    let operators = match condition {
        Value::Object(map) if map.keys().any(|k| is_operator(k)) => map,
        // A bare value means equality.
        other => return Ok(value.map(|v| loose_eq(v, other)).unwrap_or(other.is_null())),
    };

    for (operator, operand) in operators {
        let ok = match operator.as_str() {
            "equals" => value.map(|v| loose_eq(v, operand)).unwrap_or(operand.is_null()),
            "not_equals" => !value.map(|v| loose_eq(v, operand)).unwrap_or(operand.is_null()),
            "in" => value.map(|v| in_list(v, operand)).unwrap_or(false),
            "not_in" => !value.map(|v| in_list(v, operand)).unwrap_or(false),
            "like" => match (value.and_then(Value::as_str), operand.as_str()) {
                (Some(text), Some(pattern)) => {
                    let text = text.to_lowercase();
                    pattern
                        .to_lowercase()
                        .split_whitespace()
                        .all(|word| text.contains(word))
                }
                _ => false,
            },
            "contains" => match value {
                Some(Value::String(text)) => operand
                    .as_str()
                    .map(|needle| text.to_lowercase().contains(&needle.to_lowercase()))
                    .unwrap_or(false),
                Some(Value::Array(items)) => items.iter().any(|item| loose_eq(item, operand)),
                _ => false,
            },
            "exists" => {
                let expected = match operand {
                    Value::Bool(b) => *b,
                    Value::String(s) => s == "true",
                    _ => true,
                };
                let present = value.map(|v| !v.is_null()).unwrap_or(false);
                present == expected
            }
            "greater_than" => compare(value, operand) == Some(Ordering::Greater),
            "greater_than_equal" => matches!(
                compare(value, operand),
                Some(Ordering::Greater | Ordering::Equal)
            ),
            "less_than" => compare(value, operand) == Some(Ordering::Less),
            "less_than_equal" => {
                matches!(compare(value, operand), Some(Ordering::Less | Ordering::Equal))
            }
            other => {
                return Err(StoreError::Upstream(format!(
                    "The operator '{}' is not supported",
                    other
                )));
            }
        };
        if !ok {
            return Ok(false);
        }
    }
    Ok(true)
}

fn is_operator(key: &str) -> bool {
    matches!(
        key,
        "equals"
            | "not_equals"
            | "in"
            | "not_in"
            | "like"
            | "contains"
            | "exists"
            | "greater_than"
            | "greater_than_equal"
            | "less_than"
            | "less_than_equal"
            | "near"
            | "within"
            | "intersects"
            | "all"
    )
}

/// Equality with number/string coercion. Populated relations compare by id
/// and arrays match when any element does.
fn loose_eq(value: &Value, operand: &Value) -> bool {
    match (value, operand) {
        (Value::Number(a), Value::Number(b)) => a.as_f64() == b.as_f64(),
        (Value::String(s), Value::Number(n)) | (Value::Number(n), Value::String(s)) => {
            s.parse::<f64>().ok() == n.as_f64()
        }
        (Value::Object(map), scalar) if !scalar.is_object() && map.contains_key("id") => {
            map.get("id").map(|id| loose_eq(id, scalar)).unwrap_or(false)
        }
        (Value::Array(items), scalar) if !scalar.is_array() => {
            items.iter().any(|item| loose_eq(item, scalar))
        }
        (a, b) => a == b,
    }
}

fn in_list(value: &Value, operand: &Value) -> bool {
    match operand {
        Value::Array(candidates) => candidates.iter().any(|c| loose_eq(value, c)),
        Value::String(list) => list
            .split(',')
            .any(|c| loose_eq(value, &Value::String(c.trim().to_string()))),
        other => loose_eq(value, other),
    }
}

fn compare(value: Option<&Value>, operand: &Value) -> Option<Ordering> {
    match (value?, operand) {
        (Value::Number(a), b) => {
            let b = match b {
                Value::Number(n) => n.as_f64()?,
                Value::String(s) => s.parse().ok()?,
                _ => return None,
            };
            a.as_f64()?.partial_cmp(&b)
        }
        (Value::String(a), Value::String(b)) => Some(a.as_str().cmp(b.as_str())),
        (Value::String(a), Value::Number(b)) => a.parse::<f64>().ok()?.partial_cmp(&b.as_f64()?),
        _ => None,
    }
}

// =============================================================================
// Sorting
// =============================================================================

/// Sort by a field; a leading `-` sorts descending. Missing and null values
/// sort last in both directions.
fn sort_docs(docs: &mut [&Value], sort: &str) {
    let (field, descending) = match sort.strip_prefix('-') {
        Some(field) => (field, true),
        None => (sort, false),
    };
    docs.sort_by(|a, b| {
        let a = get_path(a, field).filter(|v| !v.is_null());
        let b = get_path(b, field).filter(|v| !v.is_null());
        match (a, b) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Greater,
            (Some(_), None) => Ordering::Less,
            (Some(a), Some(b)) => {
                let ordering = order_values(a, b);
                if descending { ordering.reverse() } else { ordering }
            }
        }
    });
}

fn order_values(a: &Value, b: &Value) -> Ordering {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        (Value::String(x), Value::String(y)) => x.cmp(y),
        (Value::Bool(x), Value::Bool(y)) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn store() -> InMemoryStore {
        InMemoryStore::new().with_documents(
            "posts",
            vec![
                json!({ "id": "1", "title": "Hello World", "views": 10, "status": "published", "tags": ["rust", "cms"], "author": { "id": "a1", "name": "Ada" }, "seo": { "title": "SEO 1" } }),
                json!({ "id": "2", "title": "Second post", "views": 3, "status": "draft", "tags": ["cms"] }),
                json!({ "id": "3", "title": "Third", "views": 42, "status": "published", "author": "a2" }),
            ],
        )
    }

    async fn ids(store: &InMemoryStore, filter: Value, sort: Option<&str>) -> Vec<String> {
        let query = FindQuery {
            filter: Some(filter),
            sort: sort.map(str::to_string),
            page: 1,
            limit: 10,
            ..Default::default()
        };
        store
            .find("posts", query, &OperationContext::new())
            .await
            .unwrap()
            .docs
            .iter()
            .filter_map(doc_id)
            .collect()
    }

    #[tokio::test]
    async fn test_filter_operators() {
        let s = store();
        assert_eq!(ids(&s, json!({ "status": "published" }), None).await, ["1", "3"]);
        assert_eq!(ids(&s, json!({ "status": { "not_equals": "published" } }), None).await, ["2"]);
        assert_eq!(ids(&s, json!({ "views": { "greater_than": 5 } }), None).await, ["1", "3"]);
        assert_eq!(ids(&s, json!({ "views": { "less_than_equal": "10" } }), None).await, ["1", "2"]);
        assert_eq!(ids(&s, json!({ "title": { "like": "hello WORLD" } }), None).await, ["1"]);
        assert_eq!(ids(&s, json!({ "title": { "contains": "post" } }), None).await, ["2"]);
        assert_eq!(ids(&s, json!({ "tags": { "contains": "rust" } }), None).await, ["1"]);
        assert_eq!(ids(&s, json!({ "tags": { "equals": "cms" } }), None).await, ["1", "2"]);
        assert_eq!(ids(&s, json!({ "id": { "in": ["1", "3"] } }), None).await, ["1", "3"]);
        assert_eq!(ids(&s, json!({ "id": { "not_in": "1,3" } }), None).await, ["2"]);
        assert_eq!(ids(&s, json!({ "author": { "exists": false } }), None).await, ["2"]);
        assert_eq!(ids(&s, json!({ "author": { "equals": "a1" } }), None).await, ["1"]);
        assert_eq!(ids(&s, json!({ "seo.title": { "equals": "SEO 1" } }), None).await, ["1"]);
    }

    #[tokio::test]
    async fn test_and_or() {
        let s = store();
        let filter = json!({
            "or": [
                { "status": { "equals": "draft" } },
                { "and": [ { "status": "published" }, { "views": { "greater_than": 20 } } ] }
            ]
        });
        assert_eq!(ids(&s, filter, None).await, ["2", "3"]);
    }

    #[tokio::test]
    async fn test_unknown_operator_is_upstream_error() {
        let query = FindQuery {
            filter: Some(json!({ "views": { "greater_than": 1, "roughly": 2 } })),
            page: 1,
            limit: 10,
            ..Default::default()
        };
        let err = store()
            .find("posts", query, &OperationContext::new())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Upstream(_)));
    }

    #[tokio::test]
    async fn test_sort_and_paginate() {
        let s = store();
        assert_eq!(ids(&s, json!({}), Some("-views")).await, ["3", "1", "2"]);
        assert_eq!(ids(&s, json!({}), Some("title")).await, ["1", "2", "3"]);

        let query = FindQuery {
            sort: Some("views".into()),
            page: 2,
            limit: 2,
            ..Default::default()
        };
        let page = s.find("posts", query, &OperationContext::new()).await.unwrap();
        assert_eq!(page.total_docs, 3);
        assert_eq!(page.total_pages, 2);
        assert_eq!(page.docs.len(), 1);
        assert_eq!(page.docs[0]["id"], "3");
        assert!(page.has_prev_page);
        assert!(!page.has_next_page);
    }

    #[tokio::test]
    async fn test_page_far_past_the_end() {
        let query = FindQuery {
            page: i64::MAX as u64,
            limit: 10,
            ..Default::default()
        };
        let page = store().find("posts", query, &OperationContext::new()).await.unwrap();
        assert!(page.docs.is_empty());
        assert_eq!(page.total_docs, 3);
        assert_eq!(page.page, i64::MAX as u64);
        assert!(!page.has_next_page);
    }

    #[tokio::test]
    async fn test_select_keeps_id() {
        let doc = store()
            .find_by_id(
                "posts",
                "1",
                ReadOptions {
                    select: Some(vec!["title".into(), "seo.title".into()]),
                    ..Default::default()
                },
                &OperationContext::new(),
            )
            .await
            .unwrap()
            .unwrap();
        assert_eq!(doc, json!({ "id": "1", "title": "Hello World", "seo": { "title": "SEO 1" } }));
    }

    #[tokio::test]
    async fn test_write_lifecycle_records_hooks() {
        let s = InMemoryStore::new();
        let ctx = OperationContext::new();
        let data = json!({ "title": "New", "seo": { "title": "a", "description": "b" } });
        let created = s
            .create("posts", data.as_object().cloned().unwrap(), WriteOptions::default(), &ctx)
            .await
            .unwrap();
        let id = doc_id(&created).unwrap();
        assert!(created["createdAt"].is_string());

        let patch = json!({ "seo": { "title": "c" } });
        let updated = s
            .update("posts", &id, patch.as_object().cloned().unwrap(), WriteOptions::default(), &ctx)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated["seo"], json!({ "title": "c", "description": "b" }));
        assert_eq!(updated["title"], "New");

        assert!(s.update("posts", "missing", Map::new(), WriteOptions::default(), &ctx).await.unwrap().is_none());
        assert!(s.delete("posts", &id, &ctx).await.unwrap().is_some());
        assert!(s.delete("posts", &id, &ctx).await.unwrap().is_none());
        assert_eq!(s.document_count("posts").await, 0);

        let events = s.hook_events().await;
        let ops: Vec<_> = events.iter().map(|e| e.operation).collect();
        assert_eq!(ops, ["create", "update", "update", "delete", "delete"]);
        assert!(events.iter().all(|e| e.context.source == "mcp" && e.context.request_id == ctx.request_id));
        assert_eq!(s.call_count(), 5);
    }

    #[tokio::test]
    async fn test_globals() {
        let s = InMemoryStore::new().with_global("settings", json!({ "siteName": "Folio" }));
        let ctx = OperationContext::new();
        let doc = s.find_global("settings", ReadOptions::default(), &ctx).await.unwrap();
        assert_eq!(doc["siteName"], "Folio");

        let patch = json!({ "tagline": "hi" });
        let doc = s
            .update_global("settings", patch.as_object().cloned().unwrap(), WriteOptions::default(), &ctx)
            .await
            .unwrap();
        assert_eq!(doc["siteName"], "Folio");
        assert_eq!(doc["tagline"], "hi");

        let empty = s.find_global("footer", ReadOptions::default(), &ctx).await.unwrap();
        assert_eq!(empty, json!({}));
    }

    #[test]
    fn test_seed_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("seed.yaml");
        std::fs::write(
            &path,
            "collections:\n  posts:\n    - id: p1\n      title: Seeded\n    - title: No id\nglobals:\n  settings:\n    siteName: Folio\n",
        )
        .unwrap();
        let store = InMemoryStore::from_seed_file(&path).unwrap();
        let collections = store.collections.try_read().unwrap();
        let posts = &collections["posts"];
        assert_eq!(posts.len(), 2);
        assert_eq!(posts[0]["id"], "p1");
        assert!(posts[1]["id"].is_string());
    }
}
