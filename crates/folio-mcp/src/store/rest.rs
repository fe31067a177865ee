//! CMS REST API store.
//!
//! Queries use the CMS's bracketed query-string encoding
//! (`where[status][equals]=published`, `select[seo][title]=true`). The
//! operation context travels as JSON in the `X-Folio-Context` header so the
//! CMS-side hooks can read it. Document ids are percent-encoded as single
//! path segments, so an id can never name another collection.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode, Url};
use serde_json::{Map, Value};

use super::{
    DocumentStore, FindQuery, OperationContext, PaginatedDocs, ReadOptions, StoreError,
    WriteOptions,
};

pub const CONTEXT_HEADER: &str = "X-Folio-Context";

pub struct RestStore {
    client: Client,
    base_url: Url,
    api_key: Option<String>,
}

impl RestStore {
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, StoreError> {
        let base_url = base_url.into();
        let base_url = Url::parse(&base_url)
            .map_err(|e| StoreError::InvalidRequest(format!("base URL '{}': {}", base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(StoreError::InvalidRequest(format!(
                "base URL '{}' cannot carry a path",
                base_url
            )));
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url,
            api_key,
        })
    }

    /// Base URL with `segments` appended, each percent-encoded on its own.
    fn url(&self, segments: &[&str]) -> Result<Url, StoreError> {
        if let Some(bad) = segments.iter().find(|s| s.is_empty() || **s == "." || **s == "..") {
            return Err(StoreError::InvalidRequest(format!(
                "'{}' is not a valid path segment",
                bad
            )));
        }
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| StoreError::InvalidRequest("base URL cannot carry a path".into()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    fn request(
        &self,
        method: Method,
        segments: &[&str],
        context: &OperationContext,
    ) -> Result<RequestBuilder, StoreError> {
        let header = serde_json::to_string(context)
            .map_err(|e| StoreError::InvalidResponse(format!("cannot encode context: {}", e)))?;
        let mut builder = self
            .client
            .request(method, self.url(segments)?)
            .header(CONTEXT_HEADER, header);
        if let Some(key) = &self.api_key {
            builder = builder.bearer_auth(key);
        }
        Ok(builder)
    }

    /// Send a request; `Ok(None)` on 404.
    async fn send(&self, builder: RequestBuilder) -> Result<Option<Value>, StoreError> {
        let response = builder.send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !response.status().is_success() {
            return Err(upstream_error(response).await);
        }
        Ok(Some(response.json().await?))
    }

    async fn send_required(&self, builder: RequestBuilder, what: &str) -> Result<Value, StoreError> {
        self.send(builder)
            .await?
            .ok_or_else(|| StoreError::Upstream(format!("{} not found", what)))
    }
}

async fn upstream_error(response: Response) -> StoreError {
    let status = response.status();
    let body: Option<Value> = response.json().await.ok();
    let message = body
        .as_ref()
        .and_then(|b| b.get("errors"))
        .and_then(|e| e.get(0))
        .and_then(|e| e.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("store responded with {}", status));
    StoreError::Upstream(message)
}

/// Pull the document out of a write response (`{doc}` or `{result}`).
fn unwrap_doc(mut body: Value, key: &str) -> Result<Value, StoreError> {
    match body.get_mut(key) {
        Some(doc) => Ok(doc.take()),
        None => Err(StoreError::InvalidResponse(format!(
            "response has no '{}' member",
            key
        ))),
    }
}

// =============================================================================
// Query-string encoding
// =============================================================================

/// Flatten a JSON value into bracketed query pairs under `prefix`.
pub fn encode_bracketed(prefix: &str, value: &Value, out: &mut Vec<(String, String)>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                encode_bracketed(&format!("{}[{}]", prefix, key), child, out);
            }
        }
        Value::Array(items) => {
            for (i, child) in items.iter().enumerate() {
                encode_bracketed(&format!("{}[{}]", prefix, i), child, out);
            }
        }
        Value::String(s) => out.push((prefix.to_string(), s.clone())),
        Value::Null => out.push((prefix.to_string(), "null".to_string())),
        other => out.push((prefix.to_string(), other.to_string())),
    }
}

fn encode_select(select: &[String], out: &mut Vec<(String, String)>) {
    for path in select {
        let key: String = path.split('.').map(|s| format!("[{}]", s)).collect();
        out.push((format!("select{}", key), "true".to_string()));
    }
}

fn read_params(options: &ReadOptions) -> Vec<(String, String)> {
    let mut params = Vec::new();
    if let Some(depth) = options.depth {
        params.push(("depth".to_string(), depth.to_string()));
    }
    if let Some(select) = &options.select {
        encode_select(select, &mut params);
    }
    common_params(&options.locale, options.draft, &mut params);
    params
}

fn write_params(options: &WriteOptions) -> Vec<(String, String)> {
    let mut params = Vec::new();
    if let Some(depth) = options.depth {
        params.push(("depth".to_string(), depth.to_string()));
    }
    common_params(&options.locale, options.draft, &mut params);
    params
}

fn common_params(locale: &Option<String>, draft: Option<bool>, out: &mut Vec<(String, String)>) {
    if let Some(locale) = locale {
        out.push(("locale".to_string(), locale.clone()));
    }
    if let Some(draft) = draft {
        out.push(("draft".to_string(), draft.to_string()));
    }
}

fn find_params(query: &FindQuery) -> Vec<(String, String)> {
    let mut params = vec![
        ("page".to_string(), query.page.to_string()),
        ("limit".to_string(), query.limit.to_string()),
    ];
    if let Some(sort) = &query.sort {
        params.push(("sort".to_string(), sort.clone()));
    }
    if let Some(filter) = &query.filter {
        encode_bracketed("where", filter, &mut params);
    }
    params.extend(read_params(&ReadOptions {
        depth: query.depth,
        select: query.select.clone(),
        locale: query.locale.clone(),
        draft: query.draft,
    }));
    params
}

#[async_trait]
impl DocumentStore for RestStore {
    async fn find(
        &self,
        collection: &str,
        query: FindQuery,
        context: &OperationContext,
    ) -> Result<PaginatedDocs, StoreError> {
        let builder = self
            .request(Method::GET, &[collection], context)?
            .query(&find_params(&query));
        let body = self.send_required(builder, collection).await?;
        serde_json::from_value(body).map_err(|e| StoreError::InvalidResponse(e.to_string()))
    }

    async fn find_by_id(
        &self,
        collection: &str,
        id: &str,
        options: ReadOptions,
        context: &OperationContext,
    ) -> Result<Option<Value>, StoreError> {
        let builder = self
            .request(Method::GET, &[collection, id], context)?
            .query(&read_params(&options));
        self.send(builder).await
    }

    async fn create(
        &self,
        collection: &str,
        data: Map<String, Value>,
        options: WriteOptions,
        context: &OperationContext,
    ) -> Result<Value, StoreError> {
        let builder = self
            .request(Method::POST, &[collection], context)?
            .query(&write_params(&options))
            .json(&data);
        let body = self.send_required(builder, collection).await?;
        unwrap_doc(body, "doc")
    }

    async fn update(
        &self,
        collection: &str,
        id: &str,
        data: Map<String, Value>,
        options: WriteOptions,
        context: &OperationContext,
    ) -> Result<Option<Value>, StoreError> {
        let builder = self
            .request(Method::PATCH, &[collection, id], context)?
            .query(&write_params(&options))
            .json(&data);
        self.send(builder)
            .await?
            .map(|body| unwrap_doc(body, "doc"))
            .transpose()
    }

    async fn delete(
        &self,
        collection: &str,
        id: &str,
        context: &OperationContext,
    ) -> Result<Option<Value>, StoreError> {
        let builder = self.request(Method::DELETE, &[collection, id], context)?;
        self.send(builder)
            .await?
            .map(|body| unwrap_doc(body, "doc"))
            .transpose()
    }

    async fn find_global(
        &self,
        slug: &str,
        options: ReadOptions,
        context: &OperationContext,
    ) -> Result<Value, StoreError> {
        let builder = self
            .request(Method::GET, &["globals", slug], context)?
            .query(&read_params(&options));
        self.send_required(builder, slug).await
    }

    async fn update_global(
        &self,
        slug: &str,
        data: Map<String, Value>,
        options: WriteOptions,
        context: &OperationContext,
    ) -> Result<Value, StoreError> {
        let builder = self
            .request(Method::POST, &["globals", slug], context)?
            .query(&write_params(&options))
            .json(&data);
        let body = self.send_required(builder, slug).await?;
        unwrap_doc(body, "result")
    }
}
