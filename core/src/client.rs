//! Stateless HTTP request builder and response parser for the zoo records API.
//!
//! # Design
//! `ZooClient` holds only a `base_url`. Each operation is a `build_*` that
//! produces an `HttpRequest` and a `parse_*` that consumes an
//! `HttpResponse`; the host performs the round-trip in between. Error
//! normalization lives in `check_status`, so every caller sees the same
//! `ApiError` for the same server answer.

use serde_json::{json, Value};
use tracing::{debug, warn};
use url::form_urlencoded;

use crate::error::{code_string, ApiError, DUPLICATE_KEY_CODE};
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::query::{PAGE_KEY, PAGE_SIZE_KEY};
use crate::resource::Resource;
use crate::types::{ListEnvelope, Record, ResultPage};

/// Server-side parameters of one collection fetch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListQuery {
    pub page: u32,
    pub page_size: u32,
    /// `(server field, value)` pairs, appended in order.
    pub filters: Vec<(String, String)>,
}

impl ListQuery {
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page,
            page_size,
            filters: Vec::new(),
        }
    }

    pub fn filter(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.push((field.into(), value.into()));
        self
    }

    fn to_query_string(&self) -> String {
        let mut out = form_urlencoded::Serializer::new(String::new());
        out.append_pair(PAGE_KEY, &self.page.to_string());
        out.append_pair(PAGE_SIZE_KEY, &self.page_size.to_string());
        for (field, value) in &self.filters {
            out.append_pair(field, value);
        }
        out.finish()
    }
}

#[derive(Debug, Clone)]
pub struct ZooClient {
    base_url: String,
}

impl ZooClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn collection_url(&self, resource: Resource) -> String {
        format!("{}/{}", self.base_url, resource.path())
    }

    pub fn build_list(&self, resource: Resource, query: &ListQuery) -> HttpRequest {
        let url = format!("{}?{}", self.collection_url(resource), query.to_query_string());
        debug!(%resource, page = query.page, page_size = query.page_size, "build list request");
        HttpRequest::get(url)
    }

    /// The API takes a single-element array for writes.
    pub fn build_create(&self, resource: Resource, record: &Record) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(&[record])
            .map_err(|e| ApiError::Serialization(e.to_string()))?;
        debug!(%resource, "build create request");
        Ok(HttpRequest::with_json(
            HttpMethod::Post,
            self.collection_url(resource),
            body,
        ))
    }

    /// Replaces the listed fields of the record named by its id field.
    pub fn build_update(&self, resource: Resource, record: &Record) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(&[record])
            .map_err(|e| ApiError::Serialization(e.to_string()))?;
        debug!(%resource, "build update request");
        Ok(HttpRequest::with_json(
            HttpMethod::Put,
            self.collection_url(resource),
            body,
        ))
    }

    pub fn build_delete(&self, resource: Resource, id: &str) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_string(&json!([{ resource.id_field(): id }]))
            .map_err(|e| ApiError::Serialization(e.to_string()))?;
        debug!(%resource, id, "build delete request");
        Ok(HttpRequest::with_json(
            HttpMethod::Delete,
            self.collection_url(resource),
            body,
        ))
    }

    pub fn parse_list(&self, response: HttpResponse) -> Result<ResultPage<Record>, ApiError> {
        check_status(&response)?;
        let envelope: ListEnvelope = serde_json::from_str(&response.body)
            .map_err(|e| ApiError::Deserialization(e.to_string()))?;
        Ok(envelope.into())
    }

    /// Returns the created record when the server echoes one back. Some
    /// deployments answer a collision with a 2xx carrying the error object,
    /// so the body is checked for the duplicate code either way.
    pub fn parse_create(&self, response: HttpResponse) -> Result<Option<Record>, ApiError> {
        check_status(&response)?;
        if !is_json(&response) {
            return Ok(None);
        }
        let body: Value = match serde_json::from_str(&response.body) {
            Ok(v) => v,
            Err(_) => return Ok(None),
        };
        if let Some(err) = duplicate_from(&body) {
            return Err(err);
        }
        Ok(match body {
            Value::Object(record) => Some(record),
            Value::Array(mut items) if !items.is_empty() => match items.swap_remove(0) {
                Value::Object(record) => Some(record),
                _ => None,
            },
            _ => None,
        })
    }

    pub fn parse_update(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }

    pub fn parse_delete(&self, response: HttpResponse) -> Result<(), ApiError> {
        check_status(&response)
    }
}

/// `{ code: 23000, id }` → `ApiError::Duplicate`.
fn duplicate_from(body: &Value) -> Option<ApiError> {
    let code = body.get("code").map(code_string)?;
    if code != DUPLICATE_KEY_CODE {
        return None;
    }
    let id = body
        .get("id")
        .map(|v| v.as_str().map(str::to_string).unwrap_or_else(|| v.to_string()))
        .unwrap_or_default();
    Some(ApiError::Duplicate { id })
}

/// A response without a content type is sniffed as JSON; one that declares
/// another type is plain text.
fn is_json(response: &HttpResponse) -> bool {
    response
        .header("content-type")
        .map_or(true, |kind| kind.contains("json"))
}

/// Map non-success status codes to the appropriate `ApiError` variant.
pub(crate) fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    warn!(status = response.status, "request rejected");
    if response.status == 404 {
        return Err(ApiError::NotFound);
    }
    let detail: Option<Value> = if is_json(response) {
        serde_json::from_str(&response.body).ok()
    } else {
        None
    };
    if let Some(err) = detail.as_ref().and_then(duplicate_from) {
        return Err(err);
    }
    Err(ApiError::Http {
        status: response.status,
        body: response.body.clone(),
        detail,
    })
}
