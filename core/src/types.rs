//! Wire DTOs for the zoo records API.
//!
//! # Design
//! Records are kept as JSON objects rather than per-resource structs: the
//! list views render whatever columns the server returns and the create form
//! is schema-driven, so nothing here needs to know a record's shape beyond
//! its primary key.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::resource::Resource;

/// One row of any collection.
pub type Record = Map<String, Value>;

/// Paging metadata attached to every collection response.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Metadata {
    #[serde(default)]
    pub total_pages: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_records: Option<u64>,
}

/// `GET /{resource}` response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListEnvelope {
    #[serde(default)]
    pub data: Vec<Record>,
    #[serde(default)]
    pub metadata: Metadata,
}

/// One fetched page. Replaced wholesale on every load.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultPage<T> {
    pub items: Vec<T>,
    /// Always at least 1, even when the server reports 0.
    pub total_pages: u32,
}

impl<T> ResultPage<T> {
    pub fn new(items: Vec<T>, total_pages: u32) -> Self {
        Self {
            items,
            total_pages: total_pages.max(1),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl From<ListEnvelope> for ResultPage<Record> {
    fn from(envelope: ListEnvelope) -> Self {
        ResultPage::new(envelope.data, envelope.metadata.total_pages)
    }
}

/// Primary key of `record` as a string, if present.
pub fn record_id(record: &Record, resource: Resource) -> Option<String> {
    record.get(resource.id_field()).and_then(|v| match v {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// Display text for one cell.
pub fn cell_text(record: &Record, column: &str) -> String {
    match record.get(column) {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

/// Column names in the order they first appear across `records`.
pub fn columns(records: &[Record]) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for record in records {
        for key in record.keys() {
            if !out.iter().any(|c| c == key) {
                out.push(key.clone());
            }
        }
    }
    out
}
