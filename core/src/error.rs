//! Error types for the zoo records client.
//!
//! # Design
//! `ApiError` covers everything that can go wrong once a request exists:
//! the exchange failing, the server rejecting it, or the payload not
//! matching. `Duplicate` gets its own variant because the create form
//! reports it differently from every other rejection. `ValidationError`
//! is raised before any request is built and never reaches the network.

use serde_json::Value;
use thiserror::Error;

use crate::resource::Resource;

/// SQLSTATE class reported by the API for a primary-key collision.
pub const DUPLICATE_KEY_CODE: &str = "23000";

/// Errors returned by `ZooClient` / `SportsClient` parse methods and by the
/// multi-request flows built on `Transport`.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The request could not complete (connection refused, DNS, reset).
    #[error("transport error: {0}")]
    Transport(String),

    /// The server returned 404.
    #[error("resource not found")]
    NotFound,

    /// The server rejected the record because its key already exists.
    #[error("duplicate key: {id}")]
    Duplicate { id: String },

    /// Any other non-2xx status. `detail` is the body when it parsed as JSON.
    #[error("HTTP {status}: {body}")]
    Http {
        status: u16,
        body: String,
        detail: Option<Value>,
    },

    /// The response body could not be deserialized into the expected type.
    #[error("deserialization failed: {0}")]
    Deserialization(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    Serialization(String),

    /// A paged fetch was stopped through its `CancelToken`.
    #[error("request cancelled")]
    Cancelled,
}

impl ApiError {
    /// Message suitable for a user-facing notice.
    pub fn user_message(&self) -> String {
        match self {
            Self::Transport(_) => {
                "Could not reach the server. Check your connection and try again.".to_string()
            }
            Self::NotFound => "The requested record no longer exists.".to_string(),
            Self::Duplicate { id } => format!("{id} already exists."),
            Self::Http {
                status,
                body,
                detail,
            } => match detail.as_ref().and_then(detail_message) {
                Some(msg) => format!("The server rejected the request: {msg}"),
                None if !body.trim().is_empty() && body.len() <= 200 => {
                    format!("The server rejected the request: {}", body.trim())
                }
                None => format!("The server rejected the request (HTTP {status})."),
            },
            Self::Deserialization(_) | Self::Serialization(_) => {
                "The server sent a response this client does not understand.".to_string()
            }
            Self::Cancelled => "The request was cancelled.".to_string(),
        }
    }
}

/// Pull a human-readable message out of a structured error payload.
fn detail_message(detail: &Value) -> Option<String> {
    for key in ["message", "error", "detail", "sqlMessage"] {
        if let Some(msg) = detail.get(key).and_then(Value::as_str) {
            return Some(msg.to_string());
        }
    }
    detail
        .get("code")
        .map(|code| format!("error code {}", code_string(code)))
}

/// Server error codes arrive as numbers or strings depending on the driver.
pub(crate) fn code_string(code: &Value) -> String {
    match code {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Input rejected on the client before any request is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("search terms may only contain letters, digits, spaces, hyphens and apostrophes")]
    SearchTerm { term: String },

    #[error("search term is empty")]
    EmptySearch,

    #[error("unknown filter `{key}`")]
    UnknownFilter { key: String },

    #[error("page size must be one of 5, 10 or 20, got {0}")]
    PageSize(u32),

    #[error("page must be at least 1")]
    Page,

    #[error("`{id}` is not a valid {} ID (expected {}-###)", .resource.singular(), .resource.id_prefix())]
    IdFormat { resource: Resource, id: String },

    #[error("nothing selected")]
    NoSelection,
}
