//! Client-side input checks applied before any request is built.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ValidationError;
use crate::resource::Resource;

static SEARCH_TERM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9\s'-]+$").expect("search pattern compiles")
});

static RESOURCE_ID: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(SP|HA|DI|CL)-[0-9]{3}$").expect("id pattern compiles")
});

/// Check a free-text search term against the allow-list (letters, digits,
/// whitespace, hyphen, apostrophe). Returns the trimmed term.
pub fn search_term(term: &str) -> Result<&str, ValidationError> {
    let trimmed = term.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptySearch);
    }
    if !SEARCH_TERM.is_match(trimmed) {
        return Err(ValidationError::SearchTerm {
            term: term.to_string(),
        });
    }
    Ok(trimmed)
}

/// Check that `id` is `<PREFIX>-###` for `resource`.
pub fn resource_id(resource: Resource, id: &str) -> Result<(), ValidationError> {
    let matches = RESOURCE_ID
        .captures(id)
        .and_then(|c| c.get(1))
        .is_some_and(|prefix| prefix.as_str() == resource.id_prefix());
    if matches {
        Ok(())
    } else {
        Err(ValidationError::IdFormat {
            resource,
            id: id.to_string(),
        })
    }
}
