//! Address-bar query state for the list views.
//!
//! # Design
//! `PageState` is what a list view needs to reproduce itself from a link:
//! page, page size and at most one filter. `decode` never fails; anything
//! missing or malformed falls back to the defaults so a hand-edited URL
//! still renders. `encode` always emits `page` and `pageSize` and emits the
//! filter only when it has a value, which keeps `decode(encode(s)) == s`.

use url::form_urlencoded;

use crate::error::ValidationError;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 5;
pub const PAGE_SIZES: [u32; 3] = [5, 10, 20];

pub const PAGE_KEY: &str = "page";
pub const PAGE_SIZE_KEY: &str = "pageSize";

/// A single `field=value` filter as it appears in the address bar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    pub field: String,
    pub value: String,
}

impl Filter {
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageState {
    pub page: u32,
    pub page_size: u32,
    pub filter: Option<Filter>,
}

impl Default for PageState {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: DEFAULT_PAGE_SIZE,
            filter: None,
        }
    }
}

impl PageState {
    /// Read a query string (with or without the leading `?`). Only keys in
    /// `filter_keys` are taken as filters; the first one present wins.
    pub fn decode(query: &str, filter_keys: &[&str]) -> Self {
        let mut state = PageState::default();
        let mut page_seen = false;
        let mut size_seen = false;

        for (key, value) in pairs(query) {
            match key.as_str() {
                PAGE_KEY if !page_seen => {
                    page_seen = true;
                    state.page = parse_page(&value);
                }
                PAGE_SIZE_KEY if !size_seen => {
                    size_seen = true;
                    state.page_size = parse_page_size(&value);
                }
                k if state.filter.is_none()
                    && !value.is_empty()
                    && filter_keys.contains(&k) =>
                {
                    state.filter = Some(Filter::new(k, value));
                }
                _ => {}
            }
        }
        state
    }

    pub fn encode(&self) -> String {
        let mut out = form_urlencoded::Serializer::new(String::new());
        out.append_pair(PAGE_KEY, &self.page.to_string());
        out.append_pair(PAGE_SIZE_KEY, &self.page_size.to_string());
        if let Some(filter) = self.filter.as_ref().filter(|f| !f.value.is_empty()) {
            out.append_pair(&filter.field, &filter.value);
        }
        out.finish()
    }

    /// Same filter and page size, different page.
    pub fn with_page(&self, page: u32) -> Result<Self, ValidationError> {
        if page == 0 {
            return Err(ValidationError::Page);
        }
        Ok(Self {
            page,
            ..self.clone()
        })
    }

    /// Changing the page size restarts at page 1.
    pub fn with_page_size(&self, page_size: u32) -> Result<Self, ValidationError> {
        if !PAGE_SIZES.contains(&page_size) {
            return Err(ValidationError::PageSize(page_size));
        }
        Ok(Self {
            page: DEFAULT_PAGE,
            page_size,
            filter: self.filter.clone(),
        })
    }

    /// A blank value clears the filter, since `encode` would drop it anyway.
    pub fn with_filter(&self, filter: Option<Filter>) -> Self {
        Self {
            page: DEFAULT_PAGE,
            page_size: self.page_size,
            filter: filter.filter(|f| !f.value.trim().is_empty()),
        }
    }
}

/// Decoded `key=value` pairs of a query string.
pub(crate) fn pairs(query: &str) -> Vec<(String, String)> {
    let query = query.strip_prefix('?').unwrap_or(query);
    form_urlencoded::parse(query.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

/// First value for `key`, if any.
pub(crate) fn first_value(query: &str, key: &str) -> Option<String> {
    pairs(query)
        .into_iter()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v)
}

fn parse_page(raw: &str) -> u32 {
    match raw.trim().parse::<u32>() {
        Ok(0) | Err(_) => DEFAULT_PAGE,
        Ok(n) => n,
    }
}

fn parse_page_size(raw: &str) -> u32 {
    raw.trim()
        .parse::<u32>()
        .ok()
        .filter(|n| PAGE_SIZES.contains(n))
        .unwrap_or(DEFAULT_PAGE_SIZE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const KEYS: &[&str] = &["name"];

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        assert_eq!(PageState::decode("", KEYS), PageState::default());
        assert_eq!(PageState::decode("?", KEYS), PageState::default());
    }

    #[test]
    fn malformed_numbers_fall_back() {
        let state = PageState::decode("page=abc&pageSize=7", KEYS);
        assert_eq!(state.page, 1);
        assert_eq!(state.page_size, 5);
        let state = PageState::decode("page=0&pageSize=-10", KEYS);
        assert_eq!(state.page, 1);
        assert_eq!(state.page_size, 5);
    }

    #[test]
    fn reads_page_size_and_filter() {
        let state = PageState::decode("?page=3&pageSize=10&name=lion", KEYS);
        assert_eq!(
            state,
            PageState {
                page: 3,
                page_size: 10,
                filter: Some(Filter::new("name", "lion")),
            }
        );
    }

    #[test]
    fn ignores_unrecognized_filters() {
        let state = PageState::decode("page=2&climate=arid", KEYS);
        assert!(state.filter.is_none());
        let state = PageState::decode("page=2&name=", KEYS);
        assert!(state.filter.is_none());
    }

    #[test]
    fn encode_always_writes_paging() {
        assert_eq!(PageState::default().encode(), "page=1&pageSize=5");
        let state = PageState {
            page: 2,
            page_size: 20,
            filter: Some(Filter::new("name", "snow leopard")),
        };
        assert_eq!(state.encode(), "page=2&pageSize=20&name=snow+leopard");
    }

    #[test]
    fn representative_round_trip() {
        let state = PageState {
            page: 3,
            page_size: 10,
            filter: Some(Filter::new("name", "lion")),
        };
        assert_eq!(PageState::decode(&state.encode(), KEYS), state);
    }

    #[test]
    fn page_size_change_resets_page() {
        let state = PageState::decode("page=4&pageSize=5&name=lion", KEYS);
        let next = state.with_page_size(20).unwrap();
        assert_eq!(next.page, 1);
        assert_eq!(next.filter, state.filter);
        assert_eq!(state.with_page_size(15), Err(ValidationError::PageSize(15)));
    }

    #[test]
    fn with_page_rejects_zero() {
        assert_eq!(PageState::default().with_page(0), Err(ValidationError::Page));
        assert_eq!(PageState::default().with_page(7).unwrap().page, 7);
    }

    #[test]
    fn blank_filter_value_clears_filter() {
        let state = PageState::decode("page=3&pageSize=10&name=lion", KEYS);
        for blank in ["", "   "] {
            let next = state.with_filter(Some(Filter::new("name", blank)));
            assert_eq!(next.filter, None);
            assert_eq!(next.page, 1);
            assert_eq!(next.page_size, 10);
            assert_eq!(PageState::decode(&next.encode(), KEYS), next);
        }
    }

    proptest! {
        #[test]
        fn decode_inverts_encode(
            page in 1u32..10_000,
            size_idx in 0usize..3,
            value in proptest::option::of("[A-Za-z0-9 '&=+%-]{1,24}"),
        ) {
            let state = PageState {
                page,
                page_size: PAGE_SIZES[size_idx],
                filter: value.map(|v| Filter::new("name", v)),
            };
            prop_assert_eq!(PageState::decode(&state.encode(), KEYS), state);
        }

        #[test]
        fn with_filter_states_survive_round_trip(
            size_idx in 0usize..3,
            value in "[A-Za-z0-9 '-]{0,12}",
        ) {
            let base = PageState { page: 4, page_size: PAGE_SIZES[size_idx], filter: None };
            let state = base.with_filter(Some(Filter::new("name", value)));
            prop_assert_eq!(PageState::decode(&state.encode(), KEYS), state);
        }
    }
}
