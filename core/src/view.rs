//! Paginated list pages: species, habitats and species-within-habitat.
//!
//! # Design
//! All three pages share one state machine, `ListView`, and differ only in
//! the `ListPage` descriptor (collection, path, recognized filter keys).
//!
//! ```text
//! Idle ──on_navigate──▶ Loading ──on_response(Ok)──▶ Loaded
//!                          │
//!                          └────on_response(Err)──▶ Failed
//! ```
//!
//! User actions (`search`, `clear_search`, `goto_page`, `set_page_size`)
//! return the `Location` to push onto the `AddressBar`; they never touch
//! the loaded rows. The load triggered by that navigation is what changes
//! the screen.

use tracing::{debug, warn};

use crate::client::{ListQuery, ZooClient};
use crate::error::{ApiError, ValidationError};
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::location::Location;
use crate::notice::Notice;
use crate::pagination::{PaginationWindow, DEFAULT_VISIBLE};
use crate::query::{Filter, PageState};
use crate::resource::Resource;
use crate::style::{Accent, StyleSheet};
use crate::types::{Record, ResultPage};
use crate::validate;

/// An address-bar filter key and the server field it maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterKey {
    pub key: &'static str,
    pub field: &'static str,
    pub label: &'static str,
}

const SPECIES_FILTERS: &[FilterKey] = &[FilterKey {
    key: "name",
    field: "name",
    label: "Name",
}];

const HABITAT_FILTERS: &[FilterKey] = &[
    FilterKey {
        key: "filter",
        field: "name",
        label: "Name",
    },
    FilterKey {
        key: "climate",
        field: "climate",
        label: "Climate",
    },
];

const HABITAT_SPECIES_FILTERS: &[FilterKey] = &[FilterKey {
    key: "habitat",
    field: "habitat_id",
    label: "Habitat",
}];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListPage {
    Species,
    Habitats,
    /// Species living in one habitat, selected by the `habitat` key.
    HabitatSpecies,
}

impl ListPage {
    pub fn resource(self) -> Resource {
        match self {
            ListPage::Species | ListPage::HabitatSpecies => Resource::Species,
            ListPage::Habitats => Resource::Habitats,
        }
    }

    pub fn path(self) -> &'static str {
        match self {
            ListPage::Species => "/species",
            ListPage::Habitats => "/habitats",
            ListPage::HabitatSpecies => "/habitats/species",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ListPage::Species => "Species",
            ListPage::Habitats => "Habitats",
            ListPage::HabitatSpecies => "Species in habitat",
        }
    }

    pub fn filters(self) -> &'static [FilterKey] {
        match self {
            ListPage::Species => SPECIES_FILTERS,
            ListPage::Habitats => HABITAT_FILTERS,
            ListPage::HabitatSpecies => HABITAT_SPECIES_FILTERS,
        }
    }

    /// Whether the filter is a user search (and so gets an empty-result
    /// notice) rather than the page's fixed scope.
    pub fn is_searchable(self) -> bool {
        !matches!(self, ListPage::HabitatSpecies)
    }

    pub fn style(self) -> StyleSheet {
        match self {
            ListPage::Species => StyleSheet {
                view: "species",
                accent: Accent::Green,
                compact: true,
            },
            ListPage::Habitats => StyleSheet {
                view: "habitats",
                accent: Accent::Blue,
                compact: false,
            },
            ListPage::HabitatSpecies => StyleSheet {
                view: "habitat-species",
                accent: Accent::Yellow,
                compact: true,
            },
        }
    }

    fn filter_keys(self) -> Vec<&'static str> {
        self.filters().iter().map(|f| f.key).collect()
    }

    fn filter_key(self, key: &str) -> Option<&'static FilterKey> {
        self.filters().iter().find(|f| f.key == key)
    }

    pub fn location(self, state: &PageState) -> Location {
        Location::new(self.path(), state.encode())
    }
}

/// Link from a habitat row to the species living there.
pub fn habitat_species_location(habitat_id: &str) -> Location {
    let state = PageState::default().with_filter(Some(Filter::new("habitat", habitat_id)));
    ListPage::HabitatSpecies.location(&state)
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadStatus<T> {
    Idle,
    Loading,
    Loaded(T),
    Failed,
}

impl<T> LoadStatus<T> {
    pub fn loaded(&self) -> Option<&T> {
        match self {
            LoadStatus::Loaded(value) => Some(value),
            _ => None,
        }
    }
}

pub struct ListView {
    page: ListPage,
    state: PageState,
    status: LoadStatus<ResultPage<Record>>,
    notice: Option<Notice>,
}

impl ListView {
    pub fn new(page: ListPage) -> Self {
        Self {
            page,
            state: PageState::default(),
            status: LoadStatus::Idle,
            notice: None,
        }
    }

    pub fn page(&self) -> ListPage {
        self.page
    }

    pub fn state(&self) -> &PageState {
        &self.state
    }

    pub fn status(&self) -> &LoadStatus<ResultPage<Record>> {
        &self.status
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn rows(&self) -> &[Record] {
        self.status
            .loaded()
            .map(|page| page.items.as_slice())
            .unwrap_or(&[])
    }

    pub fn location(&self) -> Location {
        self.page.location(&self.state)
    }

    /// Pagination for the loaded result, if any.
    pub fn window(&self) -> Option<PaginationWindow> {
        self.status.loaded().map(|result| {
            PaginationWindow::new(self.state.page, result.total_pages, DEFAULT_VISIBLE)
        })
    }

    /// The address bar changed: adopt its state and build the fetch.
    ///
    /// Returns `None` when there is nothing to fetch (the sub-collection page
    /// opened without a habitat), in which case the view is `Failed` with a
    /// notice.
    pub fn on_navigate(&mut self, query: &str, client: &ZooClient) -> Option<HttpRequest> {
        self.state = PageState::decode(query, &self.page.filter_keys());
        self.notice = None;

        if self.page == ListPage::HabitatSpecies {
            let habitat = self.state.filter.as_ref().map(|f| f.value.as_str());
            match habitat.map(|h| validate::resource_id(Resource::Habitats, h)) {
                Some(Ok(())) => {}
                Some(Err(err)) => {
                    self.status = LoadStatus::Failed;
                    self.notice = Some(Notice::from(&err));
                    return None;
                }
                None => {
                    self.status = LoadStatus::Failed;
                    self.notice = Some(Notice::warning("Pick a habitat to list its species."));
                    return None;
                }
            }
        }

        let mut query = ListQuery::new(self.state.page, self.state.page_size);
        if let Some(filter) = &self.state.filter {
            if let Some(key) = self.page.filter_key(&filter.field) {
                query = query.filter(key.field, filter.value.clone());
            }
        }
        debug!(page = ?self.page, state = ?self.state, "loading");
        self.status = LoadStatus::Loading;
        Some(client.build_list(self.page.resource(), &query))
    }

    /// Apply the outcome of the fetch built by `on_navigate`.
    ///
    /// Returns a location to `replace` the current one with when the
    /// requested page lies past the last page (clamp to the last page).
    pub fn on_response(
        &mut self,
        client: &ZooClient,
        response: Result<HttpResponse, ApiError>,
    ) -> Option<Location> {
        match response.and_then(|r| client.parse_list(r)) {
            Ok(result) => {
                if result.is_empty() && result.total_pages < self.state.page {
                    let clamped = self.state.with_page(result.total_pages).ok()?;
                    debug!(
                        requested = self.state.page,
                        last = result.total_pages,
                        "page past the end, clamping"
                    );
                    self.status = LoadStatus::Loaded(result);
                    return Some(self.page.location(&clamped));
                }
                if result.is_empty() && self.page.is_searchable() {
                    if let Some(filter) = &self.state.filter {
                        self.notice = Some(Notice::info(format!(
                            "No {} match \"{}\".",
                            self.page.resource().path(),
                            filter.value
                        )));
                    }
                }
                self.status = LoadStatus::Loaded(result);
                None
            }
            Err(err) => {
                warn!(page = ?self.page, error = %err, "list load failed");
                self.notice = Some(Notice::from(&err));
                self.status = LoadStatus::Failed;
                None
            }
        }
    }

    /// `on_navigate` + execute + `on_response` in one step.
    pub fn load<T: Transport>(
        &mut self,
        transport: &T,
        client: &ZooClient,
        query: &str,
    ) -> Option<Location> {
        let request = self.on_navigate(query, client)?;
        let response = transport.execute(&request);
        self.on_response(client, response)
    }

    /// Validate a search and produce the location that shows its first page.
    ///
    /// On rejection the state and address bar stay as they are and an inline
    /// notice is set.
    pub fn search(&mut self, key: &str, term: &str) -> Result<Location, ValidationError> {
        let result = self.search_state(key, term);
        match &result {
            Ok(_) => self.notice = None,
            Err(err) => self.notice = Some(Notice::from(err)),
        }
        result.map(|state| self.page.location(&state))
    }

    fn search_state(&self, key: &str, term: &str) -> Result<PageState, ValidationError> {
        if !self.page.is_searchable() || self.page.filter_key(key).is_none() {
            return Err(ValidationError::UnknownFilter {
                key: key.to_string(),
            });
        }
        let term = validate::search_term(term)?;
        Ok(self.state.with_filter(Some(Filter::new(key, term))))
    }

    pub fn clear_search(&self) -> Location {
        if self.page.is_searchable() {
            self.page.location(&self.state.with_filter(None))
        } else {
            self.location()
        }
    }

    pub fn goto_page(&self, page: u32) -> Result<Location, ValidationError> {
        self.state
            .with_page(page)
            .map(|state| self.page.location(&state))
    }

    pub fn next_page(&self) -> Option<Location> {
        self.window()
            .filter(|w| w.show_next)
            .and_then(|_| self.goto_page(self.state.page + 1).ok())
    }

    pub fn previous_page(&self) -> Option<Location> {
        self.window()
            .filter(|w| w.show_previous)
            .and_then(|_| self.goto_page(self.state.page - 1).ok())
    }

    pub fn set_page_size(&self, page_size: u32) -> Result<Location, ValidationError> {
        self.state
            .with_page_size(page_size)
            .map(|state| self.page.location(&state))
    }
}
