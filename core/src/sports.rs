//! League lookup against the public sports-data API.
//!
//! The page is addressed by `c` (country) and `s` (sport). With neither
//! set it stays idle; the API answers under `leagues` or `countries`
//! depending on the query, and `leagues` wins when both are present.

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};
use url::form_urlencoded;

use crate::client::check_status;
use crate::error::{ApiError, ValidationError};
use crate::http::{HttpRequest, HttpResponse, Transport};
use crate::location::Location;
use crate::notice::Notice;
use crate::query::first_value;
use crate::style::{Accent, StyleSheet};
use crate::validate;
use crate::view::LoadStatus;

pub const LEAGUES_PATH: &str = "/leagues";
pub const COUNTRY_KEY: &str = "c";
pub const SPORT_KEY: &str = "s";

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LeagueQuery {
    pub country: Option<String>,
    pub sport: Option<String>,
}

impl LeagueQuery {
    pub fn decode(query: &str) -> Self {
        let non_empty = |key: &str| first_value(query, key).filter(|v| !v.trim().is_empty());
        Self {
            country: non_empty(COUNTRY_KEY),
            sport: non_empty(SPORT_KEY),
        }
    }

    pub fn encode(&self) -> String {
        let mut out = form_urlencoded::Serializer::new(String::new());
        if let Some(country) = &self.country {
            out.append_pair(COUNTRY_KEY, country);
        }
        if let Some(sport) = &self.sport {
            out.append_pair(SPORT_KEY, sport);
        }
        out.finish()
    }

    pub fn is_empty(&self) -> bool {
        self.country.is_none() && self.sport.is_none()
    }

    pub fn location(&self) -> Location {
        Location::new(LEAGUES_PATH, self.encode())
    }

    fn describe(&self) -> String {
        match (&self.country, &self.sport) {
            (Some(c), Some(s)) => format!("{s} in {c}"),
            (Some(c), None) => c.clone(),
            (None, Some(s)) => s.clone(),
            (None, None) => String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct League {
    #[serde(rename = "idLeague", default)]
    pub id: Option<String>,
    #[serde(rename = "strLeague", default)]
    pub name: Option<String>,
    #[serde(rename = "strSport", default)]
    pub sport: Option<String>,
    #[serde(rename = "strCountry", default)]
    pub country: Option<String>,
    #[serde(rename = "strLeagueAlternate", default)]
    pub alternate: Option<String>,
    #[serde(rename = "intFormedYear", default)]
    pub formed_year: Option<String>,
    #[serde(rename = "strWebsite", default)]
    pub website: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LeagueEnvelope {
    #[serde(default)]
    leagues: Option<Vec<League>>,
    #[serde(default)]
    countries: Option<Vec<League>>,
}

#[derive(Debug, Clone)]
pub struct SportsClient {
    base_url: String,
}

impl SportsClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn build_search_leagues(&self, query: &LeagueQuery) -> HttpRequest {
        let mut url = format!("{}/search_all_leagues.php", self.base_url);
        let qs = query.encode();
        if !qs.is_empty() {
            url.push('?');
            url.push_str(&qs);
        }
        debug!(%url, "build league search");
        HttpRequest::get(url)
    }

    pub fn parse_search_leagues(&self, response: HttpResponse) -> Result<Vec<League>, ApiError> {
        check_status(&response)?;
        let envelope: LeagueEnvelope = serde_json::from_str(&response.body)
            .map_err(|e| ApiError::Deserialization(e.to_string()))?;
        Ok(envelope
            .leagues
            .or(envelope.countries)
            .unwrap_or_default())
    }
}

pub fn style() -> StyleSheet {
    StyleSheet {
        view: "leagues",
        accent: Accent::Magenta,
        compact: false,
    }
}

/// The league lookup page. Same load cycle as the list views, no paging.
pub struct LeagueView {
    query: LeagueQuery,
    status: LoadStatus<Vec<League>>,
    notice: Option<Notice>,
}

impl Default for LeagueView {
    fn default() -> Self {
        Self::new()
    }
}

impl LeagueView {
    pub fn new() -> Self {
        Self {
            query: LeagueQuery::default(),
            status: LoadStatus::Idle,
            notice: None,
        }
    }

    pub fn query(&self) -> &LeagueQuery {
        &self.query
    }

    pub fn status(&self) -> &LoadStatus<Vec<League>> {
        &self.status
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn leagues(&self) -> &[League] {
        self.status.loaded().map(Vec::as_slice).unwrap_or(&[])
    }

    /// Adopt the address-bar state. `None` while there is nothing to search.
    pub fn on_navigate(&mut self, query: &str, client: &SportsClient) -> Option<HttpRequest> {
        self.query = LeagueQuery::decode(query);
        self.notice = None;
        if self.query.is_empty() {
            self.status = LoadStatus::Idle;
            return None;
        }
        self.status = LoadStatus::Loading;
        Some(client.build_search_leagues(&self.query))
    }

    pub fn on_response(&mut self, client: &SportsClient, response: Result<HttpResponse, ApiError>) {
        match response.and_then(|r| client.parse_search_leagues(r)) {
            Ok(leagues) => {
                if leagues.is_empty() {
                    self.notice = Some(Notice::info(format!(
                        "No leagues found for {}.",
                        self.query.describe()
                    )));
                }
                self.status = LoadStatus::Loaded(leagues);
            }
            Err(err) => {
                warn!(error = %err, "league search failed");
                self.notice = Some(Notice::from(&err));
                self.status = LoadStatus::Failed;
            }
        }
    }

    pub fn load<T: Transport>(&mut self, transport: &T, client: &SportsClient, query: &str) {
        if let Some(request) = self.on_navigate(query, client) {
            let response = transport.execute(&request);
            self.on_response(client, response);
        }
    }

    /// Validate both inputs and produce the location to push. Blank inputs
    /// are dropped from the query.
    pub fn search(&mut self, country: &str, sport: &str) -> Result<Location, ValidationError> {
        let result = Self::search_query(country, sport);
        match &result {
            Ok(_) => self.notice = None,
            Err(err) => self.notice = Some(Notice::from(err)),
        }
        result.map(|q| q.location())
    }

    fn search_query(country: &str, sport: &str) -> Result<LeagueQuery, ValidationError> {
        let field = |raw: &str| -> Result<Option<String>, ValidationError> {
            if raw.trim().is_empty() {
                Ok(None)
            } else {
                validate::search_term(raw).map(|t| Some(t.to_string()))
            }
        };
        let query = LeagueQuery {
            country: field(country)?,
            sport: field(sport)?,
        };
        if query.is_empty() {
            return Err(ValidationError::EmptySearch);
        }
        Ok(query)
    }
}
