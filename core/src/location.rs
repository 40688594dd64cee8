//! The address bar as an explicit store.
//!
//! # Design
//! Views never change what they display in response to a user action.
//! They compute the `Location` that describes the new view and hand it to
//! `AddressBar::push`; the host then loads whatever the bar points at. Back
//! and forward replay earlier locations the same way, so a restored entry
//! renders exactly like a freshly opened link.

use std::fmt;

use tracing::debug;

/// Path plus query string (without the `?`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub path: String,
    pub query: String,
}

impl Location {
    pub fn new(path: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: query.into(),
        }
    }

    /// Split `/path?query`. A missing leading slash is added.
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        let (path, query) = raw.split_once('?').unwrap_or((raw, ""));
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{path}")
        };
        Self {
            path,
            query: query.to_string(),
        }
    }

    pub fn route(&self) -> Route {
        Route::parse(&self.path)
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.query.is_empty() {
            f.write_str(&self.path)
        } else {
            write!(f, "{}?{}", self.path, self.query)
        }
    }
}

/// Page a path resolves to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Species,
    Habitats,
    HabitatSpecies,
    Leagues,
    NotFound,
}

impl Route {
    pub fn parse(path: &str) -> Self {
        match path.trim_end_matches('/') {
            "" | "/species" => Route::Species,
            "/habitats" => Route::Habitats,
            "/habitats/species" => Route::HabitatSpecies,
            "/leagues" => Route::Leagues,
            _ => Route::NotFound,
        }
    }
}

/// Current location plus back/forward history.
#[derive(Debug, Clone)]
pub struct AddressBar {
    back: Vec<Location>,
    current: Location,
    forward: Vec<Location>,
}

impl AddressBar {
    pub fn new(start: Location) -> Self {
        Self {
            back: Vec::new(),
            current: start,
            forward: Vec::new(),
        }
    }

    pub fn current(&self) -> &Location {
        &self.current
    }

    /// Record a navigation. Pushing the current location again is a no-op
    /// on history but still reports the location to load.
    pub fn push(&mut self, location: Location) -> &Location {
        if location != self.current {
            debug!(from = %self.current, to = %location, "navigate");
            let previous = std::mem::replace(&mut self.current, location);
            self.back.push(previous);
            self.forward.clear();
        }
        &self.current
    }

    /// Rewrite the current entry without adding history.
    pub fn replace(&mut self, location: Location) -> &Location {
        debug!(from = %self.current, to = %location, "replace");
        self.current = location;
        &self.current
    }

    pub fn back(&mut self) -> Option<&Location> {
        let previous = self.back.pop()?;
        let current = std::mem::replace(&mut self.current, previous);
        self.forward.push(current);
        Some(&self.current)
    }

    pub fn forward(&mut self) -> Option<&Location> {
        let next = self.forward.pop()?;
        let current = std::mem::replace(&mut self.current, next);
        self.back.push(current);
        Some(&self.current)
    }

    pub fn can_go_back(&self) -> bool {
        !self.back.is_empty()
    }

    pub fn can_go_forward(&self) -> bool {
        !self.forward.is_empty()
    }
}
