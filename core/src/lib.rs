//! Client core for the zoo records admin front end.
//!
//! # Overview
//! Builds `HttpRequest` values and parses `HttpResponse` values without
//! touching the network (host-does-IO pattern). On top of the client sit the
//! pieces every admin page is made of: the address-bar codec, the pagination
//! window, the list-view state machine, the schema-driven create form and
//! the delete tool.
//!
//! # Design
//! - `ZooClient` and `SportsClient` are stateless; they hold only a base URL.
//! - Each request is split into `build_*` and `parse_*`, so the I/O boundary
//!   is explicit. Flows that need several requests in a row take a
//!   `Transport` implemented by the host.
//! - The address bar is the single source of truth for what a list page
//!   shows. User actions yield a `Location`; loading is driven by navigation.
//! - Failures become `Notice`s on the page that caused them and never take
//!   another page down.

pub mod client;
pub mod delete;
pub mod drain;
pub mod error;
pub mod form;
pub mod http;
pub mod location;
pub mod notice;
pub mod pagination;
pub mod query;
pub mod resource;
pub mod sports;
pub mod style;
pub mod types;
pub mod validate;
pub mod view;

pub use client::{ListQuery, ZooClient};
pub use delete::{Confirm, DeleteOutcome, DeleteTool};
pub use drain::{drain_all, drain_ids, CancelToken, Drain};
pub use error::{ApiError, ValidationError};
pub use form::{CreateForm, FieldDescriptor, FieldRule, FormKind, FormRecord, SubmitOutcome};
pub use http::{HttpMethod, HttpRequest, HttpResponse, Transport};
pub use location::{AddressBar, Location, Route};
pub use notice::{Level, Notice};
pub use pagination::{PageButton, PaginationWindow};
pub use query::{Filter, PageState};
pub use resource::Resource;
pub use sports::{League, LeagueQuery, LeagueView, SportsClient};
pub use style::{StyleGuard, StyleRegistry, StyleSheet};
pub use types::{Record, ResultPage};
pub use view::{ListPage, ListView, LoadStatus};
