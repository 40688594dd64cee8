//! Walk every page of a collection, one request at a time.
//!
//! Used wherever the UI needs the whole collection in memory: foreign-key
//! dropdowns on the create form and the ID list of the delete tool.
//! Records are yielded lazily; the next page is only requested once the
//! current one is exhausted.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tracing::debug;

use crate::client::{ListQuery, ZooClient};
use crate::error::ApiError;
use crate::http::Transport;
use crate::resource::Resource;
use crate::types::{record_id, Record};

/// Page size used for exhaustive fetches.
pub const DRAIN_PAGE_SIZE: u32 = 20;

/// Shared stop flag. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Lazy iterator over every record of a collection.
///
/// Stops after the page the server reports as last, on the first error, or
/// once the token is cancelled (yielding `ApiError::Cancelled` once).
pub struct Drain<'a, T: Transport> {
    transport: T,
    client: &'a ZooClient,
    resource: Resource,
    page_size: u32,
    next_page: u32,
    total_pages: Option<u32>,
    cancel: CancelToken,
    buffer: VecDeque<Record>,
    finished: bool,
}

impl<'a, T: Transport> Drain<'a, T> {
    pub fn new(transport: T, client: &'a ZooClient, resource: Resource, cancel: CancelToken) -> Self {
        Self {
            transport,
            client,
            resource,
            page_size: DRAIN_PAGE_SIZE,
            next_page: 1,
            total_pages: None,
            cancel,
            buffer: VecDeque::new(),
            finished: false,
        }
    }

    pub fn page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    fn has_more_pages(&self) -> bool {
        self.total_pages.is_none_or(|total| self.next_page <= total)
    }

    fn fetch_next(&mut self) -> Result<(), ApiError> {
        if self.cancel.is_cancelled() {
            return Err(ApiError::Cancelled);
        }
        let query = ListQuery::new(self.next_page, self.page_size);
        let request = self.client.build_list(self.resource, &query);
        let response = self.transport.execute(&request)?;
        let page = self.client.parse_list(response)?;
        debug!(
            resource = %self.resource,
            page = self.next_page,
            total_pages = page.total_pages,
            rows = page.items.len(),
            "drained page"
        );
        self.total_pages = Some(page.total_pages);
        self.next_page += 1;
        self.buffer.extend(page.items);
        Ok(())
    }
}

impl<T: Transport> Iterator for Drain<'_, T> {
    type Item = Result<Record, ApiError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(record) = self.buffer.pop_front() {
                return Some(Ok(record));
            }
            if self.finished || !self.has_more_pages() {
                return None;
            }
            if let Err(err) = self.fetch_next() {
                self.finished = true;
                return Some(Err(err));
            }
        }
    }
}

/// Every record of `resource`.
pub fn drain_all<T: Transport>(
    transport: T,
    client: &ZooClient,
    resource: Resource,
    cancel: &CancelToken,
) -> Result<Vec<Record>, ApiError> {
    Drain::new(transport, client, resource, cancel.clone()).collect()
}

/// Every primary key of `resource`, in server order.
pub fn drain_ids<T: Transport>(
    transport: T,
    client: &ZooClient,
    resource: Resource,
    cancel: &CancelToken,
) -> Result<Vec<String>, ApiError> {
    let mut ids = Vec::new();
    for record in Drain::new(transport, client, resource, cancel.clone()) {
        if let Some(id) = record_id(&record?, resource) {
            ids.push(id);
        }
    }
    Ok(ids)
}
