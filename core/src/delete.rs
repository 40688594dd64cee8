//! Delete one record of any collection, picked from its full ID list.

use tracing::{info, warn};

use crate::client::ZooClient;
use crate::drain::{drain_ids, CancelToken};
use crate::error::{ApiError, ValidationError};
use crate::http::Transport;
use crate::notice::Notice;
use crate::resource::Resource;
use crate::style::{Accent, StyleSheet};
use crate::validate;

/// Blocking yes/no prompt shown before a deletion is sent.
pub trait Confirm {
    fn confirm(&mut self, prompt: &str) -> bool;
}

impl<F: FnMut(&str) -> bool> Confirm for F {
    fn confirm(&mut self, prompt: &str) -> bool {
        self(prompt)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted { id: String },
    /// The user declined the prompt.
    Declined,
    Rejected(ValidationError),
    Failed,
}

pub struct DeleteTool {
    resource: Option<Resource>,
    ids: Vec<String>,
    selection: Option<String>,
    notice: Option<Notice>,
    cancel: CancelToken,
}

impl Default for DeleteTool {
    fn default() -> Self {
        Self::new()
    }
}

impl DeleteTool {
    pub fn new() -> Self {
        Self {
            resource: None,
            ids: Vec::new(),
            selection: None,
            notice: None,
            cancel: CancelToken::new(),
        }
    }

    pub fn resource(&self) -> Option<Resource> {
        self.resource
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn selection(&self) -> Option<&str> {
        self.selection.as_deref()
    }

    pub fn notice(&self) -> Option<&Notice> {
        self.notice.as_ref()
    }

    pub fn cancel_token(&self) -> CancelToken {
        self.cancel.clone()
    }

    pub fn style(&self) -> StyleSheet {
        StyleSheet {
            view: "delete",
            accent: Accent::Magenta,
            compact: true,
        }
    }

    /// Pick the collection and enumerate its IDs. A failure leaves the list
    /// empty and sets a notice; the tool stays usable.
    pub fn select_resource<T: Transport>(
        &mut self,
        transport: &T,
        client: &ZooClient,
        resource: Resource,
    ) -> Result<(), ApiError> {
        if self.resource != Some(resource) {
            self.cancel.cancel();
            self.cancel = CancelToken::new();
        }
        self.resource = Some(resource);
        self.selection = None;
        self.notice = None;
        self.refresh(transport, client)
    }

    fn refresh<T: Transport>(&mut self, transport: &T, client: &ZooClient) -> Result<(), ApiError> {
        let Some(resource) = self.resource else {
            return Ok(());
        };
        match drain_ids(transport, client, resource, &self.cancel) {
            Ok(ids) => {
                self.ids = ids;
                Ok(())
            }
            Err(err) => {
                warn!(%resource, error = %err, "id enumeration failed");
                self.ids.clear();
                self.notice = Some(Notice::error(format!(
                    "Could not load {} IDs. {}",
                    resource.singular(),
                    err.user_message()
                )));
                Err(err)
            }
        }
    }

    pub fn select(&mut self, id: impl Into<String>) {
        let id = id.into();
        self.selection = if id.trim().is_empty() {
            None
        } else {
            Some(id.trim().to_string())
        };
    }

    fn check_selection(&self) -> Result<(Resource, String), ValidationError> {
        let resource = self.resource.ok_or(ValidationError::NoSelection)?;
        let id = self.selection.clone().ok_or(ValidationError::NoSelection)?;
        validate::resource_id(resource, &id)?;
        Ok((resource, id))
    }

    /// Validate, confirm, delete, then re-enumerate.
    pub fn delete<T: Transport, C: Confirm>(
        &mut self,
        transport: &T,
        client: &ZooClient,
        confirm: &mut C,
    ) -> DeleteOutcome {
        let (resource, id) = match self.check_selection() {
            Ok(selected) => selected,
            Err(err) => {
                self.notice = Some(Notice::from(&err));
                return DeleteOutcome::Rejected(err);
            }
        };

        let prompt = format!("Delete {} {id}? This cannot be undone.", resource.singular());
        if !confirm.confirm(&prompt) {
            self.notice = Some(Notice::info("Deletion cancelled."));
            return DeleteOutcome::Declined;
        }

        let result = client
            .build_delete(resource, &id)
            .and_then(|request| transport.execute(&request))
            .and_then(|response| client.parse_delete(response));

        match result {
            Ok(()) => {
                info!(%resource, %id, "record deleted");
                self.selection = None;
                // A failed refresh sets its own notice; the deletion stands.
                if self.refresh(transport, client).is_ok() {
                    self.notice = Some(Notice::success(format!("Deleted {id}.")));
                }
                DeleteOutcome::Deleted { id }
            }
            Err(err) => {
                warn!(%resource, %id, error = %err, "delete failed");
                self.notice = Some(Notice::error(format!(
                    "Could not delete {id}. {}",
                    err.user_message()
                )));
                DeleteOutcome::Failed
            }
        }
    }
}

impl Drop for DeleteTool {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
