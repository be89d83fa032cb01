//! Read-only view of one event, with owner-only edit and delete.

use tokio_util::sync::CancellationToken;

use crate::error::{WorkflowError, WorkflowResult};
use crate::event::{Event, EventId};
use crate::form::EventForm;
use crate::gateway::RecordGateway;
use crate::session::Session;

pub const DELETE_PROMPT: &str = "Are you sure you want to delete this event?";
pub const DELETE_FAILED: &str = "Failed to delete event";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The user did not confirm; nothing was sent.
    Declined,
    Deleted(EventId),
}

pub struct DetailPanel {
    event: Event,
    owned: bool,
    open: bool,
    cancel: CancellationToken,
}

impl DetailPanel {
    /// Open the panel for `event` as seen by `session`.
    pub fn open(event: Event, session: &Session) -> Self {
        let owned = session.owns(&event);
        DetailPanel {
            event,
            owned,
            open: true,
            cancel: CancellationToken::new(),
        }
    }

    pub fn event(&self) -> &Event {
        &self.event
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn can_edit(&self) -> bool {
        self.owned
    }

    pub fn can_delete(&self) -> bool {
        self.owned
    }

    /// Hand the event over to an edit form. Nothing is written here.
    pub fn edit(&self) -> WorkflowResult<EventForm> {
        if !self.can_edit() {
            return Err(WorkflowError::NotOwner);
        }
        Ok(EventForm::edit(&self.event))
    }

    /// Delete the event once `confirm` agrees. The panel closes on success
    /// and stays open on failure.
    pub async fn delete<R, F>(&mut self, records: &R, confirm: F) -> WorkflowResult<DeleteOutcome>
    where
        R: RecordGateway + ?Sized,
        F: FnOnce(&Event) -> bool,
    {
        if !self.can_delete() {
            return Err(WorkflowError::NotOwner);
        }
        if !confirm(&self.event) {
            return Ok(DeleteOutcome::Declined);
        }

        let id = self.event.id.clone();
        let result = tokio::select! {
            biased;
            _ = self.cancel.cancelled() => return Err(WorkflowError::Cancelled),
            result = records.delete_event(&id) => result,
        };

        match result {
            Ok(()) => {
                tracing::info!(id = %id, "Deleted event");
                self.open = false;
                Ok(DeleteOutcome::Deleted(id))
            }
            Err(e) => {
                tracing::error!(error = %e, id = %id, "Error deleting event");
                Err(e.into())
            }
        }
    }

    pub fn dismiss(&mut self) {
        self.cancel.cancel();
        self.open = false;
    }

    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }
}
