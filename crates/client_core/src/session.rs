use std::sync::Arc;

use anyhow::{Context, Result};
use shared::{domain::StudentId, protocol::StudentSummary};
use tokio::{
    sync::{broadcast, Mutex},
    task::JoinHandle,
};
use tracing::{debug, warn};

use crate::{
    controller::{FilterOutcome, LookupApplied, LookupTicket, RosterController},
    lookup::StudentDirectory,
    row::RosterRow,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RosterEvent {
    SelectionConfirmed {
        row: usize,
        student: StudentSummary,
    },
    /// Blocking alert for the teacher; the row has already been reset.
    DuplicateRejected {
        row: usize,
        id: StudentId,
        message: String,
    },
    SuggestionsUpdated {
        row: usize,
        count: usize,
    },
    LookupFailed {
        row: usize,
        filter: String,
        error: String,
    },
    VisibilityChanged {
        hidden_rows: Vec<usize>,
    },
}

/// Drives a [`RosterController`] from input events, running lookups as
/// detached tasks against a [`StudentDirectory`].
pub struct RosterSession {
    directory: Arc<dyn StudentDirectory>,
    inner: Mutex<RosterController>,
    events: broadcast::Sender<RosterEvent>,
}

impl RosterSession {
    pub fn new(controller: RosterController, directory: Arc<dyn StudentDirectory>) -> Arc<Self> {
        let (events, _) = broadcast::channel(256);
        Arc::new(Self {
            directory,
            inner: Mutex::new(controller),
            events,
        })
    }

    pub fn subscribe_events(&self) -> broadcast::Receiver<RosterEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: RosterEvent) {
        let _ = self.events.send(event);
    }

    /// Applies a text change to `row`. When the change needs a lookup, the
    /// request runs in the background and its handle is returned.
    pub async fn filter_changed(
        self: &Arc<Self>,
        row: usize,
        text: &str,
    ) -> Result<Option<JoinHandle<()>>> {
        let outcome = {
            let mut inner = self.inner.lock().await;
            let hidden_before = inner.hidden_rows();
            let outcome = inner
                .on_filter_changed(row, text)
                .with_context(|| format!("failed to apply text change to roster row {row}"))?;
            let hidden_after = inner.hidden_rows();
            if hidden_after != hidden_before {
                self.emit(RosterEvent::VisibilityChanged {
                    hidden_rows: hidden_after,
                });
            }
            outcome
        };

        match outcome {
            FilterOutcome::Selected(student) => {
                self.emit(RosterEvent::SelectionConfirmed { row, student });
                Ok(None)
            }
            FilterOutcome::Rejected(duplicate) => {
                self.emit(RosterEvent::DuplicateRejected {
                    row: duplicate.row,
                    id: duplicate.id,
                    message: duplicate.message(),
                });
                Ok(None)
            }
            FilterOutcome::Lookup(ticket) => {
                let session = Arc::clone(self);
                Ok(Some(tokio::spawn(session.run_lookup(ticket))))
            }
            FilterOutcome::Unmatched(_) | FilterOutcome::Cleared => Ok(None),
        }
    }

    /// Same as [`Self::filter_changed`], addressing the row by its input name.
    pub async fn filter_changed_by_field(
        self: &Arc<Self>,
        field: &str,
        text: &str,
    ) -> Result<Option<JoinHandle<()>>> {
        let row = self.row_index(field).await?;
        self.filter_changed(row, text).await
    }

    pub async fn row_index(&self, field: &str) -> Result<usize> {
        Ok(self.inner.lock().await.row_index(field)?)
    }

    async fn run_lookup(self: Arc<Self>, ticket: LookupTicket) {
        debug!(row = ticket.row, filter = %ticket.filter, "querying student directory");
        let result = self.directory.filter_students(&ticket.filter).await;
        let error = result.as_ref().err().map(ToString::to_string);

        let applied = self.inner.lock().await.apply_lookup(&ticket, result);
        match applied {
            Ok(LookupApplied::Updated(count)) => {
                self.emit(RosterEvent::SuggestionsUpdated {
                    row: ticket.row,
                    count,
                });
            }
            Ok(LookupApplied::Failed) => {
                self.emit(RosterEvent::LookupFailed {
                    row: ticket.row,
                    filter: ticket.filter,
                    error: error.unwrap_or_default(),
                });
            }
            Ok(LookupApplied::Stale) => {}
            Err(err) => warn!(error = %err, "lookup finished for a row that no longer exists"),
        }
    }

    pub async fn suggestion_picked(
        &self,
        row: usize,
        value: &str,
    ) -> Result<Option<StudentSummary>> {
        let inner = self.inner.lock().await;
        Ok(inner.on_suggestion_picked(row, value)?)
    }

    pub async fn recompute_visibility(&self) -> Vec<usize> {
        self.inner.lock().await.recompute_visibility()
    }

    pub async fn snapshot(&self) -> Vec<RosterRow> {
        self.inner.lock().await.rows().to_vec()
    }

    pub async fn form_fields(&self) -> Vec<(String, String)> {
        self.inner.lock().await.form_fields()
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
