use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use crate::services::ProjectMutations;

/// Result of confirming a pending delete
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// Deleted; the list should be refreshed
    Deleted { id: String },
    Failed { id: String, error: String },
    /// Nothing was pending, or that id is already being deleted
    Skipped,
}

impl DeleteOutcome {
    pub fn needs_refresh(&self) -> bool {
        matches!(self, DeleteOutcome::Deleted { .. })
    }
}

#[derive(Default)]
struct DeleteState {
    pending: Option<String>,
    deleting: HashSet<String>,
}

/// Two-step delete: request, then confirm or cancel.
///
/// At most one delete per id is in flight; different ids are independent.
#[derive(Default)]
pub struct DeleteFlow {
    state: Mutex<DeleteState>,
}

impl DeleteFlow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ask for confirmation before deleting `id`
    pub fn request_delete(&self, id: &str) {
        self.lock().pending = Some(id.to_string());
    }

    pub fn cancel_delete(&self) {
        self.lock().pending = None;
    }

    /// Id awaiting confirmation, if the confirmation prompt is showing
    pub fn pending(&self) -> Option<String> {
        self.lock().pending.clone()
    }

    pub fn is_deleting(&self, id: &str) -> bool {
        self.lock().deleting.contains(id)
    }

    pub async fn confirm_delete(&self, actions: &dyn ProjectMutations) -> DeleteOutcome {
        let in_flight = {
            let mut state = self.lock();
            let Some(id) = state.pending.take() else {
                return DeleteOutcome::Skipped;
            };
            if !state.deleting.insert(id.clone()) {
                return DeleteOutcome::Skipped;
            }
            InFlight { flow: self, id }
        };

        let result = actions.delete_project(&in_flight.id).await;
        let id = in_flight.id.clone();
        drop(in_flight);

        match result.error() {
            None => DeleteOutcome::Deleted { id },
            Some(error) => {
                tracing::debug!("Delete of {} failed: {}", id, error);
                DeleteOutcome::Failed {
                    error: error.to_string(),
                    id,
                }
            }
        }
    }

    fn lock(&self) -> MutexGuard<'_, DeleteState> {
        self.state.lock().unwrap_or_else(|p| p.into_inner())
    }
}

/// Clears the in-flight marker for `id`, including when the confirm is dropped mid-delete
struct InFlight<'a> {
    flow: &'a DeleteFlow,
    id: String,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.flow.lock().deleting.remove(&self.id);
    }
}
