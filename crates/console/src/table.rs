//! Async driver of the record table.
//!
//! [`TableController`] owns the single [`TableStore`] of a table mount.
//! Synchronous commands lock the store briefly; inline edits are applied
//! optimistically under the lock and committed on a spawned task that
//! settles the edit and reports through the notification bus.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use campus_core::collaborators::CellCommitter;
use campus_core::error::CoreError;
use campus_core::record::EditableField;
use campus_core::table::{CellEdit, EditOutcome, PageView, TableStore};
use campus_core::types::RecordId;
use campus_events::{LifecycleMessages, NotificationBus, Operation};
use tokio::task::JoinHandle;

/// An edit whose commit has not settled yet.
///
/// Dropped without [`finish`](Self::finish) (task aborted, committer
/// panicked) it settles the edit as failed before reporting the failure.
struct PendingCommit {
    controller: TableController,
    edit: CellEdit,
    operation: Option<Operation>,
}

impl PendingCommit {
    fn finish(mut self, result: &Result<(), CoreError>) -> EditOutcome {
        let outcome = self
            .controller
            .lock()
            .settle_cell_edit(&self.edit, result.is_ok());
        if let Some(operation) = self.operation.take() {
            operation.resolve(result);
        }
        outcome
    }
}

impl Drop for PendingCommit {
    fn drop(&mut self) {
        let Some(operation) = self.operation.take() else {
            return;
        };
        let outcome = self.controller.lock().settle_cell_edit(&self.edit, false);
        tracing::warn!(
            row_id = self.edit.row_id,
            field = %self.edit.field,
            seq = self.edit.seq,
            ?outcome,
            "Cell commit abandoned"
        );
        operation.fail();
    }
}

/// Lifecycle messages of one inline cell commit.
pub fn cell_edit_messages(edit: &CellEdit) -> LifecycleMessages {
    LifecycleMessages::new(format!("Saving {}", edit.header), "Done", "Error")
}

#[derive(Clone)]
pub struct TableController {
    store: Arc<Mutex<TableStore>>,
    bus: Arc<NotificationBus>,
    committer: Arc<dyn CellCommitter>,
}

impl TableController {
    pub fn new(store: TableStore, bus: Arc<NotificationBus>, committer: Arc<dyn CellCommitter>) -> Self {
        Self {
            store: Arc::new(Mutex::new(store)),
            bus,
            committer,
        }
    }

    fn lock(&self) -> MutexGuard<'_, TableStore> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run a synchronous command against the store.
    pub fn with_store<R>(&self, f: impl FnOnce(&mut TableStore) -> R) -> R {
        f(&mut self.lock())
    }

    pub fn view(&self) -> PageView {
        self.lock().page_view()
    }

    /// Apply an inline edit now and commit it in the background.
    ///
    /// The pending notification is published before this returns. Returns
    /// `None` without notifying if the row is not loaded.
    pub fn dispatch_cell_edit(
        &self,
        row_id: RecordId,
        field: EditableField,
        value: impl Into<String>,
    ) -> Option<JoinHandle<EditOutcome>> {
        let Some(edit) = self.lock().begin_cell_edit(row_id, field, value) else {
            tracing::debug!(row_id, %field, "Ignoring edit of a row that is not loaded");
            return None;
        };
        tracing::info!(row_id, %field, seq = edit.seq, "Dispatching cell edit");

        let operation = self.bus.begin(cell_edit_messages(&edit));
        let pending = PendingCommit {
            controller: self.clone(),
            edit,
            operation: Some(operation),
        };
        Some(tokio::spawn(async move {
            let result = pending.controller.committer.commit(&pending.edit).await;
            let (row_id, field, seq) = (pending.edit.row_id, pending.edit.field, pending.edit.seq);
            let outcome = pending.finish(&result);
            match &result {
                Ok(()) => tracing::info!(row_id, %field, seq, "Cell edit confirmed"),
                Err(e) => tracing::warn!(
                    row_id,
                    %field,
                    seq,
                    error = %e,
                    ?outcome,
                    "Cell edit failed"
                ),
            }
            outcome
        }))
    }

    /// Dispatch an edit and wait for it to settle.
    pub async fn commit_cell_edit(
        &self,
        row_id: RecordId,
        field: EditableField,
        value: impl Into<String>,
    ) -> Option<EditOutcome> {
        let handle = self.dispatch_cell_edit(row_id, field, value)?;
        match handle.await {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                tracing::error!(error = %e, "Cell commit task failed");
                None
            }
        }
    }
}
