use std::sync::Arc;

use campus_core::collaborators::{CellCommitter, StudentCreator};
use campus_core::error::CoreError;
use campus_core::record::Record;
use campus_core::table::TableStore;
use campus_events::NotificationBus;

use crate::config::ConsoleConfig;
use crate::form::FormController;
use crate::simulated::{DelayedCommitter, DelayedStudentCreator};
use crate::table::TableController;

/// Shared state handed to every IPC handler.
///
/// Cloning is cheap: both controllers are reference counted.
#[derive(Clone)]
pub struct ConsoleState {
    pub table: TableController,
    pub form: FormController,
    pub bus: Arc<NotificationBus>,
}

impl ConsoleState {
    /// Mount the table and the form with the simulated collaborators.
    pub fn build(
        config: &ConsoleConfig,
        records: Vec<Record>,
        bus: Arc<NotificationBus>,
    ) -> Result<Self, CoreError> {
        Self::with_collaborators(
            config,
            records,
            bus,
            Arc::new(DelayedCommitter::new(config.commit_delay)),
            Arc::new(DelayedStudentCreator::new(config.create_delay)),
        )
    }

    pub fn with_collaborators(
        config: &ConsoleConfig,
        records: Vec<Record>,
        bus: Arc<NotificationBus>,
        committer: Arc<dyn CellCommitter>,
        creator: Arc<dyn StudentCreator>,
    ) -> Result<Self, CoreError> {
        let store = TableStore::new(records, config.table_config())?;
        Ok(Self {
            table: TableController::new(store, bus.clone(), committer),
            form: FormController::new(config.teachers.clone(), creator, bus.clone()),
            bus,
        })
    }
}
