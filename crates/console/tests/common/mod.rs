//! Shared fixtures for console integration tests.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use campus_console::config::ConsoleConfig;
use campus_console::state::ConsoleState;
use campus_core::collaborators::{CellCommitter, StudentCreator};
use campus_core::error::CoreError;
use campus_core::record::{Record, RecordStatus, UNASSIGNED_REVIEWER};
use campus_core::student::Student;
use campus_core::table::CellEdit;
use campus_events::{Notification, NotificationBus};
use tokio::sync::{broadcast, Semaphore};

pub fn records(n: i64) -> Vec<Record> {
    (1..=n)
        .map(|id| Record {
            id,
            header: format!("Section {id}"),
            kind: "Narrative".to_string(),
            status: if id % 2 == 0 {
                RecordStatus::Done
            } else {
                RecordStatus::InProcess
            },
            target: "10".to_string(),
            limit: "4".to_string(),
            reviewer: UNASSIGNED_REVIEWER.to_string(),
        })
        .collect()
}

/// Collaborator that blocks every call until a permit is released, then
/// answers with a fixed result.
pub struct Gate {
    permits: Semaphore,
    result: Result<(), CoreError>,
    pub calls: AtomicUsize,
}

impl Gate {
    pub fn new(result: Result<(), CoreError>) -> Arc<Self> {
        Arc::new(Self {
            permits: Semaphore::new(0),
            result,
            calls: AtomicUsize::new(0),
        })
    }

    pub fn open() -> Arc<Self> {
        let gate = Self::new(Ok(()));
        gate.release(1_000);
        gate
    }

    pub fn failing() -> Arc<Self> {
        let gate = Self::new(Err(CoreError::Internal("backend unavailable".into())));
        gate.release(1_000);
        gate
    }

    pub fn release(&self, n: usize) {
        self.permits.add_permits(n);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    async fn pass(&self) -> Result<(), CoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let permit = self
            .permits
            .acquire()
            .await
            .map_err(|e| CoreError::Internal(e.to_string()))?;
        permit.forget();
        self.result.clone()
    }
}

#[async_trait]
impl CellCommitter for Gate {
    async fn commit(&self, _edit: &CellEdit) -> Result<(), CoreError> {
        self.pass().await
    }
}

#[async_trait]
impl StudentCreator for Gate {
    async fn create(&self, _student: &Student) -> Result<(), CoreError> {
        self.pass().await
    }
}

/// Committer that panics on every call.
pub struct Panics;

#[async_trait]
impl CellCommitter for Panics {
    async fn commit(&self, edit: &CellEdit) -> Result<(), CoreError> {
        panic!("commit of row {} blew up", edit.row_id);
    }
}

pub fn state(
    records: Vec<Record>,
    committer: Arc<dyn CellCommitter>,
    creator: Arc<Gate>,
) -> (ConsoleState, broadcast::Receiver<Notification>) {
    let bus = Arc::new(NotificationBus::default());
    let rx = bus.subscribe();
    let state = ConsoleState::with_collaborators(
        &ConsoleConfig::default(),
        records,
        bus,
        committer,
        creator,
    )
    .unwrap();
    (state, rx)
}

pub fn drain(rx: &mut broadcast::Receiver<Notification>) -> Vec<Notification> {
    let mut out = Vec::new();
    while let Ok(n) = rx.try_recv() {
        out.push(n);
    }
    out
}

/// A complete, valid set of form values.
pub const VALID_FIELDS: &[(&str, &str)] = &[
    ("name", "Ada Lovelace"),
    ("email", "ada@example.com"),
    ("password", "secret1"),
    ("phone", "5551234"),
    ("rollNumber", "17"),
    ("className", "10"),
    ("section", "B"),
    ("guardian.name", "Anne"),
    ("guardian.phone", "5559876"),
    ("guardian.relation", "Mother"),
    ("dateOfBirth", "2010-05-01"),
    ("address", "12 St James's Square"),
];
