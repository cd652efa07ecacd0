//! Async collaborators the console delegates persistence to.
//!
//! The core never talks to a backend itself. The embedding application
//! supplies implementations; tests supply doubles.

use async_trait::async_trait;

use crate::error::CoreError;
use crate::student::Student;
use crate::table::CellEdit;

/// Persists a validated student. Invoked exactly once per accepted submit.
#[async_trait]
pub trait StudentCreator: Send + Sync {
    async fn create(&self, student: &Student) -> Result<(), CoreError>;
}

/// Persists one inline cell edit.
#[async_trait]
pub trait CellCommitter: Send + Sync {
    async fn commit(&self, edit: &CellEdit) -> Result<(), CoreError>;
}
