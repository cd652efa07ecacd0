//! Fixed-delay collaborators standing in for a real backend.
//!
//! Both always succeed after their delay.

use std::time::Duration;

use async_trait::async_trait;
use campus_core::collaborators::{CellCommitter, StudentCreator};
use campus_core::error::CoreError;
use campus_core::student::Student;
use campus_core::table::CellEdit;

pub struct DelayedCommitter {
    delay: Duration,
}

impl DelayedCommitter {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl CellCommitter for DelayedCommitter {
    async fn commit(&self, edit: &CellEdit) -> Result<(), CoreError> {
        tokio::time::sleep(self.delay).await;
        tracing::debug!(
            row_id = edit.row_id,
            field = %edit.field,
            value = %edit.value,
            "Cell edit committed"
        );
        Ok(())
    }
}

pub struct DelayedStudentCreator {
    delay: Duration,
}

impl DelayedStudentCreator {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl StudentCreator for DelayedStudentCreator {
    async fn create(&self, student: &Student) -> Result<(), CoreError> {
        tokio::time::sleep(self.delay).await;
        tracing::info!(
            name = %student.name,
            email = %student.email,
            class_name = %student.class_name,
            section = %student.section,
            "Student submitted"
        );
        Ok(())
    }
}
