//! Pending → success/failure lifecycle of one async operation.
//!
//! [`NotificationBus::begin`] publishes the pending message immediately and
//! hands back an [`Operation`]. Resolving the operation consumes it, so a
//! second terminal message cannot be sent. An operation dropped unresolved
//! (for example because the future driving it was cancelled) publishes its
//! failure message, never its success message.

use std::future::Future;

use tokio::sync::broadcast;

use crate::bus::{Notification, NotificationBus, NotificationKind, OperationId};

/// The three messages shown for one operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleMessages {
    pub pending: String,
    pub success: String,
    pub failure: String,
}

impl LifecycleMessages {
    pub fn new(
        pending: impl Into<String>,
        success: impl Into<String>,
        failure: impl Into<String>,
    ) -> Self {
        Self {
            pending: pending.into(),
            success: success.into(),
            failure: failure.into(),
        }
    }
}

/// An in-flight operation that still owes exactly one terminal message.
#[must_use = "an unresolved operation reports failure when dropped"]
pub struct Operation {
    id: OperationId,
    sender: broadcast::Sender<Notification>,
    success: String,
    failure: String,
    resolved: bool,
}

impl Operation {
    pub fn id(&self) -> OperationId {
        self.id
    }

    pub fn succeed(self) {
        self.finish(NotificationKind::Success);
    }

    pub fn fail(self) {
        self.finish(NotificationKind::Failure);
    }

    /// Report success for `Ok`, failure for `Err`.
    pub fn resolve<T, E>(self, result: &Result<T, E>) {
        match result {
            Ok(_) => self.succeed(),
            Err(_) => self.fail(),
        }
    }

    fn finish(mut self, kind: NotificationKind) {
        self.emit(kind);
    }

    fn emit(&mut self, kind: NotificationKind) {
        if self.resolved {
            return;
        }
        self.resolved = true;
        let message = match kind {
            NotificationKind::Success => std::mem::take(&mut self.success),
            _ => std::mem::take(&mut self.failure),
        };
        tracing::debug!(operation_id = %self.id, ?kind, "Operation resolved");
        let _ = self.sender.send(Notification::new(self.id, kind, message));
    }
}

impl Drop for Operation {
    fn drop(&mut self) {
        if !self.resolved {
            tracing::warn!(operation_id = %self.id, "Operation dropped before resolving");
            self.emit(NotificationKind::Failure);
        }
    }
}

impl NotificationBus {
    /// Start an operation: publish its pending message now.
    pub fn begin(&self, messages: LifecycleMessages) -> Operation {
        let id = self.allocate_operation();
        self.publish(Notification::new(id, NotificationKind::Pending, messages.pending));
        Operation {
            id,
            sender: self.sender.clone(),
            success: messages.success,
            failure: messages.failure,
            resolved: false,
        }
    }

    /// Drive `future` as one operation: pending now, then success or failure
    /// depending on its result.
    pub async fn track<F, T, E>(&self, messages: LifecycleMessages, future: F) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
    {
        let operation = self.begin(messages);
        let result = future.await;
        operation.resolve(&result);
        result
    }
}
