//! In-process notification bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`NotificationBus`] is the fan-out hub for [`Notification`]s. It is
//! shared via `Arc<NotificationBus>` between the table, the form and
//! whatever renders the messages.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use campus_core::types::Timestamp;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// Notification
// ---------------------------------------------------------------------------

/// Identity of one logical async operation on a bus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperationId(pub u64);

impl fmt::Display for OperationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "op-{}", self.0)
    }
}

/// Lifecycle stage a notification reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Pending,
    Success,
    Failure,
}

impl NotificationKind {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Pending)
    }
}

/// A transient message about an async operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub operation_id: OperationId,
    pub kind: NotificationKind,
    pub message: String,
    pub timestamp: Timestamp,
}

impl Notification {
    pub fn new(operation_id: OperationId, kind: NotificationKind, message: impl Into<String>) -> Self {
        Self {
            operation_id,
            kind,
            message: message.into(),
            timestamp: Utc::now(),
        }
    }
}

// ---------------------------------------------------------------------------
// NotificationBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 256;

/// In-process fan-out notification bus.
///
/// # Usage
///
/// ```rust
/// use campus_events::{LifecycleMessages, NotificationBus};
///
/// let bus = NotificationBus::default();
/// let _rx = bus.subscribe();
///
/// let op = bus.begin(LifecycleMessages::new("Saving...", "Saved", "Failed"));
/// op.succeed();
/// ```
pub struct NotificationBus {
    pub(crate) sender: broadcast::Sender<Notification>,
    next_operation: AtomicU64,
}

impl NotificationBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full the oldest un-consumed messages are dropped
    /// and slow receivers observe a `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            sender,
            next_operation: AtomicU64::new(1),
        }
    }

    /// Publish a notification to all current subscribers.
    ///
    /// With no subscribers the notification is silently dropped.
    pub fn publish(&self, notification: Notification) {
        if self.sender.send(notification).is_err() {
            tracing::trace!("Notification dropped, no subscribers");
        }
    }

    /// Subscribe to every notification published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }

    pub(crate) fn allocate_operation(&self) -> OperationId {
        OperationId(self.next_operation.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for NotificationBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_and_receive_single_subscriber() {
        let bus = NotificationBus::default();
        let mut rx = bus.subscribe();

        bus.publish(Notification::new(OperationId(3), NotificationKind::Pending, "Saving"));

        let received = rx.recv().await.expect("should receive the notification");
        assert_eq!(received.operation_id, OperationId(3));
        assert_eq!(received.kind, NotificationKind::Pending);
        assert_eq!(received.message, "Saving");
    }

    #[tokio::test]
    async fn multiple_subscribers_receive_same_notification() {
        let bus = NotificationBus::default();
        let mut rx1 = bus.subscribe();
        let mut rx2 = bus.subscribe();

        bus.publish(Notification::new(OperationId(1), NotificationKind::Success, "Done"));

        assert_eq!(rx1.recv().await.unwrap().message, "Done");
        assert_eq!(rx2.recv().await.unwrap().message, "Done");
    }

    #[test]
    fn publish_with_no_subscribers_does_not_panic() {
        let bus = NotificationBus::default();
        bus.publish(Notification::new(OperationId(1), NotificationKind::Failure, "Error"));
    }

    #[test]
    fn operation_ids_are_unique_per_bus() {
        let bus = NotificationBus::default();
        let a = bus.allocate_operation();
        let b = bus.allocate_operation();
        assert_ne!(a, b);
        assert_eq!(a.to_string(), "op-1");
    }

    #[test]
    fn kind_serializes_lowercase() {
        let json = serde_json::to_value(NotificationKind::Pending).unwrap();
        assert_eq!(json, "pending");
        assert!(!NotificationKind::Pending.is_terminal());
        assert!(NotificationKind::Failure.is_terminal());
    }
}
