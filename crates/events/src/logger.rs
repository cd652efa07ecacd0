//! Writes every notification on the bus to the tracing log.

use tokio::sync::broadcast;

use crate::bus::{Notification, NotificationKind};

/// Background subscriber that logs notifications.
///
/// The loop exits when the channel is closed, i.e. once the
/// [`NotificationBus`](crate::NotificationBus) and every outstanding
/// [`Operation`](crate::Operation) are dropped.
#[derive(Debug, Default)]
pub struct NotificationLogger;

impl NotificationLogger {
    pub async fn run(mut receiver: broadcast::Receiver<Notification>) {
        loop {
            match receiver.recv().await {
                Ok(notification) => Self::log(&notification),
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Notification logger lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Notification bus closed, logger shutting down");
                    break;
                }
            }
        }
    }

    fn log(notification: &Notification) {
        match notification.kind {
            NotificationKind::Failure => tracing::warn!(
                operation_id = %notification.operation_id,
                text = %notification.message,
                "Operation failed"
            ),
            kind => tracing::info!(
                operation_id = %notification.operation_id,
                ?kind,
                text = %notification.message,
                "Operation update"
            ),
        }
    }
}
