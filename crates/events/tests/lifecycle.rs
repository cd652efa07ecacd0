//! Bus-level lifecycle guarantees observed from a subscriber.

use std::time::Duration;

use campus_events::{LifecycleMessages, NotificationBus, NotificationKind, NotificationLogger};

fn edit_messages() -> LifecycleMessages {
    LifecycleMessages::new("Saving Cover page", "Done", "Error")
}

/// Concurrent operations each deliver pending then exactly one terminal
/// message under their own id.
#[tokio::test]
async fn concurrent_operations_resolve_independently() {
    let bus = NotificationBus::default();
    let mut rx = bus.subscribe();

    let a = bus.begin(edit_messages());
    let b = bus.begin(edit_messages());
    let (a_id, b_id) = (a.id(), b.id());
    assert_ne!(a_id, b_id);

    b.fail();
    a.succeed();

    let mut seen = Vec::new();
    while let Ok(n) = rx.try_recv() {
        seen.push((n.operation_id, n.kind));
    }
    assert_eq!(
        seen,
        vec![
            (a_id, NotificationKind::Pending),
            (b_id, NotificationKind::Pending),
            (b_id, NotificationKind::Failure),
            (a_id, NotificationKind::Success),
        ]
    );
}

/// A task cancelled mid-operation still reports a failure.
#[tokio::test]
async fn aborted_task_reports_failure() {
    let bus = std::sync::Arc::new(NotificationBus::default());
    let mut rx = bus.subscribe();

    let task_bus = bus.clone();
    let handle = tokio::spawn(async move {
        task_bus
            .track(edit_messages(), std::future::pending::<Result<(), ()>>())
            .await
    });

    let pending = rx.recv().await.unwrap();
    assert_eq!(pending.kind, NotificationKind::Pending);

    handle.abort();
    let terminal = tokio::time::timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("terminal notification")
        .unwrap();
    assert_eq!(terminal.kind, NotificationKind::Failure);
    assert_eq!(terminal.message, "Error");
    assert_eq!(terminal.operation_id, pending.operation_id);
}

/// The logger task ends once the bus is dropped.
#[tokio::test]
async fn logger_stops_when_bus_closes() {
    let bus = NotificationBus::default();
    let logger = tokio::spawn(NotificationLogger::run(bus.subscribe()));

    bus.begin(edit_messages()).succeed();
    drop(bus);

    tokio::time::timeout(Duration::from_secs(1), logger)
        .await
        .expect("logger should exit after the bus closes")
        .unwrap();
}
