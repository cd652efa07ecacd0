//! Line-delimited JSON IPC.
//!
//! One request per input line, one response per output line. Lifecycle
//! notifications are interleaved on the same output as
//! `{"event":"notification", ...}` lines.

mod error;
mod handlers;
mod router;
mod types;

use campus_events::Notification;
use serde_json::{json, Value};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tokio::sync::{broadcast, mpsc};

use crate::state::ConsoleState;

pub use router::handle_request;
pub use types::Request;

/// Methods answered from a spawned task so that the read loop keeps
/// accepting requests while they run.
const DETACHED_METHODS: &[&str] = &["form.submit"];

fn send(out: &mpsc::UnboundedSender<String>, value: Value) -> bool {
    out.send(value.to_string()).is_ok()
}

/// Read requests from `input` until end of stream and queue every response
/// line on `out`.
pub async fn serve<R>(
    state: ConsoleState,
    input: R,
    out: mpsc::UnboundedSender<String>,
) -> std::io::Result<()>
where
    R: AsyncBufRead + Unpin,
{
    let mut lines = input.lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let req: Request = match serde_json::from_str(&line) {
            Ok(v) => v,
            Err(e) => {
                // No id to reply to.
                tracing::warn!(error = %e, "Malformed IPC request");
                send(
                    &out,
                    json!({
                        "ok": false,
                        "error": { "code": "bad_json", "message": e.to_string() }
                    }),
                );
                continue;
            }
        };

        tracing::debug!(id = %req.id, method = %req.method, "IPC request");
        if DETACHED_METHODS.contains(&req.method.as_str()) {
            let state = state.clone();
            let out = out.clone();
            tokio::spawn(async move {
                let resp = handle_request(&state, req).await;
                send(&out, resp);
            });
        } else {
            let resp = handle_request(&state, req).await;
            if !send(&out, resp) {
                tracing::warn!("Output channel closed, stopping IPC loop");
                break;
            }
        }
    }
    tracing::info!("IPC input closed");
    Ok(())
}

/// Drain queued lines into `writer`, one per line, until every sender is
/// dropped.
pub async fn write_lines<W>(mut rx: mpsc::UnboundedReceiver<String>, mut writer: W) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    while let Some(line) = rx.recv().await {
        writer.write_all(line.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
    }
    Ok(())
}

pub fn notification_line(notification: &Notification) -> Value {
    json!({
        "event": "notification",
        "operationId": notification.operation_id,
        "kind": notification.kind,
        "message": notification.message,
        "timestamp": notification.timestamp,
    })
}

/// Copy every bus notification onto the output queue.
pub async fn forward_notifications(
    mut rx: broadcast::Receiver<Notification>,
    out: mpsc::UnboundedSender<String>,
) {
    loop {
        match rx.recv().await {
            Ok(notification) => {
                if !send(&out, notification_line(&notification)) {
                    break;
                }
            }
            Err(broadcast::error::RecvError::Lagged(n)) => {
                tracing::warn!(skipped = n, "Notification forwarder lagged");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
