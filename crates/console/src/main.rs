use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::io::BufReader;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use campus_console::config::{delay_millis, ConsoleConfig};
use campus_console::state::ConsoleState;
use campus_console::{fixture, ipc};
use campus_events::{NotificationBus, NotificationLogger};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    // stdout carries the IPC stream, so logs go to stderr.
    let registry = tracing_subscriber::registry().with(
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| "campus_console=info,campus_events=info".into()),
    );
    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);
    let json_logs = std::env::var("CAMPUS_LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));
    if json_logs {
        registry.with(fmt_layer.json()).init();
    } else {
        registry.with(fmt_layer).init();
    }

    // --- Configuration ---
    let config = ConsoleConfig::from_env().context("Invalid console configuration")?;
    tracing::info!(
        page_size = config.default_page_size,
        commit_delay_ms = delay_millis(config.commit_delay),
        create_delay_ms = delay_millis(config.create_delay),
        "Loaded console configuration"
    );

    // --- Records ---
    let records = fixture::load_records(config.records_path.as_deref())?;

    // --- Event bus ---
    let bus = Arc::new(NotificationBus::default());
    let logger_handle = tokio::spawn(NotificationLogger::run(bus.subscribe()));

    // --- Output ---
    let (out_tx, out_rx) = mpsc::unbounded_channel();
    let writer_handle = tokio::spawn(ipc::write_lines(out_rx, tokio::io::stdout()));
    let forwarder_handle = tokio::spawn(ipc::forward_notifications(
        bus.subscribe(),
        out_tx.clone(),
    ));

    // --- State ---
    let state = ConsoleState::build(&config, records, Arc::clone(&bus))
        .context("Failed to mount the record table")?;
    tracing::info!(
        records = state.table.view().total_count,
        "Console ready, reading requests from stdin"
    );

    let input = BufReader::new(tokio::io::stdin());
    tokio::select! {
        result = ipc::serve(state, input, out_tx) => {
            if let Err(e) = result {
                tracing::error!(error = %e, "IPC input failed");
            }
        }
        () = shutdown_signal() => {}
    }

    // --- Cleanup ---
    // The channel closes once the bus and every controller holding it are
    // gone, which stops the logger and the forwarder.
    drop(bus);
    let _ = tokio::time::timeout(Duration::from_secs(5), logger_handle).await;
    let _ = tokio::time::timeout(Duration::from_secs(5), forwarder_handle).await;
    let _ = tokio::time::timeout(Duration::from_secs(5), writer_handle).await;

    tracing::info!("Shutdown complete");
    Ok(())
}

/// Wait for SIGINT or, on Unix, SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), shutting down");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, shutting down");
        }
    }
}
