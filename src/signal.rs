/*
 * Responsibility
 * - graceful shutdown のきっかけになる OS シグナルを待つ
 * - どのシグナルで止まったかを呼び出し側 (app::run) に返す
 */
use std::fmt;

use tokio::signal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShutdownSignal {
    /// SIGINT / Ctrl+C
    Interrupt,
    /// SIGTERM (container stop, systemd)
    Terminate,
}

impl fmt::Display for ShutdownSignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShutdownSignal::Interrupt => f.write_str("SIGINT"),
            ShutdownSignal::Terminate => f.write_str("SIGTERM"),
        }
    }
}

/// Wait for the first shutdown signal.
///
/// A handler that cannot be installed is logged and never fires; the other
/// one still works.
pub async fn shutdown_signal() -> ShutdownSignal {
    tokio::select! {
        () = interrupt() => ShutdownSignal::Interrupt,
        () = terminate() => ShutdownSignal::Terminate,
    }
}

async fn interrupt() {
    if let Err(e) = signal::ctrl_c().await {
        tracing::error!(error = %e, "cannot listen for SIGINT");
        std::future::pending::<()>().await;
    }
}

#[cfg(unix)]
async fn terminate() {
    use tokio::signal::unix::{SignalKind, signal};

    match signal(SignalKind::terminate()) {
        Ok(mut stream) => {
            stream.recv().await;
        }
        Err(e) => {
            tracing::error!(error = %e, "cannot listen for SIGTERM");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(not(unix))]
async fn terminate() {
    std::future::pending::<()>().await;
}
