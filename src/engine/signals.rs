// src/engine/signals.rs

use tracing::{info, warn};

/// Resolve when the process is asked to terminate (Ctrl-C, or SIGTERM on Unix).
///
/// If no signal source can be installed this never resolves.
pub async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{signal, SignalKind};

        let mut term = match signal(SignalKind::terminate()) {
            Ok(term) => term,
            Err(e) => {
                warn!(error = %e, "failed to listen for SIGTERM");
                return ctrl_c().await;
            }
        };

        tokio::select! {
            _ = ctrl_c() => {}
            _ = term.recv() => info!("received SIGTERM"),
        }
    }

    #[cfg(not(unix))]
    ctrl_c().await;
}

async fn ctrl_c() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("received Ctrl-C"),
        Err(e) => {
            warn!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    }
}
