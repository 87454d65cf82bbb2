//! Graceful shutdown with a bounded drain period

use std::future::{Future, IntoFuture};
use std::time::Duration;

use axum::Router;
use tokio::net::TcpListener;
use tokio::signal;
use tokio::sync::watch;
use tracing::{info, warn};

/// Serve `app` until `signal` resolves, then give in-flight requests at most
/// `drain` to finish before returning.
///
/// Returns `true` when every connection closed within the drain period and
/// `false` when the deadline cut them off.
pub async fn serve_with_drain<F>(
    listener: TcpListener,
    app: Router,
    signal: F,
    drain: Duration,
) -> std::io::Result<bool>
where
    F: Future<Output = ()> + Send + 'static,
{
    let (fired_tx, mut fired_rx) = watch::channel(false);
    let graceful = async move {
        signal.await;
        let _ = fired_tx.send(true);
    };

    let server = axum::serve(listener, app)
        .with_graceful_shutdown(graceful)
        .into_future();
    tokio::pin!(server);

    tokio::select! {
        result = &mut server => return result.map(|()| true),
        _ = fired_rx.wait_for(|fired| *fired) => {},
    }

    info!("Waiting up to {} seconds for connections to close", drain.as_secs());
    match tokio::time::timeout(drain, server).await {
        Ok(result) => result.map(|()| true),
        Err(_) => {
            warn!("Shutdown timeout elapsed with connections still open, forcing exit");
            Ok(false)
        },
    }
}

/// Resolves on Ctrl+C or SIGTERM
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, starting graceful shutdown");
        },
        _ = terminate => {
            info!("Received terminate signal, starting graceful shutdown");
        },
    }
}
