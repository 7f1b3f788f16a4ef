//! Process-level plumbing: background index bootstrap, shutdown signal,
//! panic containment.

use std::sync::Arc;

use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use hoopdex_core::traits::PageRenderer;
use hoopdex_core::{
    AppError, BootstrapOutcome, IndexBuilder, IndexStore, TracingCrawlReporter, bootstrap,
};

/// Run the load-or-build sequence as a background task.
///
/// The returned handle is the completion signal; readiness transitions are
/// also observable through [`IndexStore::subscribe`]. Requests served in
/// the meantime see an empty index.
pub fn spawn_index_bootstrap<R>(
    store: Arc<IndexStore>,
    builder: IndexBuilder<R>,
    cancel: CancellationToken,
) -> JoinHandle<Result<BootstrapOutcome, AppError>>
where
    R: PageRenderer + 'static,
{
    tokio::spawn(async move { bootstrap(&store, &builder, &TracingCrawlReporter, &cancel).await })
}

/// Await the bootstrap task and log how it ended. Never fails: a failed or
/// panicked build leaves the service up with an empty index.
pub async fn report_bootstrap(task: JoinHandle<Result<BootstrapOutcome, AppError>>) {
    match task.await {
        Ok(Ok(BootstrapOutcome::Loaded { players })) => {
            tracing::info!(%players, "Player index ready (from disk)");
        }
        Ok(Ok(BootstrapOutcome::Built {
            players,
            saved,
            anomalies,
        })) => {
            tracing::info!(
                %players,
                %saved,
                anomalies = anomalies.len(),
                "Player index ready (crawled)"
            );
        }
        Ok(Err(AppError::Cancelled)) => {
            tracing::info!("Index build cancelled by shutdown");
        }
        Ok(Err(e)) => {
            tracing::error!(error = %e, "Index build failed; search will return no results");
        }
        Err(e) => {
            tracing::error!(error = %e, "Index build task panicked");
        }
    }
}

/// Bind the API listener on all interfaces.
pub async fn bind_listener(port: u16) -> Result<TcpListener, AppError> {
    let addr = format!("0.0.0.0:{port}");
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::ConfigError(format!("Failed to bind {addr}: {e}")))?;
    tracing::info!("Starting server on http://{addr}");
    Ok(listener)
}

/// Resolve on the first SIGINT / SIGTERM, marking the store as shutting
/// down and cancelling background work.
pub async fn shutdown_signal(store: Arc<IndexStore>, cancel: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
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
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received");
    store.shutdown();
    cancel.cancel();
}

/// Log panics through `tracing` instead of stderr. Tokio already contains
/// panics inside spawned tasks, so the process keeps serving.
pub fn install_panic_logger() {
    std::panic::set_hook(Box::new(|info| {
        tracing::error!(panic = %info, "Unhandled panic");
    }));
}
