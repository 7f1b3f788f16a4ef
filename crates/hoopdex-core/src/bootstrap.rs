use tokio_util::sync::CancellationToken;

use crate::error::AppError;
use crate::index_builder::{CrawlReporter, IndexBuilder};
use crate::index_store::IndexStore;
use crate::models::Anomaly;
use crate::traits::PageRenderer;

/// How the store got its index.
#[derive(Debug, Clone)]
pub enum BootstrapOutcome {
    /// Adopted from the snapshot on disk.
    Loaded { players: usize },
    /// Crawled, adopted, and (if non-empty) saved.
    Built {
        players: usize,
        saved: bool,
        anomalies: Vec<Anomaly>,
    },
}

/// Load the snapshot, or crawl once if there is none, and publish the
/// result to `store`.
///
/// A crawl failure leaves the store `NotReady` and is returned; there is no
/// retry. Cancelling `cancel` stops a crawl in flight.
pub async fn bootstrap<R: PageRenderer>(
    store: &IndexStore,
    builder: &IndexBuilder<R>,
    reporter: &dyn CrawlReporter,
    cancel: &CancellationToken,
) -> Result<BootstrapOutcome, AppError> {
    if let Some(index) = store.load().await {
        let players = index.len();
        store.adopt(index)?;
        tracing::info!(%players, "Index already loaded, skipping rebuild");
        return Ok(BootstrapOutcome::Loaded { players });
    }

    if !store.begin_build() {
        return Err(AppError::Generic(format!(
            "Cannot start index build from state {}",
            store.state()
        )));
    }

    let result = tokio::select! {
        result = builder.build(reporter) => result,
        () = cancel.cancelled() => Err(AppError::Cancelled),
    };

    let report = match result {
        Ok(report) => report,
        Err(e) => {
            store.abort_build();
            tracing::error!(error = %e, "Index build failed");
            return Err(e);
        }
    };

    let players = report.index.len();
    let saved = if report.index.is_empty() {
        tracing::warn!("Crawl produced an empty index; not saving");
        false
    } else {
        store.save(&report.index).await
    };
    store.adopt(report.index)?;

    Ok(BootstrapOutcome::Built {
        players,
        saved,
        anomalies: report.anomalies,
    })
}
