use std::sync::Arc;

use hoopdex_core::{IndexStore, SharedRenderer, StatsExtractor};

/// Shared application state, available to all route handlers via `State<Arc<AppState>>`.
pub struct AppState {
    /// The process-wide player index and its readiness.
    pub index: Arc<IndexStore>,
    /// Per-request detail-page extraction over the shared renderer.
    pub stats: StatsExtractor<SharedRenderer>,
}
