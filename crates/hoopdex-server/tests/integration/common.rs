use std::sync::Arc;

use axum::Router;
use tempfile::TempDir;

use hoopdex_core::testutil::MockRenderer;
use hoopdex_core::{
    IndexStore, JsonSnapshot, PlayerEntry, PlayerIndex, SharedRenderer, SiteLayout, StatsExtractor,
};
use hoopdex_server::routes;
use hoopdex_server::state::AppState;

pub struct TestApp {
    pub router: Router,
    pub store: Arc<IndexStore>,
    pub renderer: MockRenderer,
    // Keeps the snapshot directory alive for the test's duration.
    _dir: TempDir,
}

/// App whose index has not been adopted yet.
pub fn setup_test_app(renderer: MockRenderer) -> TestApp {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let store = Arc::new(IndexStore::new(JsonSnapshot::new(
        dir.path().join("player_index.json"),
    )));

    let state = Arc::new(AppState {
        index: store.clone(),
        stats: StatsExtractor::new(SharedRenderer::new(renderer.clone()), SiteLayout::default()),
    });

    TestApp {
        router: routes::router(state),
        store,
        renderer,
        _dir: dir,
    }
}

/// App with `players` already adopted.
pub fn setup_ready_app(renderer: MockRenderer, players: &[(&str, &str)]) -> TestApp {
    let app = setup_test_app(renderer);
    let index = PlayerIndex::from_raw(
        players
            .iter()
            .map(|(name, id)| PlayerEntry::new(*name, *id))
            .collect(),
    );
    app.store.adopt(index).expect("Failed to adopt test index");
    app
}
