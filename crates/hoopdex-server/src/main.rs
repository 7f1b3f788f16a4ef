use std::sync::Arc;

use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use hoopdex_client::AnyRenderer;
use hoopdex_core::{
    IndexBuilder, IndexStore, JsonSnapshot, SharedRenderer, SiteLayout, StatsExtractor,
    ThrottleConfig,
};
use hoopdex_server::config::ServerConfig;
use hoopdex_server::state::AppState;
use hoopdex_server::{routes, startup};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("hoopdex=info".parse()?))
        .with_target(false)
        .init();
    startup::install_panic_logger();

    let config = ServerConfig::from_env()?;
    let site = SiteLayout::new(&config.base_url)?;

    // Bind before launching anything that needs an orderly release.
    let listener = startup::bind_listener(config.port).await?;

    // One rendering session for the whole process, shared by the crawl and
    // every stats request.
    tracing::info!(renderer = %config.renderer, "Launching page renderer");
    let renderer = AnyRenderer::launch(config.renderer, config.render_timeout).await?;
    let shared = SharedRenderer::new(renderer.clone());

    let store = Arc::new(IndexStore::new(JsonSnapshot::new(&config.index_file)));
    let state = Arc::new(AppState {
        index: store.clone(),
        stats: StatsExtractor::new(shared.clone(), site.clone()),
    });

    let cancel = CancellationToken::new();
    let builder = IndexBuilder::new(shared, site, ThrottleConfig::new(config.crawl_delay));
    let bootstrap = startup::spawn_index_bootstrap(store.clone(), builder, cancel.clone());
    let bootstrap_report = tokio::spawn(startup::report_bootstrap(bootstrap));

    let mut app = routes::router(state);
    if let Some(dir) = &config.static_dir {
        tracing::info!(dir = %dir.display(), "Serving static files");
        app = app.fallback_service(ServeDir::new(dir));
    }
    let app = app
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(startup::shutdown_signal(store.clone(), cancel.clone()))
        .await;

    // Release the shared session even if serving ended with an error.
    cancel.cancel();
    store.shutdown();
    if let Err(e) = renderer.close().await {
        tracing::error!(error = %e, "Error closing renderer");
    }
    let _ = bootstrap_report.await;
    tracing::info!("Server shut down");

    served?;
    Ok(())
}
