use std::sync::Arc;

use axum::Router;
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use hoopdex_core::PlayerId;

use crate::dto::{
    HealthResponse, PlayerEntryResponse, PlayerQuery, SearchQuery, StatSeriesResponse,
};
use crate::error::ApiError;
use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Build the full router with all routes.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/search", get(search))
        .route("/api/player", get(player))
        .route("/health", get(health))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/api/search",
    params(SearchQuery),
    responses(
        (status = 200, description = "Up to 10 ranked players", body = Vec<PlayerEntryResponse>),
    ),
    tag = "players"
)]
pub async fn search(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> impl IntoResponse {
    let q = query.q.unwrap_or_default();
    let results: Vec<PlayerEntryResponse> = state
        .index
        .search(&q)
        .into_iter()
        .map(PlayerEntryResponse::from)
        .collect();

    axum::Json(results)
}

// ---------------------------------------------------------------------------
// Player stats
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/api/player",
    params(PlayerQuery),
    responses(
        (status = 200, description = "Season-by-season points per game", body = StatSeriesResponse),
        (status = 400, description = "Invalid identifier", body = crate::dto::ErrorResponse),
        (status = 502, description = "Remote page could not be rendered", body = crate::dto::ErrorResponse),
        (status = 504, description = "Render timed out", body = crate::dto::ErrorResponse),
    ),
    tag = "players"
)]
pub async fn player(
    State(state): State<Arc<AppState>>,
    Query(query): Query<PlayerQuery>,
) -> Result<impl IntoResponse, ApiError> {
    // Validate before anything touches the network.
    let id = PlayerId::parse(query.path.as_deref().unwrap_or_default())?;

    let stats = state.stats.extract(&id).await?;

    Ok(axum::Json(StatSeriesResponse::from(stats)))
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse),
    ),
    tag = "system"
)]
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let response = HealthResponse {
        ok: true,
        players: state.index.len(),
        state: state.index.state().to_string(),
        index_ready_at: state.index.adopted_at(),
    };

    axum::Json(response)
}
