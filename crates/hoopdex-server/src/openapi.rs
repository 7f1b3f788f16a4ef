use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "hoopdex API",
        version = "0.1.0",
        description = "Player name search and per-season points-per-game lookup."
    ),
    paths(
        crate::routes::search,
        crate::routes::player,
        crate::routes::health,
    ),
    components(schemas(
        crate::dto::PlayerEntryResponse,
        crate::dto::SeasonStatResponse,
        crate::dto::WarningResponse,
        crate::dto::StatSeriesResponse,
        crate::dto::HealthResponse,
        crate::dto::ErrorResponse,
    )),
    tags(
        (name = "players", description = "Player search and stats"),
        (name = "system", description = "Health and readiness"),
    )
)]
pub struct ApiDoc;
