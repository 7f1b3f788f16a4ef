use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use hoopdex_core::AppError;
use hoopdex_core::testutil::{MockRenderer, detail_page};

use crate::common::{setup_ready_app, setup_test_app};

const PLAYERS: &[(&str, &str)] = &[
    ("Michael Jordan", "j/jordami01.html"),
    ("Jordan Clarkson", "c/clarkjo01.html"),
    ("DeAndre Jordan", "j/jordade01.html"),
    ("Jordan Poole", "p/poolejo01.html"),
    ("Larry Bird", "b/birdla01.html"),
];

async fn get_json(router: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let response = router
        .oneshot(Request::get(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let body = response.into_body().collect().await.unwrap().to_bytes();
    let json = serde_json::from_slice(&body).unwrap();
    (status, json)
}

#[tokio::test]
async fn health_reports_not_ready_before_adoption() {
    let app = setup_test_app(MockRenderer::with_responses(vec![]));

    let (status, json) = get_json(app.router, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["ok"], true);
    assert_eq!(json["players"], 0);
    assert_eq!(json["state"], "not_ready");
}

#[tokio::test]
async fn health_reports_index_size_when_ready() {
    let app = setup_ready_app(MockRenderer::with_responses(vec![]), PLAYERS);

    let (_, json) = get_json(app.router, "/health").await;

    assert_eq!(json["players"], 5);
    assert_eq!(json["state"], "ready");
    assert!(json["index_ready_at"].is_string());
}

#[tokio::test]
async fn search_ranks_prefix_matches_first() {
    let app = setup_ready_app(MockRenderer::with_responses(vec![]), PLAYERS);

    let (status, json) = get_json(app.router, "/api/search?q=Jordan").await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<_> = json
        .as_array()
        .unwrap()
        .iter()
        .map(|e| e["displayName"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        ["Jordan Clarkson", "Jordan Poole", "DeAndre Jordan", "Michael Jordan"]
    );
    assert_eq!(json[0]["identifier"], "c/clarkjo01.html");
}

#[tokio::test]
async fn search_with_short_or_missing_query_is_empty() {
    let app = setup_ready_app(MockRenderer::with_responses(vec![]), PLAYERS);

    let (_, json) = get_json(app.router.clone(), "/api/search?q=j").await;
    assert_eq!(json, serde_json::json!([]));

    let (_, json) = get_json(app.router, "/api/search").await;
    assert_eq!(json, serde_json::json!([]));
}

#[tokio::test]
async fn search_before_ready_is_empty() {
    let app = setup_test_app(MockRenderer::with_responses(vec![]));
    app.store.begin_build();

    let (status, json) = get_json(app.router, "/api/search?q=jordan").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, serde_json::json!([]));
}

#[tokio::test]
async fn player_returns_series() {
    let renderer = MockRenderer::new(&detail_page(&[("1984-85", "28.2"), ("1985-86", "22.7")]));
    let app = setup_test_app(renderer);

    let (status, json) = get_json(app.router, "/api/player?path=j/jordami01.html").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["identifier"], "j/jordami01.html");
    assert_eq!(
        json["series"],
        serde_json::json!([
            {"seasonLabel": "1984-85", "value": "28.2"},
            {"seasonLabel": "1985-86", "value": "22.7"}
        ])
    );
    assert!(json.get("warnings").is_none());
}

#[tokio::test]
async fn player_accepts_identifier_alias() {
    let renderer = MockRenderer::new(&detail_page(&[("1984-85", "28.2")]));
    let app = setup_test_app(renderer.clone());

    let (status, _) = get_json(app.router, "/api/player?identifier=J/JORDAMI01.HTML").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        renderer.requested(),
        ["https://www.basketball-reference.com/players/J/JORDAMI01.HTML"]
    );
}

#[tokio::test]
async fn invalid_identifier_is_rejected_without_rendering() {
    let app = setup_test_app(MockRenderer::with_responses(vec![]));

    for uri in [
        "/api/player?path=../secret.html",
        "/api/player?path=jj/x.html",
        "/api/player?path=https://evil.example/x.html",
        "/api/player",
    ] {
        let (status, json) = get_json(app.router.clone(), uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(json["error"], "validation_error");
    }

    assert!(app.renderer.requested().is_empty());
}

#[tokio::test]
async fn render_failure_is_request_scoped() {
    let renderer = MockRenderer::with_responses(vec![
        Err(AppError::NetworkError("connection reset".into())),
        Ok(detail_page(&[("1990-91", "31.5")])),
    ]);
    let app = setup_ready_app(renderer, PLAYERS);

    let (status, json) = get_json(app.router.clone(), "/api/player?path=j/jordami01.html").await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["error"], "fetch_error");

    // The next request and the index are unaffected.
    let (status, json) = get_json(app.router.clone(), "/api/player?path=j/jordami01.html").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["series"][0]["value"], "31.5");
    assert_eq!(app.store.len(), 5);
}

#[tokio::test]
async fn render_timeout_maps_to_504() {
    let app = setup_test_app(MockRenderer::with_error(AppError::Timeout(30)));

    let (status, json) = get_json(app.router, "/api/player?path=j/jordami01.html").await;

    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(json["error"], "timeout");
}

#[tokio::test]
async fn missing_stats_table_is_reported_as_warning() {
    let app = setup_test_app(MockRenderer::new("<html><title>Not Found</title></html>"));

    let (status, json) = get_json(app.router, "/api/player?path=j/jordami01.html").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["series"], serde_json::json!([]));
    assert_eq!(json["warnings"][0]["kind"], "missing_stats_table");
}

#[tokio::test]
async fn openapi_document_is_served() {
    let app = setup_test_app(MockRenderer::with_responses(vec![]));

    let (status, json) = get_json(app.router, "/api-docs/openapi.json").await;

    assert_eq!(status, StatusCode::OK);
    assert!(json["paths"]["/api/search"].is_object());
}
