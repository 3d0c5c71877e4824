//! End-to-end tests: API router -> HTTP provider clients -> stub gateway.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::Json;
use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::routing::get;
use http::{Request, StatusCode};
use http_body_util::BodyExt;
use serde_json::{Value, json};
use soccerdata_api::aggregator::{ProvenancePolicy, SourceAggregator};
use soccerdata_api::catalog::LeagueCatalog;
use soccerdata_api::config::Config;
use soccerdata_api::providers::ProviderSet;
use soccerdata_api::server::{AppState, build_router};
use tokio::net::TcpListener;
use tower::ServiceExt;

type Seen = Arc<Mutex<Vec<(String, String, HashMap<String, String>)>>>;

async fn gateway_table(
    State(seen): State<Seen>,
    Path((provider, dataset)): Path<(String, String)>,
    Query(params): Query<HashMap<String, String>>,
) -> axum::response::Response {
    seen.lock()
        .unwrap()
        .push((provider.clone(), dataset.clone(), params));

    match (provider.as_str(), dataset.as_str()) {
        ("fbref", "player_season_stats") => Json(json!({
            "index": [
                {"name": "league", "dtype": "object"},
                {"name": "season", "dtype": "object"},
                {"name": "team", "dtype": "object"},
                {"name": "player", "dtype": "object"}
            ],
            "columns": [
                {"name": ["nation", ""], "dtype": "object"},
                {"name": ["Performance", "Gls"], "dtype": "float64"},
                {"name": ["Expected", "xG"], "dtype": "float64"}
            ],
            "data": [
                ["ENG-Premier League", "2324", "Arsenal", "Bukayo Saka", "ENG", 16.0, 14.2],
                ["ENG-Premier League", "2324", "Brentford", "Ivan Toney", null, "NaN", "Infinity"]
            ]
        }))
        .into_response(),
        ("understat", "player_season_stats") => (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(json!({"detail": "understat is down"})),
        )
            .into_response(),
        ("fotmob", "schedule") => Json(json!({
            "index": [
                {"name": "league", "dtype": "object"},
                {"name": "game", "dtype": "object"}
            ],
            "columns": [
                {"name": "date", "dtype": "datetime64[ns]"},
                {"name": "home_score", "dtype": "Int64"}
            ],
            "data": [
                ["ESP-La Liga", "2023-08-11 Almería-Rayo Vallecano", 1691784000000i64, 0],
                ["ESP-La Liga", "2023-08-12 Sevilla-Valencia", "2023-08-12T19:30:00", null]
            ]
        }))
        .into_response(),
        ("clubelo", "ratings") => Json(json!({
            "index": [{"name": null, "dtype": "int64"}],
            "columns": [
                {"name": "team", "dtype": "object"},
                {"name": "elo", "dtype": "float64"},
                {"name": "to", "dtype": "datetime64[ns]"}
            ],
            "data": [[0, "Man City", 2050.5, "2100-01-01"]]
        }))
        .into_response(),
        ("sofascore", "schedule") => "not json".into_response(),
        _ => (
            StatusCode::NOT_FOUND,
            Json(json!({"detail": "unknown dataset"})),
        )
            .into_response(),
    }
}

/// Starts a stub gateway on a random local port and returns its base URL.
async fn spawn_gateway() -> (String, Seen) {
    let seen: Seen = Arc::new(Mutex::new(Vec::new()));
    let router = axum::Router::new()
        .route("/:provider/:dataset", get(gateway_table))
        .with_state(seen.clone());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    (format!("http://{addr}"), seen)
}

async fn api(policy: ProvenancePolicy) -> (axum::Router, Seen) {
    let (base_url, seen) = spawn_gateway().await;
    let config = Config {
        provider_base_url: base_url,
        http_timeout_seconds: 5,
        combined_provenance: policy,
        ..Config::default()
    };
    let aggregator = SourceAggregator::new(
        LeagueCatalog::standard(),
        ProviderSet::http(&config).unwrap(),
        config.combined_provenance,
    );
    let router = build_router(AppState::new(aggregator), &config.allowed_origins).unwrap();
    (router, seen)
}

async fn get_json(app: axum::Router, uri: &str) -> (StatusCode, Value) {
    let response = app
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_fbref_players_through_gateway() {
    let (app, seen) = api(ProvenancePolicy::Legacy).await;

    let (status, body) = get_json(app, "/api/fbref/players/premier-league/2324").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["source"], "fbref");
    assert_eq!(
        body["data"][0],
        json!({
            "league": "ENG-Premier League",
            "season": "2324",
            "team": "Arsenal",
            "player": "Bukayo Saka",
            "nation": "ENG",
            "Performance_Gls": 16.0,
            "Expected_xG": 14.2
        })
    );
    assert_eq!(body["data"][1]["nation"], Value::Null);
    assert_eq!(body["data"][1]["Performance_Gls"], Value::Null);
    assert_eq!(body["data"][1]["Expected_xG"], Value::Null);

    let seen = seen.lock().unwrap();
    assert_eq!(seen.len(), 1);
    let (provider, dataset, params) = &seen[0];
    assert_eq!(provider, "fbref");
    assert_eq!(dataset, "player_season_stats");
    assert_eq!(params["league"], "ENG-Premier League");
    assert_eq!(params["season"], "2324");
    assert_eq!(params["stat_type"], "standard");
}

#[tokio::test]
async fn test_schedule_datetimes_become_dates() {
    let (app, seen) = api(ProvenancePolicy::Legacy).await;

    let (status, body) = get_json(app, "/api/fotmob/schedule/la-liga/2324").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["date"], "2023-08-11");
    assert_eq!(body["data"][0]["home_score"], 0);
    assert_eq!(body["data"][1]["date"], "2023-08-12");
    assert_eq!(body["data"][1]["home_score"], Value::Null);
    assert_eq!(seen.lock().unwrap()[0].2["league"], "ESP-La Liga");
}

#[tokio::test]
async fn test_clubelo_has_no_league_or_season() {
    let (app, seen) = api(ProvenancePolicy::Legacy).await;

    let (status, body) = get_json(app, "/api/clubelo/ratings").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"][0],
        json!({"index": 0, "team": "Man City", "elo": 2050.5, "to": "2100-01-01"})
    );
    let seen = seen.lock().unwrap();
    assert!(seen[0].2.is_empty());
}

#[tokio::test]
async fn test_combined_legacy_and_honest_provenance() {
    let (app, _) = api(ProvenancePolicy::Legacy).await;
    let (status, body) = get_json(app, "/api/combined/player-stats/premier-league/2324").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sources"], json!(["fbref", "understat"]));
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let (app, _) = api(ProvenancePolicy::Honest).await;
    let (status, body) = get_json(app, "/api/combined/player-stats/premier-league/2324").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["sources"], json!(["fbref"]));
}

#[tokio::test]
async fn test_gateway_errors_surface_as_detail() {
    let (app, _) = api(ProvenancePolicy::Legacy).await;
    let (status, body) = get_json(app, "/api/understat/players/premier-league/2324").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.starts_with("understat fetch failed: "), "{detail}");
    assert!(detail.contains("understat is down"), "{detail}");

    let (app, _) = api(ProvenancePolicy::Legacy).await;
    let (status, body) = get_json(app, "/api/sofascore/schedule/serie-a/2324").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    let detail = body["detail"].as_str().unwrap();
    assert!(detail.starts_with("sofascore fetch failed: "), "{detail}");
    assert!(detail.contains("malformed JSON"), "{detail}");

    let (app, _) = api(ProvenancePolicy::Legacy).await;
    let (status, body) = get_json(app, "/api/whoscored/schedule/serie-a/2324").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["detail"].as_str().unwrap().contains("(404)"));
}
