//! HTTP surface: router construction, CORS and serving.

pub mod error;
pub mod handlers;

use axum::Router;
use axum::routing::get;
use http::HeaderValue;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::info;

use crate::aggregator::SourceAggregator;
use crate::error::AppError;

/// Shared, immutable request state.
#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<SourceAggregator>,
}

impl AppState {
    pub fn new(aggregator: SourceAggregator) -> Self {
        Self {
            aggregator: Arc::new(aggregator),
        }
    }
}

/// CORS for the configured frontend origins. Credentials are allowed, so
/// methods and headers are mirrored from the request rather than wildcarded.
pub fn cors_layer(origins: &[String]) -> Result<CorsLayer, AppError> {
    let origins = origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin)
                .map_err(|e| AppError::config_error(format!("Invalid CORS origin '{origin}': {e}")))
        })
        .collect::<Result<Vec<_>, _>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true))
}

/// Build the full router with all routes and middleware.
pub fn build_router(state: AppState, allowed_origins: &[String]) -> Result<Router, AppError> {
    let api = Router::new()
        // FBref
        .route(
            "/api/fbref/players/:league/:season",
            get(handlers::fbref_players),
        )
        .route("/api/fbref/teams/:league/:season", get(handlers::fbref_teams))
        .route(
            "/api/fbref/schedule/:league/:season",
            get(handlers::fbref_schedule),
        )
        // Understat
        .route(
            "/api/understat/players/:league/:season",
            get(handlers::understat_players),
        )
        .route(
            "/api/understat/team-stats/:league/:season",
            get(handlers::understat_team_stats),
        )
        .route(
            "/api/understat/fixtures/:league/:season",
            get(handlers::understat_fixtures),
        )
        // Schedules from the remaining providers
        .route(
            "/api/fotmob/schedule/:league/:season",
            get(handlers::fotmob_schedule),
        )
        .route(
            "/api/sofascore/schedule/:league/:season",
            get(handlers::sofascore_schedule),
        )
        .route(
            "/api/whoscored/schedule/:league/:season",
            get(handlers::whoscored_schedule),
        )
        // Ratings
        .route("/api/clubelo/ratings", get(handlers::clubelo_ratings))
        .route("/api/sofifa/players/:league", get(handlers::sofifa_players))
        // Multi-source and utility
        .route(
            "/api/combined/player-stats/:league/:season",
            get(handlers::combined_player_stats),
        )
        .route("/api/leagues", get(handlers::leagues))
        .route("/health", get(handlers::health));

    Ok(api.with_state(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors_layer(allowed_origins)?),
    ))
}

/// Serves the router until Ctrl-C.
pub async fn serve(router: Router, bind_address: &str) -> Result<(), AppError> {
    let listener = tokio::net::TcpListener::bind(bind_address).await?;
    info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        // Without a signal handler, keep serving until the process is killed
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
