//! Route handlers.
//!
//! GET /api/fbref/players/:league/:season        player season stats (`stat_type`)
//! GET /api/fbref/teams/:league/:season          team season stats (`stat_type`)
//! GET /api/fbref/schedule/:league/:season       match schedule
//! GET /api/understat/players/:league/:season    player xG/xA stats
//! GET /api/understat/team-stats/:league/:season
//! GET /api/understat/fixtures/:league/:season
//! GET /api/fotmob/schedule/:league/:season
//! GET /api/sofascore/schedule/:league/:season
//! GET /api/whoscored/schedule/:league/:season
//! GET /api/clubelo/ratings                      current club Elo ratings
//! GET /api/sofifa/players/:league               player ratings (`version`)
//! GET /api/combined/player-stats/:league/:season
//! GET /api/leagues
//! GET /health

use axum::Json;
use axum::extract::{Path, Query, State};
use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::AppState;
use crate::catalog::League;
use crate::constants::{DEFAULT_STAT_TYPE, FBREF_STAT_TYPES};
use crate::envelope::{Provenance, ResponseEnvelope};
use crate::error::AppError;
use crate::providers::{Dataset, Provider};

#[derive(Debug, Deserialize)]
pub struct StatTypeQuery {
    pub stat_type: Option<String>,
}

impl StatTypeQuery {
    /// The requested stat type, `standard` when absent. Unknown values are
    /// forwarded as-is and left for the provider to reject.
    fn stat_type(self) -> Option<String> {
        let stat_type = self
            .stat_type
            .unwrap_or_else(|| DEFAULT_STAT_TYPE.to_string());
        if !FBREF_STAT_TYPES.contains(&stat_type.as_str()) {
            debug!("Unrecognized FBref stat type '{stat_type}', forwarding unchanged");
        }
        Some(stat_type)
    }
}

#[derive(Debug, Deserialize)]
pub struct VersionQuery {
    pub version: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct LeaguesResponse {
    pub leagues: &'static [League],
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
}

async fn season_table(
    state: &AppState,
    provider: Provider,
    league: &str,
    season: &str,
    dataset: Dataset,
) -> Result<ResponseEnvelope, AppError> {
    let records = state
        .aggregator
        .fetch_single(provider, Some(league), Some(season), dataset)
        .await?;
    Ok(ResponseEnvelope::single(records, provider))
}

pub async fn fbref_players(
    State(state): State<AppState>,
    Path((league, season)): Path<(String, String)>,
    Query(query): Query<StatTypeQuery>,
) -> Result<ResponseEnvelope, AppError> {
    let dataset = Dataset::PlayerSeasonStats {
        stat_type: query.stat_type(),
    };
    season_table(&state, Provider::Fbref, &league, &season, dataset).await
}

pub async fn fbref_teams(
    State(state): State<AppState>,
    Path((league, season)): Path<(String, String)>,
    Query(query): Query<StatTypeQuery>,
) -> Result<ResponseEnvelope, AppError> {
    let dataset = Dataset::TeamSeasonStats {
        stat_type: query.stat_type(),
    };
    season_table(&state, Provider::Fbref, &league, &season, dataset).await
}

pub async fn fbref_schedule(
    State(state): State<AppState>,
    Path((league, season)): Path<(String, String)>,
) -> Result<ResponseEnvelope, AppError> {
    season_table(&state, Provider::Fbref, &league, &season, Dataset::Schedule).await
}

pub async fn understat_players(
    State(state): State<AppState>,
    Path((league, season)): Path<(String, String)>,
) -> Result<ResponseEnvelope, AppError> {
    let dataset = Dataset::PlayerSeasonStats { stat_type: None };
    season_table(&state, Provider::Understat, &league, &season, dataset).await
}

pub async fn understat_team_stats(
    State(state): State<AppState>,
    Path((league, season)): Path<(String, String)>,
) -> Result<ResponseEnvelope, AppError> {
    let dataset = Dataset::TeamSeasonStats { stat_type: None };
    season_table(&state, Provider::Understat, &league, &season, dataset).await
}

pub async fn understat_fixtures(
    State(state): State<AppState>,
    Path((league, season)): Path<(String, String)>,
) -> Result<ResponseEnvelope, AppError> {
    season_table(&state, Provider::Understat, &league, &season, Dataset::Schedule).await
}

pub async fn fotmob_schedule(
    State(state): State<AppState>,
    Path((league, season)): Path<(String, String)>,
) -> Result<ResponseEnvelope, AppError> {
    season_table(&state, Provider::Fotmob, &league, &season, Dataset::Schedule).await
}

pub async fn sofascore_schedule(
    State(state): State<AppState>,
    Path((league, season)): Path<(String, String)>,
) -> Result<ResponseEnvelope, AppError> {
    season_table(&state, Provider::Sofascore, &league, &season, Dataset::Schedule).await
}

pub async fn whoscored_schedule(
    State(state): State<AppState>,
    Path((league, season)): Path<(String, String)>,
) -> Result<ResponseEnvelope, AppError> {
    season_table(&state, Provider::Whoscored, &league, &season, Dataset::Schedule).await
}

pub async fn clubelo_ratings(
    State(state): State<AppState>,
) -> Result<ResponseEnvelope, AppError> {
    let records = state
        .aggregator
        .fetch_single(Provider::Clubelo, None, None, Dataset::Ratings)
        .await?;
    Ok(ResponseEnvelope::single(records, Provider::Clubelo))
}

pub async fn sofifa_players(
    State(state): State<AppState>,
    Path(league): Path<String>,
    Query(query): Query<VersionQuery>,
) -> Result<ResponseEnvelope, AppError> {
    let dataset = Dataset::Players {
        version: query.version,
    };
    let records = state
        .aggregator
        .fetch_single(Provider::Sofifa, Some(&league), None, dataset)
        .await?;
    Ok(ResponseEnvelope::single(records, Provider::Sofifa))
}

pub async fn combined_player_stats(
    State(state): State<AppState>,
    Path((league, season)): Path<(String, String)>,
) -> Result<ResponseEnvelope, AppError> {
    let result = state.aggregator.fetch_combined(&league, &season).await?;
    Ok(ResponseEnvelope::wrap(
        result.records,
        Provenance::Multiple(result.sources),
    ))
}

pub async fn leagues(State(state): State<AppState>) -> Json<LeaguesResponse> {
    Json(LeaguesResponse {
        leagues: state.aggregator.catalog().leagues(),
    })
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
    })
}
