//! Provider clients: one per upstream statistics source.
//!
//! The aggregation layer only sees the [`ProviderClient`] trait. The shipped
//! implementation, [`HttpProviderClient`], talks to a scraper gateway that
//! exposes every provider's tables as JSON.

pub mod http;
pub mod http_client;
pub mod urls;
pub mod wire;

pub use self::http::HttpProviderClient;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::config::Config;
use crate::error::AppError;
use crate::table::Table;

/// Upstream statistics sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Provider {
    Fbref,
    Understat,
    Fotmob,
    Sofascore,
    Whoscored,
    Clubelo,
    Sofifa,
}

impl Provider {
    pub const ALL: [Provider; 7] = [
        Provider::Fbref,
        Provider::Understat,
        Provider::Fotmob,
        Provider::Sofascore,
        Provider::Whoscored,
        Provider::Clubelo,
        Provider::Sofifa,
    ];

    /// Stable lowercase name used in provenance tags and gateway paths
    pub fn name(self) -> &'static str {
        match self {
            Provider::Fbref => "fbref",
            Provider::Understat => "understat",
            Provider::Fotmob => "fotmob",
            Provider::Sofascore => "sofascore",
            Provider::Whoscored => "whoscored",
            Provider::Clubelo => "clubelo",
            Provider::Sofifa => "sofifa",
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The kind of table requested from a provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dataset {
    /// `stat_type` selects the stat table for providers that have several
    PlayerSeasonStats { stat_type: Option<String> },
    TeamSeasonStats { stat_type: Option<String> },
    Schedule,
    /// Club ratings as of today
    Ratings,
    /// Player ratings, optionally for a specific game version
    Players { version: Option<String> },
}

impl Dataset {
    /// Path segment of the dataset on the gateway
    pub fn path(&self) -> &'static str {
        match self {
            Dataset::PlayerSeasonStats { .. } => "player_season_stats",
            Dataset::TeamSeasonStats { .. } => "team_season_stats",
            Dataset::Schedule => "schedule",
            Dataset::Ratings => "ratings",
            Dataset::Players { .. } => "players",
        }
    }

    /// Dataset-specific query parameters
    pub fn params(&self) -> Vec<(&'static str, &str)> {
        match self {
            Dataset::PlayerSeasonStats {
                stat_type: Some(stat_type),
            }
            | Dataset::TeamSeasonStats {
                stat_type: Some(stat_type),
            } => vec![("stat_type", stat_type.as_str())],
            Dataset::Players {
                version: Some(version),
            } => vec![("version", version.as_str())],
            _ => Vec::new(),
        }
    }
}

/// One table request, already in the provider's vocabulary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderRequest {
    /// Provider-specific league code; `None` for league-independent datasets
    pub league: Option<String>,
    pub season: Option<String>,
    pub dataset: Dataset,
}

impl ProviderRequest {
    pub fn new(league: Option<String>, season: Option<String>, dataset: Dataset) -> Self {
        Self {
            league,
            season,
            dataset,
        }
    }
}

/// A source of tables. Implementations fail with [`AppError::ProviderFetch`]
/// for anything that goes wrong upstream.
#[async_trait]
pub trait ProviderClient: Send + Sync {
    fn provider(&self) -> Provider;

    async fn fetch(&self, request: &ProviderRequest) -> Result<Table, AppError>;
}

/// The provider clients available to the aggregator, one per provider.
#[derive(Clone, Default)]
pub struct ProviderSet {
    clients: HashMap<Provider, Arc<dyn ProviderClient>>,
}

impl fmt::Debug for ProviderSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut providers: Vec<&str> = self.clients.keys().map(|p| p.name()).collect();
        providers.sort_unstable();
        f.debug_struct("ProviderSet")
            .field("providers", &providers)
            .finish()
    }
}

impl ProviderSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a client under the provider it reports.
    pub fn with_client(mut self, client: Arc<dyn ProviderClient>) -> Self {
        self.clients.insert(client.provider(), client);
        self
    }

    /// HTTP clients for every provider, sharing one connection pool.
    pub fn http(config: &Config) -> Result<Self, AppError> {
        let client = http_client::create_http_client_with_timeout(config.http_timeout_seconds)?;
        let set = Provider::ALL.iter().fold(Self::new(), |set, &provider| {
            set.with_client(Arc::new(HttpProviderClient::new(
                provider,
                client.clone(),
                config.provider_base_url.clone(),
            )))
        });
        Ok(set)
    }

    pub fn get(&self, provider: Provider) -> Result<Arc<dyn ProviderClient>, AppError> {
        self.clients.get(&provider).cloned().ok_or_else(|| {
            AppError::provider_fetch(provider.name(), "no client configured for provider")
        })
    }
}
