//! Orchestration of provider calls for one logical request.

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tracing::{error, info, instrument, warn};

use crate::catalog::LeagueCatalog;
use crate::constants::DEFAULT_STAT_TYPE;
use crate::error::AppError;
use crate::providers::{Dataset, Provider, ProviderRequest, ProviderSet};
use crate::table::{Record, Table, serialize};

/// Primary source of the combined player statistics
pub const COMBINED_PRIMARY: Provider = Provider::Fbref;
/// Secondary (xG/xA) source of the combined player statistics
pub const COMBINED_SECONDARY: Provider = Provider::Understat;

/// How the combined endpoint reports which providers contributed.
///
/// The records are the primary provider's under both policies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ProvenancePolicy {
    /// Always name both providers, whether or not the secondary answered
    #[default]
    Legacy,
    /// Name only the providers whose fetch succeeded
    Honest,
}

impl fmt::Display for ProvenancePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProvenancePolicy::Legacy => f.write_str("legacy"),
            ProvenancePolicy::Honest => f.write_str("honest"),
        }
    }
}

impl FromStr for ProvenancePolicy {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "legacy" => Ok(ProvenancePolicy::Legacy),
            "honest" => Ok(ProvenancePolicy::Honest),
            other => Err(AppError::config_error(format!(
                "Unknown provenance policy '{other}' (expected 'legacy' or 'honest')"
            ))),
        }
    }
}

/// Records of one combined request plus the providers credited for them.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregationResult {
    pub records: Vec<Record>,
    pub sources: Vec<Provider>,
}

/// Resolves leagues, calls provider clients and serializes their tables.
///
/// Holds only immutable state and is shared between concurrent requests.
#[derive(Debug, Clone)]
pub struct SourceAggregator {
    catalog: LeagueCatalog,
    providers: ProviderSet,
    policy: ProvenancePolicy,
}

impl SourceAggregator {
    pub fn new(catalog: LeagueCatalog, providers: ProviderSet, policy: ProvenancePolicy) -> Self {
        Self {
            catalog,
            providers,
            policy,
        }
    }

    pub fn catalog(&self) -> &LeagueCatalog {
        &self.catalog
    }

    pub fn policy(&self) -> ProvenancePolicy {
        self.policy
    }

    async fn fetch_table(
        &self,
        provider: Provider,
        league: Option<&str>,
        season: Option<&str>,
        dataset: Dataset,
    ) -> Result<Table, AppError> {
        let request = ProviderRequest::new(
            league.map(|slug| self.catalog.resolve(slug).to_string()),
            season.map(str::to_string),
            dataset,
        );
        let client = self.providers.get(provider)?;
        client
            .fetch(&request)
            .await
            .map_err(|e| e.into_provider_fetch(provider.name()))
    }

    /// Fetches one table from one provider and serializes it.
    ///
    /// Any provider failure is returned as [`AppError::ProviderFetch`]; there
    /// is no retry and no fallback.
    #[instrument(skip(self, dataset), fields(dataset = dataset.path()))]
    pub async fn fetch_single(
        &self,
        provider: Provider,
        league: Option<&str>,
        season: Option<&str>,
        dataset: Dataset,
    ) -> Result<Vec<Record>, AppError> {
        let table = self
            .fetch_table(provider, league, season, dataset)
            .await
            .inspect_err(|e| error!("Provider request failed: {e}"))?;
        let records = serialize(&table)?;
        info!("{provider} returned {} records", records.len());
        Ok(records)
    }

    /// Standard FBref player stats, with Understat attempted alongside.
    ///
    /// Only the primary fetch can fail the operation. The secondary result
    /// never changes the records; it only affects `sources` under
    /// [`ProvenancePolicy::Honest`].
    #[instrument(skip(self))]
    pub async fn fetch_combined(
        &self,
        league: &str,
        season: &str,
    ) -> Result<AggregationResult, AppError> {
        let primary = self.fetch_table(
            COMBINED_PRIMARY,
            Some(league),
            Some(season),
            Dataset::PlayerSeasonStats {
                stat_type: Some(DEFAULT_STAT_TYPE.to_string()),
            },
        );
        let secondary = self.fetch_table(
            COMBINED_SECONDARY,
            Some(league),
            Some(season),
            Dataset::PlayerSeasonStats { stat_type: None },
        );
        let (primary, secondary) = tokio::join!(primary, secondary);

        let table = primary.inspect_err(|e| error!("Combined stats primary fetch failed: {e}"))?;
        let secondary_ok = match secondary {
            Ok(_) => true,
            Err(e) => {
                warn!("Combined stats secondary fetch failed, using primary only: {e}");
                false
            }
        };

        let records = serialize(&table)?;
        let sources = match (self.policy, secondary_ok) {
            (ProvenancePolicy::Legacy, _) | (ProvenancePolicy::Honest, true) => {
                vec![COMBINED_PRIMARY, COMBINED_SECONDARY]
            }
            (ProvenancePolicy::Honest, false) => vec![COMBINED_PRIMARY],
        };

        Ok(AggregationResult { records, sources })
    }
}
