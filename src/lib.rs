//! Football statistics API library
//!
//! Exposes season tables from several football data providers as uniform JSON
//! records. Provider tables are sanitized value by value, serialized into
//! ordered records and wrapped in a `{data, source(s)}` envelope.
//!
//! # Examples
//!
//! ```rust,no_run
//! use soccerdata_api::aggregator::{ProvenancePolicy, SourceAggregator};
//! use soccerdata_api::catalog::LeagueCatalog;
//! use soccerdata_api::providers::{Dataset, Provider, ProviderSet};
//! use soccerdata_api::{AppError, Config};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), AppError> {
//!     let config = Config::default();
//!     let aggregator = SourceAggregator::new(
//!         LeagueCatalog::standard(),
//!         ProviderSet::http(&config)?,
//!         ProvenancePolicy::default(),
//!     );
//!
//!     let records = aggregator
//!         .fetch_single(Provider::Fotmob, Some("ENG-Premier League"), Some("2324"), Dataset::Schedule)
//!         .await?;
//!     println!("{}", serde_json::to_string_pretty(&records)?);
//!     Ok(())
//! }
//! ```

pub mod aggregator;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod constants;
pub mod envelope;
pub mod error;
pub mod logging;
pub mod providers;
pub mod server;
pub mod table;

// Re-export commonly used types for convenience
pub use aggregator::{AggregationResult, ProvenancePolicy, SourceAggregator};
pub use catalog::{League, LeagueCatalog};
pub use config::Config;
pub use envelope::{Provenance, ResponseEnvelope};
pub use error::AppError;
pub use server::{AppState, build_router};
pub use table::{RawValue, Record, Scalar, Table, sanitize, serialize};

/// Current version of the library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
