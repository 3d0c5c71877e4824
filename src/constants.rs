//! Application-wide constants and configuration values
//!
//! This module centralizes default values and names shared between the
//! configuration layer, the provider clients and the HTTP surface.

/// Default timeout for provider gateway requests in seconds
pub const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 30;

/// Maximum number of idle connections per host in the HTTP client pool
pub const HTTP_POOL_MAX_IDLE_PER_HOST: usize = 32;

/// Default socket address the API listens on
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0:8000";

/// Default base URL of the upstream scraper gateway
pub const DEFAULT_PROVIDER_BASE_URL: &str = "http://localhost:8100";

/// Origins allowed by CORS unless configured otherwise
pub const DEFAULT_ALLOWED_ORIGINS: [&str; 2] = ["http://localhost:3000", "http://localhost:3001"];

/// Default stat type for FBref season statistics
pub const DEFAULT_STAT_TYPE: &str = "standard";

/// Date pattern every date-typed column is rendered with
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Name given to an unnamed single-level row index
pub const DEFAULT_INDEX_NAME: &str = "index";

/// Log file name used when no explicit path is configured
pub const LOG_FILE_NAME: &str = "soccerdata_api.log";

/// Directory name under the platform config directory
pub const APP_DIR_NAME: &str = "soccerdata_api";

/// Environment variable names
pub mod env_vars {
    /// Socket address override
    pub const BIND_ADDRESS: &str = "SOCCERDATA_BIND_ADDRESS";

    /// Provider gateway base URL override
    pub const PROVIDER_URL: &str = "SOCCERDATA_PROVIDER_URL";

    /// Provider gateway timeout in seconds
    pub const HTTP_TIMEOUT: &str = "SOCCERDATA_HTTP_TIMEOUT";

    /// Log file path override
    pub const LOG_FILE: &str = "SOCCERDATA_LOG_FILE";

    /// Comma separated list of CORS origins
    pub const ALLOWED_ORIGINS: &str = "SOCCERDATA_ALLOWED_ORIGINS";

    /// Provenance policy of the combined endpoint (`legacy` or `honest`)
    pub const PROVENANCE: &str = "SOCCERDATA_PROVENANCE";
}

/// Stat types FBref understands for season statistics
pub const FBREF_STAT_TYPES: [&str; 11] = [
    "standard",
    "shooting",
    "passing",
    "passing_types",
    "goal_shot_creation",
    "defense",
    "possession",
    "playing_time",
    "misc",
    "keeper",
    "keeper_adv",
];
