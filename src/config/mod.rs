use crate::aggregator::ProvenancePolicy;
use crate::cli::Args;
use crate::constants::{self, env_vars};
use crate::error::AppError;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::fs;
use tokio::io::AsyncWriteExt;

pub mod paths;
pub mod validation;

use paths::{get_config_path, get_log_dir_path};
use validation::validate_config;

/// Configuration structure for the service.
/// Handles loading, saving, and managing application settings.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Socket address the API listens on
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// Base URL of the scraper gateway every provider client talks to.
    #[serde(default = "default_provider_base_url")]
    pub provider_base_url: String,
    /// Origins allowed to call the API from a browser
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
    /// HTTP timeout in seconds for provider requests. Defaults to 30 seconds if not specified.
    #[serde(default = "default_http_timeout")]
    pub http_timeout_seconds: u64,
    /// Path to the log file. If not specified, logs will be written to a default location.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub log_file_path: Option<String>,
    /// Provenance reporting of the combined endpoint
    #[serde(default)]
    pub combined_provenance: ProvenancePolicy,
}

fn default_bind_address() -> String {
    constants::DEFAULT_BIND_ADDRESS.to_string()
}

fn default_provider_base_url() -> String {
    constants::DEFAULT_PROVIDER_BASE_URL.to_string()
}

fn default_allowed_origins() -> Vec<String> {
    constants::DEFAULT_ALLOWED_ORIGINS
        .iter()
        .map(|o| o.to_string())
        .collect()
}

/// Default HTTP timeout in seconds
fn default_http_timeout() -> u64 {
    constants::DEFAULT_HTTP_TIMEOUT_SECONDS
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind_address: default_bind_address(),
            provider_base_url: default_provider_base_url(),
            allowed_origins: default_allowed_origins(),
            http_timeout_seconds: default_http_timeout(),
            log_file_path: None,
            combined_provenance: ProvenancePolicy::default(),
        }
    }
}

impl Config {
    /// Loads configuration from the default config file location.
    /// A missing file means defaults. Environment variables override file values.
    ///
    /// # Environment Variables
    /// - `SOCCERDATA_BIND_ADDRESS` - Override listen address
    /// - `SOCCERDATA_PROVIDER_URL` - Override provider gateway URL
    /// - `SOCCERDATA_HTTP_TIMEOUT` - Override HTTP timeout in seconds (default: 30)
    /// - `SOCCERDATA_LOG_FILE` - Override log file path
    /// - `SOCCERDATA_ALLOWED_ORIGINS` - Comma separated CORS origins
    /// - `SOCCERDATA_PROVENANCE` - `legacy` or `honest`
    ///
    /// Validation is left to the caller so command line flags can still be applied.
    pub async fn load() -> Result<Self, AppError> {
        let config_path = get_config_path();

        let mut config = if Path::new(&config_path).exists() {
            Self::load_from_path(&config_path).await?
        } else {
            Config::default()
        };

        config.apply_env_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// Applies overrides from an environment-like lookup.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> Result<(), AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(bind_address) = lookup(env_vars::BIND_ADDRESS) {
            self.bind_address = bind_address;
        }

        if let Some(url) = lookup(env_vars::PROVIDER_URL) {
            self.provider_base_url = url;
        }

        if let Some(timeout) = lookup(env_vars::HTTP_TIMEOUT).and_then(|s| s.parse::<u64>().ok()) {
            self.http_timeout_seconds = timeout;
        }

        if let Some(log_file_path) = lookup(env_vars::LOG_FILE) {
            self.log_file_path = Some(log_file_path);
        }

        if let Some(origins) = lookup(env_vars::ALLOWED_ORIGINS) {
            self.allowed_origins = origins
                .split(',')
                .map(|o| o.trim().to_string())
                .filter(|o| !o.is_empty())
                .collect();
        }

        if let Some(policy) = lookup(env_vars::PROVENANCE) {
            self.combined_provenance = policy.parse()?;
        }

        Ok(())
    }

    /// Applies command line flags, which take precedence over file and environment.
    pub fn apply_args(&mut self, args: &Args) {
        if let Some(bind) = &args.bind {
            self.bind_address = bind.clone();
        }
        if let Some(url) = &args.provider_url {
            self.provider_base_url = url.clone();
        }
        if let Some(log_file) = &args.log_file {
            self.log_file_path = Some(log_file.clone());
        }
        if let Some(policy) = args.provenance {
            self.combined_provenance = policy;
        }
    }

    /// Validates the configuration settings
    pub fn validate(&self) -> Result<(), AppError> {
        validate_config(self)
    }

    pub fn get_config_path() -> String {
        get_config_path()
    }

    pub fn get_log_dir_path() -> String {
        get_log_dir_path()
    }

    /// Displays current configuration settings to stdout.
    pub fn display(&self) {
        let log_location = match &self.log_file_path {
            Some(custom_path) => custom_path.clone(),
            None => format!(
                "{}/{} (Default location)",
                get_log_dir_path(),
                constants::LOG_FILE_NAME
            ),
        };

        println!("\nCurrent Configuration");
        println!("────────────────────────────────────");
        println!("Config Location:");
        println!("{}", get_config_path());
        println!("────────────────────────────────────");
        println!("Bind Address:");
        println!("{}", self.bind_address);
        println!("────────────────────────────────────");
        println!("Provider Gateway:");
        println!("{}", self.provider_base_url);
        println!("────────────────────────────────────");
        println!("HTTP Timeout:");
        println!("{} seconds", self.http_timeout_seconds);
        println!("────────────────────────────────────");
        println!("Allowed Origins:");
        println!("{}", self.allowed_origins.join(", "));
        println!("────────────────────────────────────");
        println!("Combined Provenance:");
        println!("{}", self.combined_provenance);
        println!("────────────────────────────────────");
        println!("Log File Location:");
        println!("{log_location}");
    }

    /// Saves configuration to a file path, creating the parent directory if needed.
    ///
    /// # Errors
    /// * `AppError::Config` - If the provided path has no parent directory
    /// * `AppError::Io` - If there's an I/O error creating directories or writing the file
    /// * `AppError::TomlSerialize` - If there's an error serializing the configuration
    pub async fn save_to_path(&self, path: &str) -> Result<(), AppError> {
        let config_dir = Path::new(path).parent().ok_or_else(|| {
            AppError::config_error(format!("Path '{path}' has no parent directory"))
        })?;

        if !config_dir.exists() {
            fs::create_dir_all(config_dir).await?;
        }
        let content = toml::to_string_pretty(self)?;
        let mut file = fs::File::create(path).await?;
        file.write_all(content.as_bytes()).await?;
        file.flush().await?;
        Ok(())
    }

    /// Loads configuration from a file path.
    pub async fn load_from_path(path: &str) -> Result<Self, AppError> {
        let content = fs::read_to_string(path).await?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_config_load_partial_file_uses_defaults() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        let config_path_str = config_path.to_string_lossy();

        let config_content = r#"
provider_base_url = "http://gateway.internal:9000"
combined_provenance = "honest"
"#;
        tokio::fs::write(&config_path, config_content)
            .await
            .unwrap();

        let config = Config::load_from_path(&config_path_str).await.unwrap();

        assert_eq!(config.provider_base_url, "http://gateway.internal:9000");
        assert_eq!(config.combined_provenance, ProvenancePolicy::Honest);
        assert_eq!(config.bind_address, "0.0.0.0:8000");
        assert_eq!(
            config.allowed_origins,
            vec!["http://localhost:3000", "http://localhost:3001"]
        );
        assert_eq!(config.http_timeout_seconds, 30);
        assert_eq!(config.log_file_path, None);
    }

    #[tokio::test]
    async fn test_config_load_rejects_unknown_policy() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("config.toml");
        tokio::fs::write(&config_path, "combined_provenance = \"merge\"\n")
            .await
            .unwrap();

        let result = Config::load_from_path(&config_path.to_string_lossy()).await;
        assert!(matches!(result, Err(AppError::TomlDeserialize(_))));
    }

    #[tokio::test]
    async fn test_config_save_and_load_roundtrip() {
        let temp_dir = tempdir().unwrap();
        let config_path = temp_dir.path().join("nested").join("config.toml");
        let config_path_str = config_path.to_string_lossy();
        let original_config = Config {
            bind_address: "127.0.0.1:9001".to_string(),
            log_file_path: Some("/var/log/soccerdata/api.log".to_string()),
            combined_provenance: ProvenancePolicy::Honest,
            ..Config::default()
        };

        original_config.save_to_path(&config_path_str).await.unwrap();
        assert!(config_path.exists());

        let loaded = Config::load_from_path(&config_path_str).await.unwrap();
        assert_eq!(loaded, original_config);
    }

    #[test]
    fn test_env_overrides() {
        let env: HashMap<&str, &str> = HashMap::from([
            (env_vars::BIND_ADDRESS, "127.0.0.1:8080"),
            (env_vars::PROVIDER_URL, "https://gw.example.com"),
            (env_vars::HTTP_TIMEOUT, "5"),
            (env_vars::LOG_FILE, "/tmp/api.log"),
            (
                env_vars::ALLOWED_ORIGINS,
                "https://app.example.com, http://localhost:3000,",
            ),
            (env_vars::PROVENANCE, "honest"),
        ]);
        let mut config = Config::default();
        config
            .apply_env_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();

        assert_eq!(config.bind_address, "127.0.0.1:8080");
        assert_eq!(config.provider_base_url, "https://gw.example.com");
        assert_eq!(config.http_timeout_seconds, 5);
        assert_eq!(config.log_file_path.as_deref(), Some("/tmp/api.log"));
        assert_eq!(
            config.allowed_origins,
            vec!["https://app.example.com", "http://localhost:3000"]
        );
        assert_eq!(config.combined_provenance, ProvenancePolicy::Honest);
    }

    #[test]
    fn test_env_override_ignores_unparseable_timeout() {
        let mut config = Config::default();
        config
            .apply_env_overrides(|key| (key == env_vars::HTTP_TIMEOUT).then(|| "soon".to_string()))
            .unwrap();
        assert_eq!(config.http_timeout_seconds, 30);
    }

    #[test]
    fn test_env_override_rejects_unknown_policy() {
        let mut config = Config::default();
        let result = config
            .apply_env_overrides(|key| (key == env_vars::PROVENANCE).then(|| "both".to_string()));
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn test_args_take_precedence() {
        use clap::Parser;

        let args = Args::parse_from([
            "soccerdata_api",
            "--bind",
            "127.0.0.1:7000",
            "--provider-url",
            "http://other-gw:8100",
            "--provenance",
            "honest",
        ]);
        let mut config = Config {
            bind_address: "0.0.0.0:9999".to_string(),
            ..Config::default()
        };
        config.apply_args(&args);

        assert_eq!(config.bind_address, "127.0.0.1:7000");
        assert_eq!(config.provider_base_url, "http://other-gw:8100");
        assert_eq!(config.combined_provenance, ProvenancePolicy::Honest);
        assert_eq!(config.log_file_path, None);
    }
}
