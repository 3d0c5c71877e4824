// src/main.rs
use clap::Parser;
use soccerdata_api::aggregator::SourceAggregator;
use soccerdata_api::catalog::LeagueCatalog;
use soccerdata_api::cli::Args;
use soccerdata_api::config::Config;
use soccerdata_api::error::AppError;
use soccerdata_api::logging::setup_logging;
use soccerdata_api::providers::ProviderSet;
use soccerdata_api::server::{self, AppState};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    let args = Args::parse();

    // File, then environment, then flags
    let mut config = Config::load().await?;
    config.apply_args(&args);

    if args.list_config {
        config.display();
        return Ok(());
    }

    config.validate()?;

    let (log_file_path, _guard) = setup_logging(&args, &config).await?;
    info!("Logs are being written to: {log_file_path}");
    info!(
        "Provider gateway: {} (timeout {}s), combined provenance: {}",
        config.provider_base_url, config.http_timeout_seconds, config.combined_provenance
    );

    let aggregator = SourceAggregator::new(
        LeagueCatalog::standard(),
        ProviderSet::http(&config)?,
        config.combined_provenance,
    );
    let router = server::build_router(AppState::new(aggregator), &config.allowed_origins)?;

    server::serve(router, &config.bind_address).await
}
