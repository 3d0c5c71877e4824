//! URL building for the provider gateway

use reqwest::Url;

use super::{Provider, ProviderRequest};
use crate::error::AppError;

/// Builds the gateway URL for one table request.
///
/// The path is `{base}/{provider}/{dataset}`; league, season and dataset
/// parameters go into the percent-encoded query string.
///
/// # Example
/// ```
/// use soccerdata_api::providers::{Dataset, Provider, ProviderRequest};
/// use soccerdata_api::providers::urls::build_request_url;
///
/// let request = ProviderRequest::new(
///     Some("ESP-La Liga".to_string()),
///     Some("2324".to_string()),
///     Dataset::Schedule,
/// );
/// let url = build_request_url("http://localhost:8100", Provider::Fotmob, &request).unwrap();
/// assert_eq!(
///     url.as_str(),
///     "http://localhost:8100/fotmob/schedule?league=ESP-La+Liga&season=2324"
/// );
/// ```
pub fn build_request_url(
    base_url: &str,
    provider: Provider,
    request: &ProviderRequest,
) -> Result<Url, AppError> {
    let raw = format!(
        "{}/{}/{}",
        base_url.trim_end_matches('/'),
        provider.name(),
        request.dataset.path()
    );

    let mut params: Vec<(&str, &str)> = Vec::new();
    if let Some(league) = &request.league {
        params.push(("league", league.as_str()));
    }
    if let Some(season) = &request.season {
        params.push(("season", season.as_str()));
    }
    params.extend(request.dataset.params());

    let url = if params.is_empty() {
        Url::parse(&raw)
    } else {
        Url::parse_with_params(&raw, &params)
    };
    url.map_err(|e| AppError::config_error(format!("Invalid provider URL '{raw}': {e}")))
}
