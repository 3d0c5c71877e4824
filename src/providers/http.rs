//! Provider client backed by the scraper gateway's HTTP API.

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, error, info, instrument};

use super::urls::build_request_url;
use super::wire::WireTable;
use super::{Provider, ProviderClient, ProviderRequest};
use crate::error::AppError;
use crate::table::Table;

/// Error body the gateway sends alongside non-2xx statuses
#[derive(Debug, Deserialize)]
struct GatewayError {
    #[serde(alias = "error")]
    detail: String,
}

#[derive(Debug, Clone)]
pub struct HttpProviderClient {
    provider: Provider,
    client: Client,
    base_url: String,
}

impl HttpProviderClient {
    pub fn new(provider: Provider, client: Client, base_url: impl Into<String>) -> Self {
        Self {
            provider,
            client,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl ProviderClient for HttpProviderClient {
    fn provider(&self) -> Provider {
        self.provider
    }

    async fn fetch(&self, request: &ProviderRequest) -> Result<Table, AppError> {
        let url = build_request_url(&self.base_url, self.provider, request)?;
        let wire = fetch_wire_table(&self.client, url.as_str())
            .await
            .map_err(|e| e.into_provider_fetch(self.provider.name()))?;
        wire.into_table(url.as_str())
            .map_err(|e| e.into_provider_fetch(self.provider.name()))
    }
}

/// Fetches one wire table, mapping transport failures and status codes to
/// typed errors. No retries and no caching happen here.
#[instrument(skip(client))]
pub(super) async fn fetch_wire_table(client: &Client, url: &str) -> Result<WireTable, AppError> {
    info!("Fetching table from URL: {url}");

    let response = match client.get(url).send().await {
        Ok(resp) => resp,
        Err(e) => {
            error!("Request failed for URL {}: {}", url, e);
            return if e.is_timeout() {
                Err(AppError::network_timeout(url))
            } else if e.is_connect() {
                Err(AppError::network_connection(url, e.to_string()))
            } else {
                Err(AppError::ApiFetch(e))
            };
        }
    };

    let status = response.status();
    debug!("Response status: {status}");

    if !status.is_success() {
        let status_code = status.as_u16();
        let body = response.text().await.unwrap_or_default();
        let reason = serde_json::from_str::<GatewayError>(&body)
            .map(|e| e.detail)
            .unwrap_or_else(|_| status.canonical_reason().unwrap_or("Unknown error").to_string());

        error!("HTTP {} - {} (URL: {})", status_code, reason, url);

        return Err(match status_code {
            404 => AppError::api_not_found(url),
            429 => AppError::api_rate_limit(reason, url),
            400..=499 => AppError::api_client_error(status_code, reason, url),
            502 | 503 => AppError::api_service_unavailable(status_code, reason, url),
            _ => AppError::api_server_error(status_code, reason, url),
        });
    }

    let response_text = match response.text().await {
        Ok(text) => text,
        Err(e) => {
            error!("Failed to read response text from URL {}: {}", url, e);
            return Err(AppError::ApiFetch(e));
        }
    };

    debug!("Response length: {} bytes", response_text.len());

    match serde_json::from_str::<WireTable>(&response_text) {
        Ok(parsed) => Ok(parsed),
        Err(e) => {
            error!("Failed to parse gateway response: {} (URL: {})", e, url);
            if response_text.trim().is_empty() {
                Err(AppError::api_no_data("Response body is empty", url))
            } else if !response_text.trim_start().starts_with('{') {
                Err(AppError::api_malformed_json("Response is not a JSON object", url))
            } else {
                Err(AppError::api_unexpected_structure(e.to_string(), url))
            }
        }
    }
}
