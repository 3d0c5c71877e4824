//! JSON envelope around serialized records, tagged with provenance.

use axum::response::{IntoResponse, Response};
use http::{StatusCode, header};
use serde::ser::{Serialize, SerializeMap, Serializer};
use tracing::error;

use crate::providers::Provider;
use crate::table::Record;

/// Which providers a payload came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Provenance {
    /// Rendered as `"source": "<name>"`
    Single(Provider),
    /// Rendered as `"sources": ["<name>", ...]`
    Multiple(Vec<Provider>),
}

/// `{"data": [...], "source": ..}` or `{"data": [...], "sources": [..]}`
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseEnvelope {
    pub data: Vec<Record>,
    pub provenance: Provenance,
}

impl ResponseEnvelope {
    pub fn wrap(data: Vec<Record>, provenance: Provenance) -> Self {
        Self { data, provenance }
    }

    pub fn single(data: Vec<Record>, provider: Provider) -> Self {
        Self::wrap(data, Provenance::Single(provider))
    }

    pub fn to_json(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }
}

impl Serialize for ResponseEnvelope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(2))?;
        map.serialize_entry("data", &self.data)?;
        match &self.provenance {
            Provenance::Single(provider) => map.serialize_entry("source", provider)?,
            Provenance::Multiple(providers) => map.serialize_entry("sources", providers)?,
        }
        map.end()
    }
}

impl IntoResponse for ResponseEnvelope {
    fn into_response(self) -> Response {
        match self.to_json() {
            Ok(body) => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                body,
            )
                .into_response(),
            Err(e) => {
                error!("Failed to encode response envelope: {e}");
                crate::error::AppError::serialization(e.to_string()).into_response()
            }
        }
    }
}
