//! aviationstack airport lookup

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde_json::Value;
use tracing::{info, instrument};

use super::{AirportLookup, ProviderClient};
use crate::models::AirportRecord;
use crate::models::airport::PROVIDER;
use crate::{AirportProfileError, Result};

/// Airport lookup against the aviationstack `/airports` endpoint
pub struct AviationstackClient {
    provider: ProviderClient,
    endpoint: String,
    api_key: String,
}

impl AviationstackClient {
    pub fn new(provider: ProviderClient, base_url: &str, api_key: impl Into<String>) -> Self {
        Self {
            provider,
            endpoint: format!("{}/airports", base_url.trim_end_matches('/')),
            api_key: api_key.into(),
        }
    }
}

/// Normalise an airport code and pick the query field for it: 3 characters is
/// IATA, 4 is ICAO.
pub fn code_query(code: &str) -> Result<(&'static str, String)> {
    let code = code.trim().to_ascii_uppercase();
    if code.is_empty() {
        return Err(AirportProfileError::validation("Airport code must be provided"));
    }
    if !code.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(AirportProfileError::validation(
            "Airport code must be 3 or 4 characters long",
        ));
    }
    match code.len() {
        3 => Ok(("iata_code", code)),
        4 => Ok(("icao_code", code)),
        _ => Err(AirportProfileError::validation(
            "Airport code must be 3 or 4 characters long",
        )),
    }
}

#[async_trait]
impl AirportLookup for AviationstackClient {
    #[instrument(skip(self))]
    async fn lookup_airport(&self, code: &str) -> Result<AirportRecord> {
        let (field, code) = code_query(code)?;
        let params = BTreeMap::from([(field, code.clone())]);

        let document = self
            .provider
            .get_document(PROVIDER, &self.endpoint, &self.api_key, &params)
            .await?;

        let data = document
            .get("data")
            .and_then(Value::as_array)
            .ok_or_else(|| AirportProfileError::upstream(PROVIDER, "response has no data array"))?;

        match data.as_slice() {
            [entry] => {
                let record = AirportRecord::from_aviationstack(entry)?;
                info!("airport info for {} retrieved successfully", code);
                Ok(record)
            }
            [] => Err(AirportProfileError::AirportNotFound { code }),
            matches => Err(AirportProfileError::AmbiguousAirport {
                code,
                matches: matches.len(),
            }),
        }
    }
}
