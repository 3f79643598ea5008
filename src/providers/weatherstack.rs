//! weatherstack current-weather lookup

use std::collections::BTreeMap;

use async_trait::async_trait;
use tracing::{info, instrument};

use super::{ProviderClient, WeatherLookup};
use crate::models::CurrentConditions;
use crate::models::weather::PROVIDER;
use crate::{AirportProfileError, Result};

/// Current weather against the weatherstack `/current` endpoint
pub struct WeatherstackClient {
    provider: ProviderClient,
    endpoint: String,
    api_key: String,
}

impl WeatherstackClient {
    pub fn new(provider: ProviderClient, base_url: &str, api_key: impl Into<String>) -> Self {
        Self {
            provider,
            endpoint: format!("{}/current", base_url.trim_end_matches('/')),
            api_key: api_key.into(),
        }
    }
}

/// Validate a coordinate pair and render the `query` parameter.
///
/// The caller's text is passed through unchanged so equal inputs always map
/// to the same cache entry.
pub fn coordinate_query(latitude: &str, longitude: &str) -> Result<String> {
    let (latitude, longitude) = (latitude.trim(), longitude.trim());
    if latitude.is_empty() || longitude.is_empty() {
        return Err(AirportProfileError::validation(
            "Latitude and longitude must be provided",
        ));
    }

    parse_degrees("latitude", latitude, 90.0)?;
    parse_degrees("longitude", longitude, 180.0)?;
    Ok(format!("{latitude},{longitude}"))
}

fn parse_degrees(name: &str, text: &str, limit: f64) -> Result<f64> {
    let value = text
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
        .ok_or_else(|| AirportProfileError::validation(format!("Invalid {name}: {text}")))?;
    if !(-limit..=limit).contains(&value) {
        return Err(AirportProfileError::validation(format!(
            "Invalid {name}: {text} (must be between -{limit} and {limit})"
        )));
    }
    Ok(value)
}

#[async_trait]
impl WeatherLookup for WeatherstackClient {
    #[instrument(skip(self))]
    async fn current_weather(&self, latitude: &str, longitude: &str) -> Result<CurrentConditions> {
        let query = coordinate_query(latitude, longitude)?;
        let params = BTreeMap::from([("query", query.clone())]);

        let document = self
            .provider
            .get_document(PROVIDER, &self.endpoint, &self.api_key, &params)
            .await?;

        let conditions = CurrentConditions::from_weatherstack(&document)?;
        info!("weather for {} retrieved successfully", query);
        Ok(conditions)
    }
}
