//! Upstream data providers
//!
//! - aviationstack: airport metadata by IATA/ICAO code
//! - weatherstack: current weather by coordinate pair
//!
//! Both sit behind the cache-aside layer and share one HTTP client.

pub mod aviationstack;
pub mod weatherstack;

use std::collections::BTreeMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info, instrument, warn};

use crate::cache::{self, ResponseCache};
use crate::models::{AirportRecord, CurrentConditions};
use crate::{AirportProfileError, Result};

pub use aviationstack::AviationstackClient;
pub use weatherstack::WeatherstackClient;

/// Resolves an airport code to exactly one record.
#[async_trait]
pub trait AirportLookup: Send + Sync {
    async fn lookup_airport(&self, code: &str) -> Result<AirportRecord>;
}

/// Resolves current weather at a coordinate pair.
#[async_trait]
pub trait WeatherLookup: Send + Sync {
    async fn current_weather(&self, latitude: &str, longitude: &str) -> Result<CurrentConditions>;
}

/// Build the HTTP client shared by all providers.
pub fn http_client(timeout: Duration) -> Result<Client> {
    Client::builder()
        .timeout(timeout)
        .user_agent(concat!("airport-profile/", env!("CARGO_PKG_VERSION")))
        .build()
        .map_err(|e| AirportProfileError::config(format!("Failed to create HTTP client: {e}")))
}

/// HTTP client plus response cache, shared by the provider clients
#[derive(Clone)]
pub struct ProviderClient {
    http: Client,
    cache: ResponseCache,
}

impl ProviderClient {
    pub fn new(http: Client, cache: ResponseCache) -> Self {
        Self { http, cache }
    }

    /// GET `endpoint` with `params`, served from cache when possible.
    ///
    /// The cache key covers the endpoint and the query parameters but not the
    /// access key. Provider error documents are never cached.
    #[instrument(skip(self, api_key, params))]
    pub async fn get_document(
        &self,
        provider: &'static str,
        endpoint: &str,
        api_key: &str,
        params: &BTreeMap<&'static str, String>,
    ) -> Result<Value> {
        let cache_key = cache::fingerprint(endpoint, Some(params));

        if let Some(key) = cache_key.as_deref() {
            if let Some(document) = self.cache.lookup::<Value>(key).await {
                debug!("Using cached {provider} response");
                return Ok(document);
            }
        }

        info!("Making {provider} API request");
        let start_time = Instant::now();
        let document = self
            .fetch(provider, &request_url(endpoint, api_key, params))
            .await?;
        info!(
            "{provider} responded in {:.3}s",
            start_time.elapsed().as_secs_f64()
        );

        if let Some(key) = cache_key.as_deref() {
            self.cache.store(key, &document, self.cache.ttl()).await;
        }
        Ok(document)
    }

    async fn fetch(&self, provider: &'static str, url: &str) -> Result<Value> {
        let response = self.http.get(url).send().await.map_err(|e| {
            // The URL carries the access key
            let e = e.without_url();
            warn!("{provider} request failed: {}", e);
            AirportProfileError::upstream(provider, format!("request failed: {e}"))
        })?;

        let status = response.status();
        if !status.is_success() {
            warn!("{provider} returned HTTP {}", status);
            return Err(AirportProfileError::upstream(
                provider,
                format!(
                    "API request failed with status: {} - {}",
                    status.as_u16(),
                    status.canonical_reason().unwrap_or("Unknown error")
                ),
            ));
        }

        let document: Value = response.json().await.map_err(|e| {
            AirportProfileError::upstream(
                provider,
                format!("invalid response body: {}", e.without_url()),
            )
        })?;

        if let Some(message) = provider_error(&document) {
            warn!("{provider} reported an error: {}", message);
            return Err(AirportProfileError::upstream(provider, message));
        }
        Ok(document)
    }
}

/// Full request URL. Parameters are emitted in key order.
fn request_url(endpoint: &str, api_key: &str, params: &BTreeMap<&'static str, String>) -> String {
    let mut url = format!("{endpoint}?access_key={}", urlencoding::encode(api_key));
    for (name, value) in params {
        url.push('&');
        url.push_str(name);
        url.push('=');
        url.push_str(&urlencoding::encode(value));
    }
    url
}

/// Both providers answer some failures with HTTP 200 and an `error` object.
fn provider_error(document: &Value) -> Option<String> {
    let failed = document.get("success").and_then(Value::as_bool) == Some(false);
    let error = document.get("error").filter(|e| !e.is_null());
    if !failed && error.is_none() {
        return None;
    }

    let Some(error) = error else {
        return Some("request was not successful".to_string());
    };
    let message = error
        .get("info")
        .or_else(|| error.get("message"))
        .and_then(Value::as_str)
        .unwrap_or("unknown error");
    let code = match error.get("code").or_else(|| error.get("type")) {
        Some(Value::String(code)) => code.clone(),
        Some(Value::Number(code)) => code.to_string(),
        _ => return Some(message.to_string()),
    };
    Some(format!("{message} ({code})"))
}
