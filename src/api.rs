//! HTTP routes

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use serde_json::{Value, json};
use tracing::info;

use crate::cache::{FjallStore, ResponseCache};
use crate::config::AppConfig;
use crate::models::AirportProfile;
use crate::profile::ProfileAssembler;
use crate::providers::{self, AviationstackClient, ProviderClient, WeatherstackClient};
use crate::{AirportProfileError, Result};

/// State shared by all request handlers
#[derive(Clone)]
pub struct AppState {
    pub assembler: Arc<ProfileAssembler>,
}

impl AppState {
    pub fn new(assembler: ProfileAssembler) -> Self {
        Self {
            assembler: Arc::new(assembler),
        }
    }

    /// Wire the cache store, the shared HTTP client and both providers.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let store = FjallStore::open(&config.cache.location).map_err(|e| {
            AirportProfileError::config(format!(
                "Failed to open cache at {}: {e:#}",
                config.cache.location
            ))
        })?;
        info!(
            "response cache at {} (ttl {}s)",
            config.cache.location,
            config.cache.ttl_seconds
        );

        let cache = ResponseCache::new(Arc::new(store), config.cache.ttl());
        let http = providers::http_client(config.providers.timeout())?;
        let client = ProviderClient::new(http, cache);

        let airports = AviationstackClient::new(
            client.clone(),
            &config.providers.aviationstack_base_url,
            config.providers.aviationstack_key()?,
        );
        let weather = WeatherstackClient::new(
            client,
            &config.providers.weatherstack_base_url,
            config.providers.weatherstack_key()?,
        );

        Ok(Self::new(ProfileAssembler::new(
            Arc::new(airports),
            Arc::new(weather),
        )))
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/airport/{code}", get(get_airport_profile))
        .fallback(not_found)
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn get_airport_profile(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<AirportProfile>> {
    let profile = state.assembler.assemble(&code).await?;
    Ok(Json(profile))
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "detail": "Not Found" })))
}
