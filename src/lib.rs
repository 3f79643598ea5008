//! `airport-profile` - current conditions and aviation metrics for an airport
//!
//! Resolves an IATA or ICAO code to an airport record, fetches the current
//! weather at its coordinates and derives the metrics pilots read off a METAR:
//! okta, knots, statute miles, inches of mercury, dew point and a composite
//! weather-risk rating. Upstream responses are cached with a global TTL.

pub mod api;
pub mod cache;
pub mod config;
pub mod derived;
pub mod error;
pub mod logging;
pub mod models;
pub mod profile;
pub mod providers;
pub mod web;

// Re-export core types for public API
pub use api::AppState;
pub use cache::{CacheStore, FjallStore, ResponseCache};
pub use config::AppConfig;
pub use error::AirportProfileError;
pub use models::{AirportProfile, AirportRecord, WeatherObservation};
pub use profile::ProfileAssembler;
pub use providers::{AirportLookup, WeatherLookup};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, AirportProfileError>;
