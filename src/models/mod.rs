//! Data models for the airport profile service
//!
//! This module contains the core domain models organized by concern:
//! - Airport: the metadata record resolved from an IATA/ICAO code
//! - Weather: the current observation at the airport's coordinates
//! - Profile: the assembled response document

pub mod airport;
pub mod profile;
pub mod weather;

// Re-export all public types for convenient access
pub use airport::AirportRecord;
pub use profile::{AirportProfile, AirportSection, WeatherSection};
pub use weather::{CurrentConditions, ObservedLocation, WeatherObservation};

use serde_json::Value;

/// Read a numeric field that providers send either as a JSON number or as a
/// numeric string ("40.642334", "-5").
pub(crate) fn number_field(object: &Value, field: &str) -> Option<f64> {
    let value = match object.get(field)? {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => text.trim().parse::<f64>().ok(),
        _ => None,
    };
    value.filter(|value| value.is_finite())
}

/// Read a non-empty string field.
pub(crate) fn string_field(object: &Value, field: &str) -> Option<String> {
    object
        .get(field)?
        .as_str()
        .map(str::trim)
        .filter(|text| !text.is_empty())
        .map(str::to_string)
}

/// First non-empty string of an array field (`weather_descriptions`, `weather_icons`).
pub(crate) fn first_string(object: &Value, field: &str) -> Option<String> {
    object
        .get(field)?
        .as_array()?
        .iter()
        .filter_map(Value::as_str)
        .map(str::trim)
        .find(|text| !text.is_empty())
        .map(str::to_string)
}
