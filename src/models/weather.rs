//! Current weather observation model

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{first_string, number_field, string_field};
use crate::AirportProfileError;

pub(crate) const PROVIDER: &str = "weatherstack";

/// Raw current-weather snapshot for one coordinate pair.
///
/// Every field is optional: a field the provider omits or sends in an
/// unusable form is `None` and only affects the metrics derived from it.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct WeatherObservation {
    /// Provider-local observation time, e.g. `03:40 PM`
    pub observation_time: Option<String>,
    pub temperature_c: Option<f64>,
    pub humidity_pct: Option<f64>,
    pub precipitation_mm: Option<f64>,
    pub wind_speed_kmh: Option<f64>,
    /// Wind direction in degrees (0-360, where 0/360 is North)
    pub wind_degree: Option<f64>,
    /// Compass label, e.g. `SSW`
    pub wind_direction: Option<String>,
    pub pressure_hpa: Option<f64>,
    pub cloud_cover_pct: Option<f64>,
    pub visibility_km: Option<f64>,
    pub description: Option<String>,
    pub icon_url: Option<String>,
}

impl WeatherObservation {
    /// Parse the `current` object of a weatherstack response.
    #[must_use]
    pub fn from_weatherstack(current: &Value) -> Self {
        Self {
            observation_time: string_field(current, "observation_time"),
            temperature_c: number_field(current, "temperature"),
            humidity_pct: number_field(current, "humidity"),
            precipitation_mm: number_field(current, "precip"),
            wind_speed_kmh: number_field(current, "wind_speed"),
            wind_degree: number_field(current, "wind_degree"),
            wind_direction: string_field(current, "wind_dir"),
            pressure_hpa: number_field(current, "pressure"),
            cloud_cover_pct: number_field(current, "cloudcover"),
            visibility_km: number_field(current, "visibility"),
            description: first_string(current, "weather_descriptions"),
            icon_url: first_string(current, "weather_icons"),
        }
    }
}

/// Where the weather provider placed the observation
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct ObservedLocation {
    pub name: Option<String>,
    pub country: Option<String>,
    pub region: Option<String>,
    pub timezone_id: Option<String>,
    pub utc_offset_hours: Option<f64>,
}

/// Weather lookup result: the observation plus location metadata
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct CurrentConditions {
    pub observation: WeatherObservation,
    pub location: Option<ObservedLocation>,
}

impl CurrentConditions {
    /// Parse a full weatherstack `/current` response document.
    pub fn from_weatherstack(document: &Value) -> crate::Result<Self> {
        let current = document
            .get("current")
            .filter(|current| current.is_object())
            .ok_or_else(|| {
                AirportProfileError::upstream(PROVIDER, "response has no current observation")
            })?;

        let location = document
            .get("location")
            .filter(|location| location.is_object())
            .map(|location| ObservedLocation {
                name: string_field(location, "name"),
                country: string_field(location, "country"),
                region: string_field(location, "region"),
                timezone_id: string_field(location, "timezone_id"),
                utc_offset_hours: number_field(location, "utc_offset"),
            });

        Ok(Self {
            observation: WeatherObservation::from_weatherstack(current),
            location,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn response() -> Value {
        json!({
            "request": {"type": "LatLon", "query": "Lat 40.64 and Lon -73.79", "language": "en", "unit": "m"},
            "location": {
                "name": "Valley Stream",
                "country": "United States of America",
                "region": "New York",
                "lat": "40.664",
                "lon": "-73.709",
                "timezone_id": "America/New_York",
                "localtime": "2025-07-23 11:40",
                "utc_offset": "-4.0"
            },
            "current": {
                "observation_time": "03:40 PM",
                "temperature": 27,
                "weather_code": 116,
                "weather_icons": ["https://cdn.worldweatheronline.com/images/wsymbols01_png_64/wsymbol_0002_sunny_intervals.png"],
                "weather_descriptions": ["Partly cloudy"],
                "wind_speed": 12,
                "wind_degree": 170,
                "wind_dir": "S",
                "pressure": 1025,
                "precip": 0,
                "humidity": 56,
                "cloudcover": 75,
                "feelslike": 28,
                "uv_index": 7,
                "visibility": 16,
                "is_day": "yes"
            }
        })
    }

    #[test]
    fn test_parse_weatherstack_response() {
        let conditions = CurrentConditions::from_weatherstack(&response()).unwrap();
        let observation = &conditions.observation;
        assert_eq!(observation.observation_time.as_deref(), Some("03:40 PM"));
        assert_eq!(observation.temperature_c, Some(27.0));
        assert_eq!(observation.humidity_pct, Some(56.0));
        assert_eq!(observation.precipitation_mm, Some(0.0));
        assert_eq!(observation.wind_speed_kmh, Some(12.0));
        assert_eq!(observation.wind_degree, Some(170.0));
        assert_eq!(observation.wind_direction.as_deref(), Some("S"));
        assert_eq!(observation.pressure_hpa, Some(1025.0));
        assert_eq!(observation.cloud_cover_pct, Some(75.0));
        assert_eq!(observation.visibility_km, Some(16.0));
        assert_eq!(observation.description.as_deref(), Some("Partly cloudy"));
        assert!(observation.icon_url.as_deref().unwrap().ends_with("sunny_intervals.png"));

        let location = conditions.location.unwrap();
        assert_eq!(location.name.as_deref(), Some("Valley Stream"));
        assert_eq!(location.utc_offset_hours, Some(-4.0));
    }

    #[test]
    fn test_malformed_field_only_drops_that_field() {
        let mut document = response();
        document["current"]["humidity"] = json!("very");
        document["current"]
            .as_object_mut()
            .unwrap()
            .remove("visibility");

        let observation = CurrentConditions::from_weatherstack(&document)
            .unwrap()
            .observation;
        assert_eq!(observation.humidity_pct, None);
        assert_eq!(observation.visibility_km, None);
        assert_eq!(observation.temperature_c, Some(27.0));
    }

    #[test]
    fn test_missing_current_is_upstream_error() {
        let err = CurrentConditions::from_weatherstack(&json!({"location": {}})).unwrap_err();
        assert!(matches!(err, AirportProfileError::Upstream { .. }));
    }
}
