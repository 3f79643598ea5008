//! Assembled airport profile returned to clients

use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

/// Airport metadata plus the current UTC and local clock
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AirportSection {
    pub iata_code: Option<String>,
    pub icao_code: Option<String>,
    pub name: Option<String>,
    /// Nearest named place reported by the weather provider
    pub city: Option<String>,
    pub country: Option<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub timezone: Option<String>,
    pub utc_offset_hours: Option<f64>,
    pub current_time_utc: DateTime<Utc>,
    pub current_time_local: Option<DateTime<FixedOffset>>,
}

/// Raw and derived weather metrics; any field may be `null`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct WeatherSection {
    pub observation_time: Option<String>,
    pub description: Option<String>,
    pub icon_url: Option<String>,
    pub temperature_c: Option<f64>,
    pub dew_point_c: Option<i32>,
    pub humidity_pct: Option<f64>,
    pub wind_direction: Option<String>,
    pub wind_degree: Option<f64>,
    pub wind_speed_kmh: Option<f64>,
    pub wind_speed_kts: Option<u32>,
    pub precipitation_mm: Option<f64>,
    pub visibility_km: Option<f64>,
    pub visibility_mi: Option<u32>,
    pub cloud_cover_pct: Option<f64>,
    pub cloud_cover_okta: Option<u8>,
    pub pressure_hpa: Option<f64>,
    pub pressure_inhg: Option<f64>,
    /// Composite weather risk, 0 (benign) to 10 (severe)
    pub weather_rating: Option<u8>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AirportProfile {
    pub airport: AirportSection,
    pub weather: WeatherSection,
}
