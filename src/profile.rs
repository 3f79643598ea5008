//! Airport profile assembly
//!
//! Resolves an airport, fetches the weather at its coordinates and derives the
//! aviation metrics. Lookup failures abort the request; a metric that cannot be
//! derived is `null` in the profile while everything else is still returned.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{debug, info, instrument, warn};

use crate::Result;
use crate::derived::{
    self, MetricResult, cloud_cover_pct_to_okta, dew_point_c, pressure_hpa_to_inhg,
    visibility_km_to_mi, weather_risk, wind_direction_to_cardinal, windspeed_kmh_to_knots,
};
use crate::models::{
    AirportProfile, AirportRecord, AirportSection, CurrentConditions, WeatherObservation,
    WeatherSection,
};
use crate::providers::{AirportLookup, WeatherLookup};

/// Builds [`AirportProfile`]s from the two lookup collaborators
pub struct ProfileAssembler {
    airports: Arc<dyn AirportLookup>,
    weather: Arc<dyn WeatherLookup>,
}

impl ProfileAssembler {
    pub fn new(airports: Arc<dyn AirportLookup>, weather: Arc<dyn WeatherLookup>) -> Self {
        Self { airports, weather }
    }

    /// Assemble the profile for an IATA or ICAO code.
    #[instrument(skip(self))]
    pub async fn assemble(&self, code: &str) -> Result<AirportProfile> {
        let record = self.airports.lookup_airport(code).await?;
        let conditions = self
            .weather
            .current_weather(&record.latitude.to_string(), &record.longitude.to_string())
            .await?;

        let profile = build_profile(record, conditions, Utc::now());
        info!(
            weather_rating = ?profile.weather.weather_rating,
            "assembled profile for {}",
            code.trim().to_ascii_uppercase()
        );
        Ok(profile)
    }
}

/// Combine an airport record and its current conditions at instant `now`.
#[must_use]
pub fn build_profile(
    record: AirportRecord,
    conditions: CurrentConditions,
    now: DateTime<Utc>,
) -> AirportProfile {
    let clock = derived::local_time_at(now, record.utc_offset_hours);
    let city = conditions.location.and_then(|location| location.name);

    AirportProfile {
        airport: AirportSection {
            iata_code: record.iata_code,
            icao_code: record.icao_code,
            name: record.name,
            city,
            country: record.country,
            latitude: record.latitude,
            longitude: record.longitude,
            timezone: record.timezone_name,
            utc_offset_hours: record.utc_offset_hours,
            current_time_utc: clock.utc,
            current_time_local: clock.local,
        },
        weather: weather_section(conditions.observation),
    }
}

fn weather_section(observation: WeatherObservation) -> WeatherSection {
    let WeatherObservation {
        observation_time,
        temperature_c,
        humidity_pct,
        precipitation_mm,
        wind_speed_kmh,
        wind_degree,
        wind_direction,
        pressure_hpa,
        cloud_cover_pct,
        visibility_km,
        description,
        icon_url,
    } = observation;

    let dew_point = match (temperature_c, humidity_pct) {
        (Some(temperature), Some(humidity)) => {
            derive("dew_point_c", dew_point_c(temperature, humidity))
        }
        _ => None,
    };
    let cloud_cover_okta = cloud_cover_pct
        .and_then(|cover| derive("cloud_cover_okta", cloud_cover_pct_to_okta(cover)));

    let weather_rating = match (cloud_cover_okta, precipitation_mm, wind_speed_kmh, visibility_km) {
        (Some(okta), Some(precipitation), Some(wind), Some(visibility)) => derive(
            "weather_rating",
            weather_risk(f64::from(okta), precipitation, wind, visibility),
        ),
        _ => {
            debug!("weather rating skipped, an input is missing");
            None
        }
    };

    WeatherSection {
        observation_time,
        description,
        icon_url,
        temperature_c,
        dew_point_c: dew_point,
        humidity_pct,
        wind_direction: wind_direction.or_else(|| wind_degree.and_then(cardinal)),
        wind_degree,
        wind_speed_kmh,
        wind_speed_kts: wind_speed_kmh
            .and_then(|speed| derive("wind_speed_kts", windspeed_kmh_to_knots(speed))),
        precipitation_mm,
        visibility_km,
        visibility_mi: visibility_km
            .and_then(|visibility| derive("visibility_mi", visibility_km_to_mi(visibility))),
        cloud_cover_pct,
        cloud_cover_okta,
        pressure_hpa,
        pressure_inhg: pressure_hpa
            .and_then(|pressure| derive("pressure_inhg", pressure_hpa_to_inhg(pressure))),
        weather_rating,
    }
}

fn derive<T>(field: &'static str, result: MetricResult<T>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(err) => {
            warn!(field, %err, "metric unavailable");
            None
        }
    }
}

fn cardinal(degrees: f64) -> Option<String> {
    if !(0.0..=360.0).contains(&degrees) {
        return None;
    }
    wind_direction_to_cardinal(degrees.round() as u16).map(str::to_string)
}
