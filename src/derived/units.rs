//! Unit conversions for aviation-style weather reporting

use super::{MetricResult, check_range, round_even};

const INHG_PER_HPA: f64 = 0.02953;
const MI_PER_KM: f64 = 0.621371;
const KNOTS_PER_KMH: f64 = 0.539957;
const OKTA_PER_PERCENT: f64 = 0.08;

/// Convert pressure from hPa to inHg, rounded to two decimals.
pub fn pressure_hpa_to_inhg(pressure_hpa: f64) -> MetricResult<f64> {
    let pressure = check_range("pressure", pressure_hpa, 0.0, 1100.0)?;
    Ok(round_even(pressure * INHG_PER_HPA * 100.0) / 100.0)
}

/// Convert visibility from kilometres to whole statute miles.
pub fn visibility_km_to_mi(visibility_km: f64) -> MetricResult<u32> {
    let visibility = check_range("visibility", visibility_km, 0.0, 1000.0)?;
    Ok(round_even(visibility * MI_PER_KM) as u32)
}

/// Convert wind speed from km/h to whole knots.
pub fn windspeed_kmh_to_knots(wind_speed_kmh: f64) -> MetricResult<u32> {
    let wind_speed = check_range("wind speed", wind_speed_kmh, 0.0, 500.0)?;
    Ok(round_even(wind_speed * KNOTS_PER_KMH) as u32)
}

/// Convert a cloud cover percentage to oktas (0 clear .. 8 overcast).
pub fn cloud_cover_pct_to_okta(cloud_cover_pct: f64) -> MetricResult<u8> {
    let cloud_cover = check_range("cloud cover", cloud_cover_pct, 0.0, 100.0)?;
    Ok(round_even(cloud_cover * OKTA_PER_PERCENT) as u8)
}

/// Approximate dew point in °C: `Td = T - (100 - RH) / 5`.
pub fn dew_point_c(temperature_c: f64, humidity_pct: f64) -> MetricResult<i32> {
    let temperature = check_range("temperature", temperature_c, -100.0, 100.0)?;
    let humidity = check_range("humidity", humidity_pct, 0.0, 100.0)?;
    Ok(round_even(temperature - (100.0 - humidity) / 5.0) as i32)
}

/// Convert wind direction from degrees to a 16-point cardinal direction
#[must_use]
pub fn wind_direction_to_cardinal(degrees: u16) -> Option<&'static str> {
    let cardinal = match degrees {
        0..=11 | 349..=360 => "N",
        12..=33 => "NNE",
        34..=56 => "NE",
        57..=78 => "ENE",
        79..=101 => "E",
        102..=123 => "ESE",
        124..=146 => "SE",
        147..=168 => "SSE",
        169..=191 => "S",
        192..=213 => "SSW",
        214..=236 => "SW",
        237..=258 => "WSW",
        259..=281 => "W",
        282..=303 => "WNW",
        304..=326 => "NW",
        327..=348 => "NNW",
        _ => return None,
    };
    Some(cardinal)
}
