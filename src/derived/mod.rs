//! Derived weather metrics
//!
//! Pure, I/O-free conversions and scoring applied to a raw weather
//! observation:
//! - Unit conversions (pressure, visibility, wind speed, cloud cover, dew point)
//! - Local time derivation from a UTC offset
//! - Composite weather-risk scoring
//!
//! Every function validates its inputs and reports a [`MetricError`] instead of
//! panicking, so the caller can drop a single bad field and keep the rest.

pub mod risk;
pub mod time;
pub mod units;

use thiserror::Error;

pub use risk::{RiskBreakdown, weather_risk};
pub use time::{LocalTime, local_time, local_time_at};
pub use units::{
    cloud_cover_pct_to_okta, dew_point_c, pressure_hpa_to_inhg, visibility_km_to_mi,
    wind_direction_to_cardinal, windspeed_kmh_to_knots,
};

/// Why a metric could not be derived
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MetricError {
    #[error("{quantity} is not a finite number")]
    NotFinite { quantity: &'static str },

    #[error("{quantity} {value} is outside the valid range [{min}, {max}]")]
    OutOfRange {
        quantity: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}

pub type MetricResult<T> = std::result::Result<T, MetricError>;

/// Check that `value` is finite and lies in `[min, max]`.
pub(crate) fn check_range(quantity: &'static str, value: f64, min: f64, max: f64) -> MetricResult<f64> {
    if !value.is_finite() {
        return Err(MetricError::NotFinite { quantity });
    }
    if value < min || value > max {
        return Err(MetricError::OutOfRange {
            quantity,
            value,
            min,
            max,
        });
    }
    Ok(value)
}

/// Round half to even, the rounding the published formulas are defined with.
pub(crate) fn round_even(value: f64) -> f64 {
    value.round_ties_even()
}
