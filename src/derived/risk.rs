//! Composite weather-risk index (0 = benign, 10 = severe)
//!
//! Four factors are normalised to a 0-10 scale and blended:
//!
//! | factor        | weight | scale                                   |
//! |---------------|--------|-----------------------------------------|
//! | cloud (okta)  | 20%    | `round(okta / 8 * 10)`                  |
//! | precipitation | 30%    | `min(10, 4 * ln(1 + mm))`               |
//! | wind (km/h)   | 30%    | `<=10 → 0, <=30 → 3, <=50 → 7, else 10` |
//! | visibility    | 20%    | `>=10 → 0, >=6 → 3, >=2 → 6, else 10`   |
//!
//! The cloud sub-score is rounded before weighting; only the weighted sum is
//! rounded again.

use tracing::debug;

use super::{MetricError, MetricResult, round_even};

const CLOUD_WEIGHT: f64 = 0.2;
const PRECIPITATION_WEIGHT: f64 = 0.3;
const WIND_WEIGHT: f64 = 0.3;
const VISIBILITY_WEIGHT: f64 = 0.2;

/// Per-factor sub-scores and their weighted blend.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RiskBreakdown {
    pub cloud: f64,
    pub precipitation: f64,
    pub wind: f64,
    pub visibility: f64,
    /// Weighted sum before the final rounding
    pub composite: f64,
}

impl RiskBreakdown {
    pub fn compute(
        okta: f64,
        precipitation_mm: f64,
        wind_speed_kmh: f64,
        visibility_km: f64,
    ) -> MetricResult<Self> {
        let okta = non_negative("okta", okta)?;
        let precipitation_mm = non_negative("precipitation", precipitation_mm)?;
        let wind_speed_kmh = non_negative("wind speed", wind_speed_kmh)?;
        let visibility_km = non_negative("visibility", visibility_km)?;
        if okta > 8.0 {
            return Err(MetricError::OutOfRange {
                quantity: "okta",
                value: okta,
                min: 0.0,
                max: 8.0,
            });
        }

        let cloud = cloud_score(okta);
        let precipitation = precipitation_score(precipitation_mm);
        let wind = wind_score(wind_speed_kmh);
        let visibility = visibility_score(visibility_km);
        let composite = cloud * CLOUD_WEIGHT
            + precipitation * PRECIPITATION_WEIGHT
            + wind * WIND_WEIGHT
            + visibility * VISIBILITY_WEIGHT;

        Ok(Self {
            cloud,
            precipitation,
            wind,
            visibility,
            composite,
        })
    }

    /// Final index in `[0, 10]`.
    #[must_use]
    pub fn score(&self) -> u8 {
        round_even(self.composite).clamp(0.0, 10.0) as u8
    }
}

/// Weather risk index for one observation.
pub fn weather_risk(
    okta: f64,
    precipitation_mm: f64,
    wind_speed_kmh: f64,
    visibility_km: f64,
) -> MetricResult<u8> {
    let breakdown = RiskBreakdown::compute(okta, precipitation_mm, wind_speed_kmh, visibility_km)?;
    debug!(
        okta,
        precipitation_mm,
        wind_speed_kmh,
        visibility_km,
        ?breakdown,
        "calculated weather risk"
    );
    Ok(breakdown.score())
}

fn non_negative(quantity: &'static str, value: f64) -> MetricResult<f64> {
    if !value.is_finite() {
        return Err(MetricError::NotFinite { quantity });
    }
    if value < 0.0 {
        return Err(MetricError::OutOfRange {
            quantity,
            value,
            min: 0.0,
            max: f64::INFINITY,
        });
    }
    Ok(value)
}

fn cloud_score(okta: f64) -> f64 {
    round_even(okta / 8.0 * 10.0)
}

fn precipitation_score(precipitation_mm: f64) -> f64 {
    (4.0 * precipitation_mm.ln_1p()).min(10.0)
}

fn wind_score(wind_speed_kmh: f64) -> f64 {
    if wind_speed_kmh <= 10.0 {
        0.0
    } else if wind_speed_kmh <= 30.0 {
        3.0
    } else if wind_speed_kmh <= 50.0 {
        7.0
    } else {
        10.0
    }
}

fn visibility_score(visibility_km: f64) -> f64 {
    if visibility_km >= 10.0 {
        0.0
    } else if visibility_km >= 6.0 {
        3.0
    } else if visibility_km >= 2.0 {
        6.0
    } else {
        10.0
    }
}
