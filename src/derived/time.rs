//! Current UTC and airport-local time

use chrono::{DateTime, FixedOffset, Utc};

use super::{MetricError, MetricResult, check_range};

const MIN_OFFSET_HOURS: f64 = -12.0;
const MAX_OFFSET_HOURS: f64 = 14.0;

/// UTC instant and its airport-local rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalTime {
    pub utc: DateTime<Utc>,
    /// `None` when the UTC offset was unusable.
    pub local: Option<DateTime<FixedOffset>>,
}

/// Derive the current UTC and local time for a whole-hour UTC offset.
pub fn local_time(utc_offset_hours: Option<f64>) -> LocalTime {
    local_time_at(Utc::now(), utc_offset_hours)
}

/// Derive UTC and local time for `now`.
///
/// A missing offset means the airport runs on UTC. An offset outside
/// `[-12, 14]` or with a fractional part keeps the UTC time but yields no
/// local time.
pub fn local_time_at(now: DateTime<Utc>, utc_offset_hours: Option<f64>) -> LocalTime {
    let local = match utc_offset_hours {
        None => Some(now.fixed_offset()),
        Some(hours) => match fixed_offset(hours) {
            Ok(offset) => Some(now.with_timezone(&offset)),
            Err(err) => {
                tracing::warn!(%err, "cannot derive local time");
                None
            }
        },
    };
    LocalTime { utc: now, local }
}

fn fixed_offset(hours: f64) -> MetricResult<FixedOffset> {
    let hours = check_range("UTC offset", hours, MIN_OFFSET_HOURS, MAX_OFFSET_HOURS)?;
    if hours.fract() != 0.0 {
        return Err(MetricError::OutOfRange {
            quantity: "UTC offset (whole hours)",
            value: hours,
            min: MIN_OFFSET_HOURS,
            max: MAX_OFFSET_HOURS,
        });
    }
    FixedOffset::east_opt(hours as i32 * 3600).ok_or(MetricError::OutOfRange {
        quantity: "UTC offset",
        value: hours,
        min: MIN_OFFSET_HOURS,
        max: MAX_OFFSET_HOURS,
    })
}
