//! Airport metadata record

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{number_field, string_field};
use crate::AirportProfileError;

pub(crate) const PROVIDER: &str = "aviationstack";

/// One airport as resolved from an IATA or ICAO code
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AirportRecord {
    pub iata_code: Option<String>,
    pub icao_code: Option<String>,
    pub name: Option<String>,
    pub country: Option<String>,
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
    /// IANA timezone name, e.g. `America/New_York`
    pub timezone_name: Option<String>,
    pub utc_offset_hours: Option<f64>,
}

impl AirportRecord {
    /// Parse one entry of an aviationstack `data` array.
    ///
    /// Coordinates are required since they drive the weather lookup; every
    /// other field is optional.
    pub fn from_aviationstack(entry: &Value) -> crate::Result<Self> {
        let latitude = number_field(entry, "latitude");
        let longitude = number_field(entry, "longitude");
        let (Some(latitude), Some(longitude)) = (latitude, longitude) else {
            return Err(AirportProfileError::upstream(
                PROVIDER,
                "airport record has no usable latitude/longitude",
            ));
        };

        Ok(Self {
            iata_code: string_field(entry, "iata_code"),
            icao_code: string_field(entry, "icao_code"),
            name: string_field(entry, "airport_name"),
            country: string_field(entry, "country_name"),
            latitude,
            longitude,
            timezone_name: string_field(entry, "timezone"),
            utc_offset_hours: number_field(entry, "gmt"),
        })
    }
}
