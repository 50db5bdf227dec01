use crate::LatLon;
use haversine::{distance, Location as HaversineLocation, Units};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Where the archive actually sampled: the grid cell nearest to the requested point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteMetadata {
    /// The coordinate that was asked for.
    pub requested: LatLon,
    /// Latitude of the resolved grid cell.
    pub latitude: f64,
    /// Longitude of the resolved grid cell.
    pub longitude: f64,
    /// IANA timezone name (e.g. "Europe/Zagreb").
    pub timezone: String,
    /// Timezone abbreviation (e.g. "CEST"). Empty when the service reports none.
    pub timezone_abbreviation: String,
    /// Offset of local time from UTC in seconds.
    pub utc_offset_seconds: i32,
    /// Elevation of the grid cell in meters.
    pub elevation: f64,
}

impl SiteMetadata {
    pub fn location(&self) -> LatLon {
        LatLon(self.latitude, self.longitude)
    }

    /// Great-circle distance between the requested point and the resolved grid cell.
    pub fn grid_distance_km(&self) -> f64 {
        distance_km(self.requested, self.location())
    }
}

pub(crate) fn distance_km(a: LatLon, b: LatLon) -> f64 {
    distance(
        HaversineLocation {
            latitude: a.0,
            longitude: a.1,
        },
        HaversineLocation {
            latitude: b.0,
            longitude: b.1,
        },
        Units::Kilometers,
    )
}

/// Renders the map marker text: coordinate, elevation and timezone on three lines.
impl fmt::Display for SiteMetadata {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ns = if self.latitude >= 0.0 { 'N' } else { 'S' };
        let ew = if self.longitude >= 0.0 { 'E' } else { 'W' };
        writeln!(
            f,
            "{:.2}°{}, {:.2}°{}",
            self.latitude.abs(),
            ns,
            self.longitude.abs(),
            ew
        )?;
        writeln!(f, "Elevation: {} m", self.elevation)?;
        write!(f, "Timezone: {}", self.timezone_abbreviation)
    }
}
