use crate::types::buckets::{local_hour, speed_bucket, CompassPoint, HourBucket};
use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};

/// A single hourly wind observation, together with the buckets it falls into.
///
/// Wind speed is in knots, direction in degrees the wind blows *from*.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyRecord {
    #[serde(with = "chrono::serde::ts_seconds")]
    pub utc_time: DateTime<Utc>,
    pub local_hour: u32,
    pub hour_bucket: HourBucket,
    pub wind_speed: f64,
    pub speed_bucket: u32,
    pub wind_direction: f64,
    pub compass_point: CompassPoint,
}

impl HourlyRecord {
    /// Builds a record and derives its local hour, hour bucket, speed bucket and compass point.
    pub fn new(
        utc_time: DateTime<Utc>,
        utc_offset_seconds: i32,
        wind_speed: f64,
        wind_direction: f64,
    ) -> Self {
        let local_hour = local_hour(utc_time.hour(), utc_offset_seconds);
        Self {
            utc_time,
            local_hour,
            hour_bucket: HourBucket::from_local_hour(local_hour),
            wind_speed,
            speed_bucket: speed_bucket(wind_speed),
            wind_direction,
            compass_point: CompassPoint::from_degrees(wind_direction),
        }
    }
}
