//! Bucketing rules that turn a raw hourly observation into the categorical
//! columns of a windrose: time of day, speed band and compass sector.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Width of a speed band in knots.
pub const SPEED_BAND_KNOTS: f64 = 5.0;

/// Width of a compass sector in degrees.
pub const SECTOR_DEGREES: f64 = 22.5;

/// Number of compass sectors.
pub const SECTOR_COUNT: u8 = 16;

/// Local hour of day (0-23) for a UTC hour at a site with the given UTC offset.
///
/// The offset is floored to whole hours, so sites on half-hour offsets land in the
/// earlier hour (-3:30 becomes -4).
pub fn local_hour(utc_hour: u32, utc_offset_seconds: i32) -> u32 {
    let offset_hours = utc_offset_seconds.div_euclid(3600);
    (utc_hour as i32 + offset_hours).rem_euclid(24) as u32
}

/// Upper bound of the 5-knot band containing `speed`; `[b - 5, b)` maps to `b`.
pub fn speed_bucket(speed: f64) -> u32 {
    ((speed / SPEED_BAND_KNOTS).floor() * SPEED_BAND_KNOTS + SPEED_BAND_KNOTS) as u32
}

/// One of the four 6-hour blocks of a local day.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum HourBucket {
    /// Midnight to 6AM.
    Night,
    /// 6AM to noon.
    Morning,
    /// Noon to 6PM.
    Afternoon,
    /// 6PM to midnight.
    Evening,
}

impl HourBucket {
    /// All buckets, ordered by start hour.
    pub const ALL: [HourBucket; 4] = [
        HourBucket::Night,
        HourBucket::Morning,
        HourBucket::Afternoon,
        HourBucket::Evening,
    ];

    /// Order in which the charts are laid out.
    pub const DISPLAY_ORDER: [HourBucket; 4] = [
        HourBucket::Morning,
        HourBucket::Afternoon,
        HourBucket::Evening,
        HourBucket::Night,
    ];

    /// Bucket for a local hour, i.e. `hour / 6 * 6`. Hours past 23 wrap.
    pub fn from_local_hour(hour: u32) -> Self {
        match (hour % 24) / 6 {
            0 => HourBucket::Night,
            1 => HourBucket::Morning,
            2 => HourBucket::Afternoon,
            _ => HourBucket::Evening,
        }
    }

    /// First local hour of the block: 0, 6, 12 or 18.
    pub fn start_hour(self) -> u32 {
        match self {
            HourBucket::Night => 0,
            HourBucket::Morning => 6,
            HourBucket::Afternoon => 12,
            HourBucket::Evening => 18,
        }
    }

    pub fn contains(self, local_hour: u32) -> bool {
        (self.start_hour()..self.start_hour() + 6).contains(&local_hour)
    }

    pub fn title(self) -> &'static str {
        match self {
            HourBucket::Night => "Night (Midnight to 6AM)",
            HourBucket::Morning => "Morning (6AM to Noon)",
            HourBucket::Afternoon => "Afternoon (Noon to 6PM)",
            HourBucket::Evening => "Evening (6PM to Midnight)",
        }
    }
}

impl fmt::Display for HourBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HourBucket::Night => "night",
            HourBucket::Morning => "morning",
            HourBucket::Afternoon => "afternoon",
            HourBucket::Evening => "evening",
        };
        write!(f, "{}", name)
    }
}

const COMPASS_LABELS: [&str; SECTOR_COUNT as usize] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];

/// A 22.5° compass sector, stored as its index (0 = north, clockwise).
///
/// Sectors are centred on multiples of 22.5°, so north covers `[348.75, 11.25)`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CompassPoint(u8);

impl CompassPoint {
    /// Sector for a meteorological wind direction in degrees. Any finite input is accepted
    /// and wrapped into `[0, 360)`.
    pub fn from_degrees(direction: f64) -> Self {
        let shifted = (direction + SECTOR_DEGREES / 2.0).rem_euclid(360.0);
        // rem_euclid can round up to exactly 360.0
        Self(((shifted / SECTOR_DEGREES).floor() as u8) % SECTOR_COUNT)
    }

    /// Sector by index, `None` past 15.
    pub fn from_index(index: u8) -> Option<Self> {
        (index < SECTOR_COUNT).then_some(Self(index))
    }

    pub fn index(self) -> u8 {
        self.0
    }

    /// Centre of the sector: one of 0, 22.5, ..., 337.5.
    pub fn degrees(self) -> f64 {
        f64::from(self.0) * SECTOR_DEGREES
    }

    pub fn label(self) -> &'static str {
        COMPASS_LABELS[self.0 as usize]
    }

    pub fn all() -> impl Iterator<Item = CompassPoint> {
        (0..SECTOR_COUNT).map(CompassPoint)
    }
}

impl fmt::Display for CompassPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}
