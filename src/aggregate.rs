//! Grouping of hourly records into windrose counts.

use crate::types::buckets::{CompassPoint, HourBucket};
use crate::types::hourly_record::HourlyRecord;
use polars::prelude::*;
use std::collections::BTreeMap;

/// Readings at or below this speed (knots) are treated as calm and left out.
pub const CALM_THRESHOLD_KNOTS: f64 = 3.0;

/// One cell of a windrose: time of day, direction sector and speed band.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct WindroseKey {
    pub hour_bucket: HourBucket,
    pub compass_point: CompassPoint,
    pub speed_bucket: u32,
}

impl From<&HourlyRecord> for WindroseKey {
    fn from(record: &HourlyRecord) -> Self {
        Self {
            hour_bucket: record.hour_bucket,
            compass_point: record.compass_point,
            speed_bucket: record.speed_bucket,
        }
    }
}

/// A counted cell, as handed to a polar bar chart: radius = `count`,
/// angle = `compass_point`, colour = `speed_bucket`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct WindroseRow {
    pub hour_bucket: HourBucket,
    pub compass_point: CompassPoint,
    pub speed_bucket: u32,
    pub count: u32,
}

/// Counts per (hour bucket, compass point, speed bucket). Cells without records are absent.
#[derive(Debug, Clone, PartialEq)]
pub struct WindroseTable {
    counts: BTreeMap<WindroseKey, u32>,
    min_speed: f64,
}

/// Counts the records with `wind_speed > min_speed` per windrose cell.
///
/// ```
/// use chrono::{TimeZone, Utc};
/// use windrose::{aggregate, HourlyRecord, HourBucket};
///
/// let at = Utc.with_ymd_and_hms(2023, 8, 1, 14, 0, 0).unwrap();
/// let records = vec![
///     HourlyRecord::new(at, -18000, 12.3, 10.0),
///     HourlyRecord::new(at, -18000, 13.0, 355.0),
///     HourlyRecord::new(at, -18000, 2.0, 90.0), // calm, dropped
/// ];
/// let table = aggregate(&records, 3.0);
/// assert_eq!(table.total(), 2);
/// assert_eq!(table.partition(HourBucket::Morning)[0].count, 2);
/// ```
pub fn aggregate(records: &[HourlyRecord], min_speed: f64) -> WindroseTable {
    WindroseTable::from_records(records, min_speed)
}

impl WindroseTable {
    pub fn from_records<'a>(
        records: impl IntoIterator<Item = &'a HourlyRecord>,
        min_speed: f64,
    ) -> Self {
        let mut counts = BTreeMap::new();
        for record in records {
            // NaN speeds fail the comparison and are dropped along with calm hours
            if record.wind_speed > min_speed {
                *counts.entry(WindroseKey::from(record)).or_insert(0) += 1;
            }
        }
        Self { counts, min_speed }
    }

    /// Threshold the table was built with.
    pub fn min_speed(&self) -> f64 {
        self.min_speed
    }

    /// Count for a cell; zero when the cell is absent.
    pub fn count(&self, key: &WindroseKey) -> u32 {
        self.counts.get(key).copied().unwrap_or(0)
    }

    /// Number of non-empty cells.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Number of records counted.
    pub fn total(&self) -> u64 {
        self.counts.values().map(|&c| u64::from(c)).sum()
    }

    pub fn total_in(&self, bucket: HourBucket) -> u64 {
        self.partition(bucket)
            .iter()
            .map(|row| u64::from(row.count))
            .sum()
    }

    /// All non-empty cells in key order.
    pub fn rows(&self) -> impl Iterator<Item = WindroseRow> + '_ {
        self.counts.iter().map(|(key, &count)| WindroseRow {
            hour_bucket: key.hour_bucket,
            compass_point: key.compass_point,
            speed_bucket: key.speed_bucket,
            count,
        })
    }

    /// The cells of one time-of-day block, i.e. the data for one chart.
    pub fn partition(&self, bucket: HourBucket) -> Vec<WindroseRow> {
        self.rows().filter(|row| row.hour_bucket == bucket).collect()
    }

    /// All four blocks in chart order, empty ones included.
    pub fn partitions(&self) -> [(HourBucket, Vec<WindroseRow>); 4] {
        HourBucket::DISPLAY_ORDER.map(|bucket| (bucket, self.partition(bucket)))
    }

    /// Columns `hour_bucket`, `compass_point` (degrees), `speed_bucket`, `count`.
    pub fn to_frame(&self) -> PolarsResult<DataFrame> {
        let mut hour_bucket = Vec::with_capacity(self.len());
        let mut compass_point = Vec::with_capacity(self.len());
        let mut speed_bucket = Vec::with_capacity(self.len());
        let mut count = Vec::with_capacity(self.len());
        for row in self.rows() {
            hour_bucket.push(row.hour_bucket.start_hour());
            compass_point.push(row.compass_point.degrees());
            speed_bucket.push(row.speed_bucket);
            count.push(row.count);
        }
        DataFrame::new(vec![
            Column::new("hour_bucket".into(), hour_bucket),
            Column::new("compass_point".into(), compass_point),
            Column::new("speed_bucket".into(), speed_bucket),
            Column::new("count".into(), count),
        ])
    }

    /// [`WindroseTable::to_frame`] restricted to one time-of-day block.
    pub fn partition_frame(&self, bucket: HourBucket) -> PolarsResult<DataFrame> {
        self.to_frame()?
            .lazy()
            .filter(col("hour_bucket").eq(lit(bucket.start_hour())))
            .collect()
    }
}
