use crate::types::hourly_record::HourlyRecord;
use crate::types::site::SiteMetadata;
use crate::WindroseError;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tokio::task;

/// The hourly series for one (month, years, location) request, plus the site it came from.
///
/// Records are grouped by year in ascending year order and chronological within a year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WindRecords {
    pub records: Vec<HourlyRecord>,
    /// Metadata of the last year fetched.
    pub site: SiteMetadata,
    /// Hours the service returned without a speed or direction value.
    pub skipped_hours: usize,
}

impl WindRecords {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HourlyRecord> {
        self.records.iter()
    }

    /// Records with a wind speed strictly above `min_speed` knots.
    pub fn filtered(&self, min_speed: f64) -> WindRecords {
        WindRecords {
            records: self
                .records
                .iter()
                .filter(|r| r.wind_speed > min_speed)
                .cloned()
                .collect(),
            site: self.site.clone(),
            skipped_hours: self.skipped_hours,
        }
    }

    /// One row per record. `utc_time` is a timezone-naive millisecond datetime holding UTC.
    pub fn to_frame(&self) -> PolarsResult<DataFrame> {
        let n = self.records.len();
        let mut utc_time = Vec::with_capacity(n);
        let mut local_hour = Vec::with_capacity(n);
        let mut hour_bucket = Vec::with_capacity(n);
        let mut wind_speed = Vec::with_capacity(n);
        let mut speed_bucket = Vec::with_capacity(n);
        let mut wind_direction = Vec::with_capacity(n);
        let mut compass_point = Vec::with_capacity(n);

        for record in &self.records {
            utc_time.push(record.utc_time.timestamp_millis());
            local_hour.push(record.local_hour);
            hour_bucket.push(record.hour_bucket.start_hour());
            wind_speed.push(record.wind_speed);
            speed_bucket.push(record.speed_bucket);
            wind_direction.push(record.wind_direction);
            compass_point.push(record.compass_point.degrees());
        }

        let utc_time = Column::new("utc_time".into(), utc_time)
            .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?;

        DataFrame::new(vec![
            utc_time,
            Column::new("local_hour".into(), local_hour),
            Column::new("hour_bucket".into(), hour_bucket),
            Column::new("wind_speed".into(), wind_speed),
            Column::new("speed_bucket".into(), speed_bucket),
            Column::new("wind_direction".into(), wind_direction),
            Column::new("compass_point".into(), compass_point),
        ])
    }

    /// Writes [`WindRecords::to_frame`] to a Snappy-compressed parquet file.
    pub async fn write_parquet(&self, path: &Path) -> Result<(), WindroseError> {
        let mut df = self.to_frame()?;
        let path_buf = path.to_path_buf();
        task::spawn_blocking(move || {
            let file = std::fs::File::create(&path_buf)
                .map_err(|e| WindroseError::ParquetWriteIo(path_buf.clone(), e))?;
            ParquetWriter::new(file)
                .with_compression(ParquetCompression::Snappy)
                .finish(&mut df)
                .map_err(|e| WindroseError::ParquetWritePolars(path_buf, e))?;
            Ok::<(), WindroseError>(())
        })
        .await??;
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::LatLon;
    use chrono::{Duration, TimeZone, Utc};

    pub(crate) fn sample_site() -> SiteMetadata {
        SiteMetadata {
            requested: LatLon(42.81, 17.52),
            latitude: 42.8,
            longitude: 17.5,
            timezone: "Europe/Zagreb".to_string(),
            timezone_abbreviation: "CEST".to_string(),
            utc_offset_seconds: 7200,
            elevation: 5.0,
        }
    }

    /// A day of hourly records with speeds 0, 1, 2, ... knots.
    pub(crate) fn sample_records() -> WindRecords {
        let start = Utc.with_ymd_and_hms(2023, 8, 1, 0, 0, 0).unwrap();
        let records = (0..24)
            .map(|i| {
                HourlyRecord::new(
                    start + Duration::hours(i),
                    7200,
                    i as f64,
                    (i * 30 % 360) as f64,
                )
            })
            .collect();
        WindRecords {
            records,
            site: sample_site(),
            skipped_hours: 0,
        }
    }

    #[test]
    fn test_filtered_is_strict() {
        let records = sample_records();
        let filtered = records.filtered(3.0);
        assert_eq!(filtered.len(), 20);
        assert!(filtered.iter().all(|r| r.wind_speed > 3.0));
        assert_eq!(filtered.site, records.site);
    }

    #[test]
    fn test_to_frame_schema() -> Result<(), PolarsError> {
        let df = sample_records().to_frame()?;
        assert_eq!(df.height(), 24);

        let names: Vec<&str> = df.get_column_names().iter().map(|c| c.as_str()).collect();
        assert_eq!(
            names,
            [
                "utc_time",
                "local_hour",
                "hour_bucket",
                "wind_speed",
                "speed_bucket",
                "wind_direction",
                "compass_point"
            ]
        );
        assert!(matches!(
            df.column("utc_time")?.dtype(),
            DataType::Datetime(TimeUnit::Milliseconds, None)
        ));

        // First record is 00:00 UTC, 02:00 local
        assert_eq!(df.column("local_hour")?.u32()?.get(0), Some(2));
        Ok(())
    }

    #[tokio::test]
    async fn test_write_parquet() -> Result<(), Box<dyn std::error::Error>> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("august.parquet");
        sample_records().write_parquet(&path).await?;

        let file = std::fs::File::open(&path)?;
        let df = ParquetReader::new(file).finish()?;
        assert_eq!(df.height(), 24);
        Ok(())
    }
}
