use crate::types::selection::MonthRequest;
use crate::types::site::{distance_km, SiteMetadata};
use crate::types::wind_records::WindRecords;
use crate::weather_data::archive_client::ArchiveClient;
use crate::weather_data::error::FetchError;
use log::{info, warn};

/// Grid cells further apart than this across years are reported as drift.
pub const GRID_DRIFT_TOLERANCE_KM: f64 = 1.0;

/// Fetches a month across several years, one archive request per year.
pub struct MonthFetcher {
    client: ArchiveClient,
}

impl MonthFetcher {
    pub fn new(client: ArchiveClient) -> Self {
        Self { client }
    }

    /// Requests every year of `request` in ascending order and concatenates the series.
    ///
    /// The first failing year aborts the whole fetch. Site metadata comes from the last
    /// year; a drifting grid cell or timezone between years is logged, not rejected.
    pub async fn fetch(&self, request: &MonthRequest) -> Result<WindRecords, FetchError> {
        let mut records = Vec::new();
        let mut skipped_hours = 0;
        let mut site: Option<SiteMetadata> = None;

        for &(month, window) in request.windows() {
            let series = self
                .client
                .fetch_window(request.location, month, window)
                .await?;

            if let Some(previous) = &site {
                warn_on_drift(previous, &series.site, &month.to_string());
            }
            records.extend(series.records);
            skipped_hours += series.skipped_hours;
            site = Some(series.site);
        }

        let site = site.ok_or(FetchError::NoYears)?;
        info!(
            "Fetched {} hourly records for month {} over {} year(s) near {}, {}",
            records.len(),
            request.month,
            request.years.len(),
            site.latitude,
            site.longitude
        );

        Ok(WindRecords {
            records,
            site,
            skipped_hours,
        })
    }
}

fn warn_on_drift(previous: &SiteMetadata, current: &SiteMetadata, label: &str) {
    let drift = distance_km(previous.location(), current.location());
    if drift > GRID_DRIFT_TOLERANCE_KM {
        warn!(
            "Grid cell for {} moved {:.2} km from the previous year ({:?} -> {:?})",
            label,
            drift,
            previous.location(),
            current.location()
        );
    }
    if previous.timezone != current.timezone {
        warn!(
            "Timezone for {} changed from {} to {}",
            label, previous.timezone, current.timezone
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::buckets::HourBucket;
    use crate::weather_data::mock_archive::{synthetic_speed, MockArchive, MockArchiveOptions};
    use crate::LatLon;
    use chrono::{Datelike, NaiveDate};
    use std::time::Duration;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
    }

    async fn fetcher(options: MockArchiveOptions) -> std::io::Result<(MockArchive, MonthFetcher)> {
        let mock = MockArchive::start(options).await?;
        let client = ArchiveClient::new(&mock.url, Duration::from_secs(10))
            .map_err(std::io::Error::other)?;
        Ok((mock, MonthFetcher::new(client)))
    }

    #[tokio::test]
    async fn test_february_hour_counts() -> Result<(), Box<dyn std::error::Error>> {
        let (_mock, fetcher) = fetcher(MockArchiveOptions::default()).await?;

        let leap = MonthRequest::new(2, &[2020], LatLon(42.81, 17.52), today())?;
        assert_eq!(fetcher.fetch(&leap).await?.len(), 696);

        let common = MonthRequest::new(2, &[2021], LatLon(42.81, 17.52), today())?;
        assert_eq!(fetcher.fetch(&common).await?.len(), 672);
        Ok(())
    }

    #[tokio::test]
    async fn test_years_concatenated_in_order() -> Result<(), Box<dyn std::error::Error>> {
        let (mock, fetcher) = fetcher(MockArchiveOptions {
            utc_offset_seconds: 7200,
            ..Default::default()
        })
        .await?;
        let request = MonthRequest::new(8, &[2022, 2020, 2021], LatLon(42.81, 17.52), today())?;
        let result = fetcher.fetch(&request).await?;

        assert_eq!(mock.request_count(), 3);
        assert_eq!(result.len(), 3 * 31 * 24);
        assert_eq!(result.skipped_hours, 0);

        // Grouped by ascending year, strictly chronological within a year
        let years: Vec<i32> = result.iter().map(|r| r.utc_time.year()).collect();
        assert!(years.windows(2).all(|w| w[0] <= w[1]));
        assert!(result
            .records
            .windows(2)
            .all(|w| w[0].utc_time < w[1].utc_time));

        let first = &result.records[0];
        assert_eq!(first.local_hour, 0);
        assert_eq!(first.hour_bucket, HourBucket::Night);
        assert_eq!(first.wind_speed, synthetic_speed(0));
        assert_eq!(result.site.timezone_abbreviation, "CEST");
        Ok(())
    }

    #[tokio::test]
    async fn test_failed_year_aborts_fetch() -> Result<(), Box<dyn std::error::Error>> {
        let (mock, fetcher) = fetcher(MockArchiveOptions {
            fail_year: Some(2021),
            ..Default::default()
        })
        .await?;
        let request = MonthRequest::new(8, &[2020, 2021, 2022], LatLon(42.81, 17.52), today())?;

        let result = fetcher.fetch(&request).await;
        assert!(matches!(result, Err(FetchError::Api { month, .. }) if month.year() == 2021));
        // 2022 is never requested
        assert_eq!(mock.request_count(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_empty_year_is_an_error() -> Result<(), Box<dyn std::error::Error>> {
        let (_mock, fetcher) = fetcher(MockArchiveOptions {
            empty_year: Some(2020),
            ..Default::default()
        })
        .await?;
        let request = MonthRequest::new(8, &[2020], LatLon(42.81, 17.52), today())?;
        assert!(matches!(
            fetcher.fetch(&request).await,
            Err(FetchError::EmptySeries { .. })
        ));
        Ok(())
    }

    #[tokio::test]
    async fn test_last_year_metadata_wins() -> Result<(), Box<dyn std::error::Error>> {
        let (_mock, fetcher) = fetcher(MockArchiveOptions {
            drift_per_year: 0.05,
            null_hours: vec![0, 1],
            ..Default::default()
        })
        .await?;
        let request = MonthRequest::new(8, &[2020, 2021], LatLon(42.81, 17.52), today())?;
        let result = fetcher.fetch(&request).await?;

        // 2021 resolves to 42.8 + 21 * 0.05
        assert!((result.site.latitude - 43.85).abs() < 1e-9);
        assert_eq!(result.skipped_hours, 4);
        assert_eq!(result.len(), 2 * 31 * 24 - 4);
        Ok(())
    }
}
