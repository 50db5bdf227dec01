use crate::types::hourly_record::HourlyRecord;
use crate::types::period::{Month, StartEndDate};
use crate::types::site::SiteMetadata;
use crate::weather_data::error::FetchError;
use crate::LatLon;
use chrono::DateTime;
use log::{debug, info, warn};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// Open-Meteo historical weather endpoint.
pub const ARCHIVE_URL: &str = "https://archive-api.open-meteo.com/v1/archive";

// Order matters only for readability; the response is keyed by name.
const HOURLY_FIELDS: &str = "wind_speed_10m,wind_direction_10m";

#[derive(Debug, Deserialize)]
pub(crate) struct ArchiveResponse {
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    elevation: f64,
    #[serde(default)]
    utc_offset_seconds: i32,
    #[serde(default)]
    timezone: String,
    #[serde(default)]
    timezone_abbreviation: String,
    #[serde(default)]
    hourly: Option<ArchiveHourly>,
}

#[derive(Debug, Deserialize)]
struct ArchiveHourly {
    #[serde(default)]
    time: Vec<i64>,
    #[serde(default)]
    wind_speed_10m: Vec<Option<f64>>,
    #[serde(default)]
    wind_direction_10m: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct ArchiveErrorBody {
    reason: String,
}

/// One year's worth of a month, converted to records.
#[derive(Debug, Clone)]
pub struct YearSeries {
    pub month: Month,
    pub site: SiteMetadata,
    pub records: Vec<HourlyRecord>,
    pub skipped_hours: usize,
}

pub struct ArchiveClient {
    client: Client,
    base_url: String,
}

impl ArchiveClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(FetchError::ClientBuild)?;
        Ok(Self {
            client,
            base_url: base_url.to_string(),
        })
    }

    /// Requests hourly wind speed (knots) and direction for `window` at `location`.
    ///
    /// Times come back as unix seconds; the offset used for local hours is the one the
    /// service resolves for the site's own timezone.
    pub async fn fetch_window(
        &self,
        location: LatLon,
        month: Month,
        window: StartEndDate,
    ) -> Result<YearSeries, FetchError> {
        let start_date = window.start.format("%Y-%m-%d").to_string();
        let end_date = window.end.format("%Y-%m-%d").to_string();
        let query = [
            ("latitude", location.0.to_string()),
            ("longitude", location.1.to_string()),
            ("start_date", start_date),
            ("end_date", end_date),
            ("timezone", "auto".to_string()),
            ("wind_speed_unit", "kn".to_string()),
            ("hourly", HOURLY_FIELDS.to_string()),
            ("timeformat", "unixtime".to_string()),
        ];
        debug!("Requesting {} with {:?}", self.base_url, query);

        let response = self
            .client
            .get(&self.base_url)
            .query(&query)
            .send()
            .await
            .map_err(|e| FetchError::NetworkRequest {
                url: self.base_url.clone(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            let reason = match response.json::<ArchiveErrorBody>().await {
                Ok(body) => body.reason,
                Err(_) => status
                    .canonical_reason()
                    .unwrap_or("unknown error")
                    .to_string(),
            };
            warn!("Archive error for {} ({}): {}", month, status, reason);
            return Err(FetchError::Api {
                month,
                status,
                reason,
            });
        }

        let body: ArchiveResponse = response
            .json()
            .await
            .map_err(|e| FetchError::ResponseDecode { month, source: e })?;
        let series = body.into_year_series(location, month)?;
        info!(
            "Fetched {} hourly records for {} at {:?}",
            series.records.len(),
            month,
            location
        );
        Ok(series)
    }
}

impl ArchiveResponse {
    pub(crate) fn into_year_series(
        self,
        requested: LatLon,
        month: Month,
    ) -> Result<YearSeries, FetchError> {
        let ArchiveResponse {
            latitude,
            longitude,
            elevation,
            utc_offset_seconds,
            timezone,
            timezone_abbreviation,
            hourly,
        } = self;
        let hourly = hourly.ok_or(FetchError::EmptySeries { month })?;
        let times = hourly.time;
        let speeds = hourly.wind_speed_10m;
        let directions = hourly.wind_direction_10m;

        if times.is_empty() {
            return Err(FetchError::EmptySeries { month });
        }
        if speeds.len() != times.len() || directions.len() != times.len() {
            return Err(FetchError::SeriesLengthMismatch {
                month,
                times: times.len(),
                speeds: speeds.len(),
                directions: directions.len(),
            });
        }

        let mut records = Vec::with_capacity(times.len());
        let mut skipped_hours = 0;
        let mut previous: Option<i64> = None;
        for ((&timestamp, speed), direction) in times.iter().zip(&speeds).zip(&directions) {
            if previous.is_some_and(|p| timestamp <= p) {
                return Err(FetchError::UnorderedSeries { month });
            }
            previous = Some(timestamp);

            let utc_time = DateTime::from_timestamp(timestamp, 0)
                .ok_or(FetchError::InvalidTimestamp { month, timestamp })?;
            match (speed, direction) {
                (Some(speed), Some(direction)) => records.push(HourlyRecord::new(
                    utc_time,
                    utc_offset_seconds,
                    *speed,
                    *direction,
                )),
                _ => skipped_hours += 1,
            }
        }

        if records.is_empty() {
            return Err(FetchError::EmptySeries { month });
        }
        if skipped_hours > 0 {
            warn!(
                "Skipped {} of {} hours without wind data for {}",
                skipped_hours,
                times.len(),
                month
            );
        }

        Ok(YearSeries {
            month,
            site: SiteMetadata {
                requested,
                latitude,
                longitude,
                timezone,
                timezone_abbreviation,
                utc_offset_seconds,
                elevation,
            },
            records,
            skipped_hours,
        })
    }
}
