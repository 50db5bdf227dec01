//! This module provides the main entry point of the crate: the [`Windrose`] client.
//! It fetches a month of hourly wind observations over several years for a point on
//! the map and bins them into windrose tables.

use crate::aggregate::{WindroseTable, CALM_THRESHOLD_KNOTS};
use crate::cache::FetchCache;
use crate::error::WindroseError;
use crate::types::selection::{MonthRequest, Selection, DEFAULT_LOCATION};
use crate::types::wind_records::WindRecords;
use crate::utils::{ensure_cache_dir_exists, get_cache_dir};
use crate::weather_data::archive_client::{ArchiveClient, ARCHIVE_URL};
use crate::weather_data::fetcher::MonthFetcher;
use bon::{bon, Builder};
use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Represents a geographical coordinate using latitude and longitude.
///
/// Latitude is the first element (index 0), and longitude is the second (index 1).
///
/// # Examples
///
/// ```
/// use windrose::LatLon;
///
/// let korcula = LatLon(42.81, 17.52);
/// assert_eq!(korcula.0, 42.81); // Latitude
/// assert_eq!(korcula.1, 17.52); // Longitude
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLon(pub f64, pub f64);

/// Settings for a [`Windrose`] client.
///
/// # Examples
///
/// ```
/// use windrose::WindroseConfig;
/// use std::time::Duration;
///
/// let config = WindroseConfig::builder()
///     .disk_cache(false)
///     .request_timeout(Duration::from_secs(10))
///     .build();
/// assert_eq!(config.archive_url, windrose::ARCHIVE_URL);
/// ```
#[derive(Debug, Clone, Builder)]
pub struct WindroseConfig {
    /// Where fetched months are stored. Defaults to the system cache directory.
    #[builder(into)]
    pub cache_folder: Option<PathBuf>,
    /// Persist historical months to `cache_folder`. Defaults to `true`.
    #[builder(default = true)]
    pub disk_cache: bool,
    /// Archive endpoint. Defaults to [`ARCHIVE_URL`].
    #[builder(into, default = ARCHIVE_URL.to_string())]
    pub archive_url: String,
    /// Per-request timeout. Defaults to 30 seconds.
    #[builder(default = Duration::from_secs(30))]
    pub request_timeout: Duration,
    /// Lifetime of cached results that include the current year. Defaults to one hour.
    #[builder(default = Duration::from_secs(3600))]
    pub current_year_ttl: Duration,
}

impl Default for WindroseConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Hourly records together with their windrose counts.
#[derive(Debug, Clone, PartialEq)]
pub struct WindroseReport {
    /// Every fetched hour, calm ones included.
    pub records: WindRecords,
    pub table: WindroseTable,
}

/// The main client struct for building windroses.
///
/// Fetches go through a read-through cache: months entirely in the past are kept in
/// memory and (by default) on disk; anything including the current year, or a month
/// the archive has not fully caught up with, is only kept in memory for
/// [`WindroseConfig::current_year_ttl`].
///
/// # Examples
///
/// ```no_run
/// # use windrose::{Windrose, WindroseError};
/// # async fn run() -> Result<(), WindroseError> {
/// let client = Windrose::new().await?;
/// // Now you can use the client to fetch months or build windroses
/// # Ok(())
/// # }
/// ```
pub struct Windrose {
    fetcher: MonthFetcher,
    cache: FetchCache,
}

#[bon]
impl Windrose {
    /// Creates a client from a [`WindroseConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`WindroseError::CacheDirResolution`] if no cache folder was given and the
    /// system cache directory cannot be found, [`WindroseError::CacheDirCreation`] if the
    /// cache folder cannot be created, and [`WindroseError::Fetch`] if the HTTP client
    /// cannot be built.
    pub async fn with_config(config: WindroseConfig) -> Result<Self, WindroseError> {
        let disk_dir = if config.disk_cache {
            let folder = match config.cache_folder {
                Some(folder) => folder,
                None => get_cache_dir().map_err(WindroseError::CacheDirResolution)?,
            };
            ensure_cache_dir_exists(&folder)
                .await
                .map_err(|e| WindroseError::CacheDirCreation(folder.clone(), e))?;
            Some(folder)
        } else {
            None
        };

        let client = ArchiveClient::new(&config.archive_url, config.request_timeout)?;
        Ok(Self {
            fetcher: MonthFetcher::new(client),
            cache: FetchCache::new(disk_dir, config.current_year_ttl),
        })
    }

    /// Creates a client that caches in `cache_folder`, created if missing.
    ///
    /// ```no_run
    /// # use windrose::{Windrose, WindroseError};
    /// # use std::path::Path;
    /// # async fn run() -> Result<(), WindroseError> {
    /// let cache_path = Path::new("/home/user/.cache/windrose").to_path_buf();
    /// let client = Windrose::with_cache_folder(cache_path).await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn with_cache_folder(cache_folder: PathBuf) -> Result<Self, WindroseError> {
        Self::with_config(WindroseConfig::builder().cache_folder(cache_folder).build()).await
    }

    /// Creates a client with default settings, caching in the system cache directory
    /// (e.g. `~/.cache/windrose_rs_cache` on Linux).
    pub async fn new() -> Result<Self, WindroseError> {
        Self::with_config(WindroseConfig::default()).await
    }

    /// Fetches hourly wind observations for one month across several years.
    ///
    /// One archive request is made per year, in ascending year order, and the series are
    /// concatenated. The returned [`crate::SiteMetadata`] is the one reported for the
    /// last year.
    ///
    /// # Arguments
    ///
    /// * `.month(u32)`: **Required.** Month number, 1-12.
    /// * `.years(&[i32])`: **Required.** Years to fetch. Order and duplicates don't matter.
    /// * `.location(LatLon)`: Optional. Defaults to [`DEFAULT_LOCATION`].
    ///
    /// # Errors
    ///
    /// * [`WindroseError::EmptySelection`] if `years` is empty.
    /// * [`WindroseError::InvalidLocation`] for coordinates off the globe.
    /// * [`WindroseError::InvalidDateRange`] for a month outside 1-12 or a year/month the
    ///   archive does not cover yet. Nothing is requested in these cases.
    /// * [`WindroseError::Fetch`] if any year's request fails or comes back empty.
    /// * [`WindroseError::Cache`] if the disk cache cannot be read or written.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use windrose::{LatLon, Windrose, WindroseError};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), WindroseError> {
    /// let client = Windrose::new().await?;
    /// let february = client
    ///     .fetch_month()
    ///     .month(2)
    ///     .years(&[2020, 2021])
    ///     .location(LatLon(52.37, 4.89))
    ///     .call()
    ///     .await?;
    /// println!("{} hours near {}", february.len(), february.site);
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub async fn fetch_month(
        &self,
        month: u32,
        years: &[i32],
        location: Option<LatLon>,
    ) -> Result<WindRecords, WindroseError> {
        let request = MonthRequest::new(
            month,
            years,
            location.unwrap_or(DEFAULT_LOCATION),
            today(),
        )?;
        self.cache.get_or_fetch(&request, &self.fetcher).await
    }

    /// Fetches a month (see [`Windrose::fetch_month`]) and counts it into a windrose table.
    ///
    /// # Arguments
    ///
    /// * `.month(u32)`, `.years(&[i32])`, `.location(LatLon)`: as for `fetch_month`.
    /// * `.min_speed(f64)`: Optional. Hours at or below this many knots are left out of
    ///   the table. Defaults to [`CALM_THRESHOLD_KNOTS`].
    ///
    /// # Examples
    ///
    /// ```no_run
    /// # use windrose::{Windrose, WindroseError};
    /// # #[tokio::main]
    /// # async fn main() -> Result<(), WindroseError> {
    /// let client = Windrose::new().await?;
    /// let report = client.windrose().month(8).years(&[2023, 2024]).call().await?;
    /// for (bucket, rows) in report.table.partitions() {
    ///     println!("{}: {} cells", bucket.title(), rows.len());
    /// }
    /// # Ok(())
    /// # }
    /// ```
    #[builder]
    pub async fn windrose(
        &self,
        month: u32,
        years: &[i32],
        location: Option<LatLon>,
        min_speed: Option<f64>,
    ) -> Result<WindroseReport, WindroseError> {
        let records = self
            .fetch_month()
            .month(month)
            .years(years)
            .maybe_location(location)
            .call()
            .await?;
        let min_speed = min_speed.unwrap_or(CALM_THRESHOLD_KNOTS);
        let table = WindroseTable::from_records(&records.records, min_speed);
        Ok(WindroseReport { records, table })
    }

    /// Builds the windrose for the state a UI holds: selected month, years and map point.
    pub async fn fetch_selection(
        &self,
        selection: &Selection,
    ) -> Result<WindroseReport, WindroseError> {
        self.windrose()
            .month(selection.month)
            .years(&selection.years_vec())
            .location(selection.location)
            .call()
            .await
    }

    /// Forgets a cached result so the next fetch goes back to the archive.
    ///
    /// Returns `true` if something was cached.
    pub async fn invalidate(
        &self,
        month: u32,
        years: &[i32],
        location: LatLon,
    ) -> Result<bool, WindroseError> {
        let request = MonthRequest::new(month, years, location, today())?;
        Ok(self.cache.invalidate(&request.cache_key()).await?)
    }

    /// Forgets every cached result, in memory and on disk.
    pub async fn clear_cache(&self) -> Result<(), WindroseError> {
        Ok(self.cache.clear().await?)
    }
}

fn today() -> NaiveDate {
    Utc::now().date_naive()
}
