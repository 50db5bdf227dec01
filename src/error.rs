use crate::cache::error::CacheError;
use crate::weather_data::error::FetchError;
use crate::LatLon;
use polars::error::PolarsError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum WindroseError {
    #[error("Invalid date range {year:04}-{month:02}: {reason}")]
    InvalidDateRange {
        year: i32,
        month: u32,
        reason: &'static str,
    },

    #[error("No years selected, at least one year is required")]
    EmptySelection,

    #[error("Coordinate {0:?} is outside the valid latitude/longitude range")]
    InvalidLocation(LatLon),

    #[error("Unknown month name '{0}'")]
    UnknownMonthName(String),

    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Cache(#[from] CacheError),

    #[error("Failed to create cache directory '{0}'")]
    CacheDirCreation(PathBuf, #[source] std::io::Error),

    #[error("Failed to determine cache directory")]
    CacheDirResolution(#[source] std::io::Error),

    #[error("Polars operation failed: {0}")]
    Polars(#[from] PolarsError),

    #[error("I/O error writing parquet file '{0}'")]
    ParquetWriteIo(PathBuf, #[source] std::io::Error),

    #[error("Encoding error writing parquet file '{0}'")]
    ParquetWritePolars(PathBuf, #[source] PolarsError),

    #[error("Background task failed to complete")]
    TaskJoin(#[from] tokio::task::JoinError),
}
