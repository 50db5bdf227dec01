mod aggregate;
mod cache;
mod error;
mod types;
mod utils;
mod weather_data;
mod windrose;

pub use error::WindroseError;
pub use windrose::*;

pub use aggregate::{aggregate, WindroseKey, WindroseRow, WindroseTable, CALM_THRESHOLD_KNOTS};

pub use types::buckets::{
    local_hour, speed_bucket, CompassPoint, HourBucket, SECTOR_COUNT, SECTOR_DEGREES,
    SPEED_BAND_KNOTS,
};
pub use types::hourly_record::HourlyRecord;
pub use types::period::{
    month_from_name, month_name, Month, StartEndDate, ARCHIVE_FIRST_YEAR, ARCHIVE_LAG_DAYS,
    MONTH_NAMES,
};
pub use types::selection::{
    MonthRequest, Selection, DEFAULT_LOCATION, DEFAULT_MONTH, DEFAULT_YEARS, SELECTABLE_YEARS,
};
pub use types::site::SiteMetadata;
pub use types::wind_records::WindRecords;

pub use cache::error::CacheError;
pub use cache::key::CacheKey;
pub use weather_data::archive_client::ARCHIVE_URL;
pub use weather_data::error::FetchError;
pub use weather_data::fetcher::GRID_DRIFT_TOLERANCE_KM;
