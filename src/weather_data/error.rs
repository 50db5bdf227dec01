use crate::types::period::Month;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to build HTTP client")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Network request failed for {url}")]
    NetworkRequest {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Archive request for {month} failed with status {status}: {reason}")]
    Api {
        month: Month,
        status: reqwest::StatusCode,
        reason: String,
    },

    #[error("Failed to decode archive response for {month}")]
    ResponseDecode {
        month: Month,
        #[source]
        source: reqwest::Error,
    },

    /// Guard for `MonthFetcher::fetch` on a request without windows. Requests built
    /// through `MonthRequest::new` always carry at least one year.
    #[error("No years were requested")]
    NoYears,

    #[error("Archive returned no hourly data for {month}")]
    EmptySeries { month: Month },

    #[error("Archive series for {month} have different lengths: {times} times, {speeds} speeds, {directions} directions")]
    SeriesLengthMismatch {
        month: Month,
        times: usize,
        speeds: usize,
        directions: usize,
    },

    #[error("Archive returned invalid timestamp {timestamp} for {month}")]
    InvalidTimestamp { month: Month, timestamp: i64 },

    #[error("Archive timestamps for {month} are not strictly increasing")]
    UnorderedSeries { month: Month },
}
