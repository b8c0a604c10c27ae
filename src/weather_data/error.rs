use crate::cache::error::CacheError;
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("Failed to build HTTP client: {0}")]
    ClientBuild(#[source] reqwest::Error),

    #[error("Day {0} has no representable 24-hour window")]
    DayOutOfRange(NaiveDate),

    #[error("Network request failed for station {station} on {day}: {source}")]
    NetworkRequest {
        station: String,
        day: NaiveDate,
        #[source]
        source: reqwest::Error,
    },

    #[error("HTTP request failed for station {station} on {day} with status {status}: {source}")]
    HttpStatus {
        station: String,
        day: NaiveDate,
        status: reqwest::StatusCode,
        #[source]
        source: reqwest::Error,
    },

    #[error("Malformed observation response for station {station} on {day}: {source}")]
    MalformedBody {
        station: String,
        day: NaiveDate,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to cache observations for station {station} on {day}: {source}")]
    CacheWrite {
        station: String,
        day: NaiveDate,
        #[source]
        source: CacheError,
    },
}
