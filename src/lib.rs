//! A day-granular, file-backed cache of hourly weather observations.
//!
//! A background [`Filler`] downloads one UTC day at a time from the provider
//! and stores it atomically. Range queries are answered only from that cache
//! and fail closed: if a single day in the requested span is missing, the
//! query returns `None` instead of partial data.

mod background;
mod cache;
mod config;
mod error;
mod metobs;
mod types;
mod utils;
mod weather_data;

pub use config::*;
pub use error::{ConfigError, MetObsError};
pub use metobs::*;

pub use background::filler::{Filler, FillerHandle, ScanSummary};
pub use cache::error::CacheError;
pub use cache::stats::{CacheStats, CacheStatsSnapshot};
pub use cache::store::CacheStore;

pub use types::day::{day_window, days_inclusive};
pub use types::into_utc::IntoUtcDateTime;
pub use types::observation::{ObservationRecord, GLOBAL_RADIATION};
pub use types::radiation::RadiationSeries;
pub use types::station::StationId;

pub use weather_data::error::FetchError;
pub use weather_data::fetcher::ObservationFetcher;
pub use weather_data::radiation::project_hourly;
pub use weather_data::range_reader::RangeReader;
