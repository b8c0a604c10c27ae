//! Entry point for the observation cache.
//!
//! [`MetObs`] wires the cache store, the range reader and the fetcher together
//! from a single [`Config`], serves range queries from the local cache and
//! starts the background filler that keeps that cache populated.

use crate::background::filler::{Filler, FillerHandle};
use crate::cache::stats::{CacheStats, CacheStatsSnapshot};
use crate::cache::store::CacheStore;
use crate::config::Config;
use crate::error::MetObsError;
use crate::types::observation::ObservationRecord;
use crate::types::radiation::RadiationSeries;
use crate::types::station::StationId;
use crate::weather_data::fetcher::ObservationFetcher;
use crate::weather_data::range_reader::RangeReader;
use bon::bon;
use chrono::{DateTime, NaiveDate, Utc};
use std::sync::Arc;

/// Client for cached weather observations.
///
/// Queries never hit the network: they are answered from what the background
/// filler has already stored, and return `None` when the requested span is
/// not completely cached.
///
/// # Examples
///
/// ```no_run
/// # use metobs_cache::{Config, MetObs, MetObsError, StationId};
/// # use chrono::{TimeZone, Utc};
/// # #[tokio::main]
/// # async fn main() -> Result<(), MetObsError> {
/// let client = MetObs::new(Config::from_env()?).await?;
/// let station = StationId::new("06180").unwrap();
///
/// // Keep the cache filled for this station for the rest of the process.
/// let _filler = client.spawn_filler(station.clone());
///
/// let radiation = client
///     .radiation(&station)
///     .start(Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap())
///     .end(Utc.with_ymd_and_hms(2024, 6, 30, 23, 0, 0).unwrap())
///     .call()
///     .await;
///
/// match radiation {
///     Some(series) => println!("{} hourly values", series.len()),
///     None => println!("June is not fully cached yet"),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct MetObs {
    config: Config,
    stats: Arc<CacheStats>,
    reader: RangeReader,
    fetcher: ObservationFetcher,
}

#[bon]
impl MetObs {
    /// Creates a client from `config`, creating the cache directory if it
    /// does not exist yet.
    ///
    /// # Errors
    ///
    /// Returns [`MetObsError::Cache`] if the cache directory cannot be created
    /// and [`MetObsError::Fetch`] if the HTTP client cannot be built.
    pub async fn new(config: Config) -> Result<Self, MetObsError> {
        let stats = Arc::new(CacheStats::default());
        let store = CacheStore::open(&config.cache_dir, stats.clone()).await?;
        let fetcher = ObservationFetcher::new(&config, store.clone(), stats.clone())?;
        Ok(Self {
            reader: RangeReader::new(store),
            fetcher,
            stats,
            config,
        })
    }

    /// Creates a client configured from the process environment. See
    /// [`Config::from_env`].
    pub async fn from_env() -> Result<Self, MetObsError> {
        Self::new(Config::from_env()?).await
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn reader(&self) -> &RangeReader {
        &self.reader
    }

    pub fn fetcher(&self) -> &ObservationFetcher {
        &self.fetcher
    }

    /// Current cache health counters.
    pub fn stats(&self) -> CacheStatsSnapshot {
        self.stats.snapshot()
    }

    /// Starts the background filler for `station` on the current Tokio runtime.
    ///
    /// Keep the returned handle to stop the filler on shutdown; dropping it
    /// leaves the filler running until the process exits.
    pub fn spawn_filler(&self, station: StationId) -> FillerHandle {
        Filler::new(
            &self.config,
            station,
            self.reader.clone(),
            self.fetcher.clone(),
        )
        .spawn()
    }

    /// Cached records observed within `[start, end]`, or `None` if any day in
    /// the range is missing. `start` and `end` may be swapped.
    #[builder(start_fn = observations)]
    #[doc(hidden)]
    pub async fn build_observations(
        &self,
        #[builder(start_fn)] station: &StationId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Option<Vec<ObservationRecord>> {
        self.reader.fetch_range(station, start, end).await
    }

    /// Hourly mean global radiation within `[start, end]`, or `None` if any
    /// day in the range is missing.
    #[builder(start_fn = radiation)]
    #[doc(hidden)]
    pub async fn build_radiation(
        &self,
        #[builder(start_fn)] station: &StationId,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> Option<RadiationSeries> {
        self.reader
            .project_hourly_radiation(station, start, end)
            .await
    }

    /// Days currently cached for `station`, ascending.
    pub async fn available_days(&self, station: &StationId) -> Vec<NaiveDate> {
        self.reader.list_available_days(station).await
    }

    /// Days not cached yet for `station`.
    ///
    /// * `.since(NaiveDate)`: Optional. First day to check. Defaults to the configured epoch.
    /// * `.through(NaiveDate)`: Optional. Last day to check. Defaults to today (UTC).
    #[builder(start_fn = missing_days)]
    #[doc(hidden)]
    pub async fn build_missing_days(
        &self,
        #[builder(start_fn)] station: &StationId,
        since: Option<NaiveDate>,
        through: Option<NaiveDate>,
    ) -> Vec<NaiveDate> {
        let since = since.unwrap_or(self.config.epoch);
        let through = through.unwrap_or_else(|| Utc::now().date_naive());
        self.reader.missing_days(station, since, through).await
    }
}
