use crate::cache::stats::CacheStats;
use crate::cache::store::CacheStore;
use crate::config::Config;
use crate::types::day::day_window;
use crate::types::observation::ObservationRecord;
use crate::types::station::StationId;
use crate::weather_data::error::FetchError;
use chrono::NaiveDate;
use log::{error, info};
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;

const WINDOW_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

#[derive(Deserialize)]
struct FeatureCollection {
    features: Vec<ObservationRecord>,
}

/// Downloads a single day of observations and commits it to the cache.
#[derive(Debug, Clone)]
pub struct ObservationFetcher {
    client: Client,
    base_url: String,
    token: String,
    record_limit: u32,
    store: CacheStore,
    stats: Arc<CacheStats>,
}

impl ObservationFetcher {
    pub fn new(
        config: &Config,
        store: CacheStore,
        stats: Arc<CacheStats>,
    ) -> Result<Self, FetchError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(FetchError::ClientBuild)?;
        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            token: config.token.clone(),
            record_limit: config.record_limit,
            store,
            stats,
        })
    }

    /// Fetches `[day 00:00, day+1 00:00)` UTC for `station` and stores it.
    ///
    /// Returns the stored records, or `None` if anything failed. Failures are
    /// logged and never retried here; the background filler picks the day up
    /// again on its next pass. The cache is left untouched on failure.
    pub async fn fetch_day(
        &self,
        station: &StationId,
        day: NaiveDate,
    ) -> Option<Vec<ObservationRecord>> {
        match self.try_fetch_day(station, day).await {
            Ok(records) => Some(records),
            Err(e) => {
                self.stats.record_fetch_failure();
                error!("Downloading observations failed: {}", e);
                None
            }
        }
    }

    async fn try_fetch_day(
        &self,
        station: &StationId,
        day: NaiveDate,
    ) -> Result<Vec<ObservationRecord>, FetchError> {
        let records = self.download(station, day).await?;
        self.store
            .put(station, day, &records)
            .await
            .map_err(|source| FetchError::CacheWrite {
                station: station.to_string(),
                day,
                source,
            })?;
        info!(
            "Cached {} observations for station {} on {}",
            records.len(),
            station,
            day
        );
        Ok(records)
    }

    async fn download(
        &self,
        station: &StationId,
        day: NaiveDate,
    ) -> Result<Vec<ObservationRecord>, FetchError> {
        let network_error = |source: reqwest::Error| FetchError::NetworkRequest {
            station: station.to_string(),
            day,
            source,
        };
        let (start, end) = day_window(day).ok_or(FetchError::DayOutOfRange(day))?;
        let window = format!(
            "{}Z/{}Z",
            start.naive_utc().format(WINDOW_FORMAT),
            end.naive_utc().format(WINDOW_FORMAT)
        );
        let limit = self.record_limit.to_string();
        info!(
            "Fetching observations for {} from {} to {}",
            station, start, end
        );

        let response = self
            .client
            .get(&self.base_url)
            .query(&[
                ("api-key", self.token.as_str()),
                ("limit", limit.as_str()),
                ("stationId", station.as_str()),
                ("datetime", window.as_str()),
            ])
            .send()
            .await
            .map_err(network_error)?;

        let response = match response.error_for_status() {
            Ok(resp) => resp,
            Err(e) => {
                return Err(if let Some(status) = e.status() {
                    FetchError::HttpStatus {
                        station: station.to_string(),
                        day,
                        status,
                        source: e,
                    }
                } else {
                    network_error(e)
                });
            }
        };

        let body = response.bytes().await.map_err(network_error)?;
        let collection: FeatureCollection =
            serde_json::from_slice(&body).map_err(|source| FetchError::MalformedBody {
                station: station.to_string(),
                day,
                source,
            })?;
        Ok(collection.features)
    }
}
