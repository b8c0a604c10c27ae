//! Keeps the day cache complete from the configured epoch up to today.
//!
//! The filler alternates between a scan (fetch every missing day, oldest
//! first, one at a time) and a sleep of the configured interval. A day that
//! fails to download is left missing and retried on the next scan.

use crate::config::Config;
use crate::types::station::StationId;
use crate::weather_data::fetcher::ObservationFetcher;
use crate::weather_data::range_reader::RangeReader;
use chrono::{NaiveDate, Utc};
use log::{debug, error, info, warn};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Outcome of one scan over the cache.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScanSummary {
    /// Days found missing at the start of the scan.
    pub missing: usize,
    pub fetched: usize,
    pub failed: usize,
}

pub struct Filler {
    station: StationId,
    epoch: NaiveDate,
    interval: Duration,
    reader: RangeReader,
    fetcher: ObservationFetcher,
}

impl Filler {
    pub fn new(
        config: &Config,
        station: StationId,
        reader: RangeReader,
        fetcher: ObservationFetcher,
    ) -> Self {
        Self {
            station,
            epoch: config.epoch,
            interval: config.fill_interval,
            reader,
            fetcher,
        }
    }

    /// Fetches every day from the epoch through `today` that is not cached yet,
    /// sequentially and in ascending order.
    pub async fn scan_once(&self, today: NaiveDate) -> ScanSummary {
        if self.epoch > today {
            debug!("Epoch {} is after {}; nothing to fill", self.epoch, today);
            return ScanSummary::default();
        }

        let missing = self.reader.missing_days(&self.station, self.epoch, today).await;
        let mut summary = ScanSummary {
            missing: missing.len(),
            ..ScanSummary::default()
        };
        for day in missing {
            match self.fetcher.fetch_day(&self.station, day).await {
                Some(_) => summary.fetched += 1,
                None => summary.failed += 1,
            }
        }
        summary
    }

    /// Starts the scan/sleep loop on the runtime and returns a handle to it.
    ///
    /// The loop runs until [`FillerHandle::shutdown`] is called. Dropping the
    /// handle leaves it running for the rest of the process.
    pub fn spawn(self) -> FillerHandle {
        let cancel = CancellationToken::new();
        let station = self.station.clone();
        let worker = tokio::spawn(self.run(cancel.clone()));

        // Supervises the worker so a panic is logged instead of vanishing.
        let task = tokio::spawn(async move {
            match worker.await {
                Ok(()) => info!("Background filler for station {} stopped", station),
                Err(e) if e.is_panic() => {
                    error!("Background filler for station {} panicked: {}", station, e)
                }
                Err(e) => warn!("Background filler for station {} aborted: {}", station, e),
            }
        });

        FillerHandle { cancel, task }
    }

    async fn run(self, cancel: CancellationToken) {
        info!(
            "Background filler for station {} started (epoch {}, interval {:?})",
            self.station, self.epoch, self.interval
        );
        loop {
            let today = Utc::now().date_naive();
            tokio::select! {
                _ = cancel.cancelled() => break,
                summary = self.scan_once(today) => {
                    info!(
                        "Filled cache for station {} through {}: {} missing, {} fetched, {} failed",
                        self.station, today, summary.missing, summary.fetched, summary.failed
                    );
                }
            }

            debug!("Background filler sleeping for {:?}", self.interval);
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = tokio::time::sleep(self.interval) => {}
            }
        }
    }
}

/// Handle to a running [`Filler`] loop.
#[derive(Debug)]
pub struct FillerHandle {
    cancel: CancellationToken,
    task: JoinHandle<()>,
}

impl FillerHandle {
    pub fn is_running(&self) -> bool {
        !self.task.is_finished()
    }

    /// Stops the loop, interrupting an in-progress scan or sleep, and waits
    /// for it to wind down. Cache entries are only ever replaced atomically, so
    /// interrupting a fetch leaves that day either cached or missing.
    pub async fn shutdown(self) {
        self.cancel.cancel();
        if let Err(e) = self.task.await {
            error!("Background filler supervisor failed: {}", e);
        }
    }
}
