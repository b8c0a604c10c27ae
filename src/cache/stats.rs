use std::sync::atomic::{AtomicU64, Ordering};

/// Running counters for cache health, shared between the store, the fetcher
/// and the background filler.
///
/// A rising `corrupt_entries` count is the signal to watch: every corrupt
/// entry is also logged on the `metobs_cache::corruption` target.
#[derive(Debug, Default)]
pub struct CacheStats {
    corrupt_entries: AtomicU64,
    removal_failures: AtomicU64,
    days_written: AtomicU64,
    fetch_failures: AtomicU64,
}

/// Point-in-time copy of [`CacheStats`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStatsSnapshot {
    pub corrupt_entries: u64,
    pub removal_failures: u64,
    pub days_written: u64,
    pub fetch_failures: u64,
}

impl CacheStats {
    pub(crate) fn record_corrupt_entry(&self) {
        self.corrupt_entries.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_removal_failure(&self) {
        self.removal_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_day_written(&self) {
        self.days_written.fetch_add(1, Ordering::Relaxed);
    }

    pub(crate) fn record_fetch_failure(&self) {
        self.fetch_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> CacheStatsSnapshot {
        CacheStatsSnapshot {
            corrupt_entries: self.corrupt_entries.load(Ordering::Relaxed),
            removal_failures: self.removal_failures.load(Ordering::Relaxed),
            days_written: self.days_written.load(Ordering::Relaxed),
            fetch_failures: self.fetch_failures.load(Ordering::Relaxed),
        }
    }
}
