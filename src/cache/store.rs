//! Durable storage of one day of observations per station.
//!
//! Each `(station, day)` pair maps to a single JSON file holding the raw
//! provider records. Writes go through a temporary file in the same directory
//! that is synced and then renamed over the final path, so a reader sees
//! either the previous complete file or the new complete file.

use crate::cache::error::CacheError;
use crate::cache::key::{file_name, parse_file_name};
use crate::cache::stats::CacheStats;
use crate::types::observation::ObservationRecord;
use crate::types::station::StationId;
use crate::utils::ensure_cache_dir_exists;
use chrono::NaiveDate;
use log::{debug, error, warn};
use std::collections::BTreeSet;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::NamedTempFile;
use tokio::{fs, task};

const CORRUPTION_TARGET: &str = "metobs_cache::corruption";

#[derive(Debug, Clone)]
pub struct CacheStore {
    dir: PathBuf,
    stats: Arc<CacheStats>,
}

impl CacheStore {
    /// Opens the store rooted at `dir`, creating the directory if needed.
    pub async fn open(dir: &Path, stats: Arc<CacheStats>) -> Result<Self, CacheError> {
        ensure_cache_dir_exists(dir).await?;
        Ok(Self {
            dir: dir.to_path_buf(),
            stats,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, station: &StationId, day: NaiveDate) -> PathBuf {
        self.dir.join(file_name(station, day))
    }

    /// Persists `records` as the entry for `(station, day)`, replacing any
    /// existing entry wholesale.
    pub async fn put(
        &self,
        station: &StationId,
        day: NaiveDate,
        records: &[ObservationRecord],
    ) -> Result<(), CacheError> {
        let bytes = serde_json::to_vec(records).map_err(CacheError::Encode)?;
        let dir = self.dir.clone();
        let final_path = self.path_for(station, day);

        // The directory may have been removed underneath us since `open`.
        ensure_cache_dir_exists(&dir).await?;

        task::spawn_blocking(move || write_atomically(&dir, &final_path, &bytes)).await??;

        self.stats.record_day_written();
        debug!("Cached {} records for station {} on {}", records.len(), station, day);
        Ok(())
    }

    /// Returns the cached records for `(station, day)`, or `None` if there is
    /// no usable entry.
    ///
    /// An entry that cannot be read or decoded is treated as absent and
    /// removed so the background filler fetches it again.
    pub async fn get(&self, station: &StationId, day: NaiveDate) -> Option<Vec<ObservationRecord>> {
        let path = self.path_for(station, day);
        match read_entry(&path).await {
            Ok(Some(records)) => Some(records),
            Ok(None) => None,
            Err(e) => {
                self.discard_corrupt(station, day, &path, &e).await;
                None
            }
        }
    }

    /// Cheap presence check; does not validate the entry's contents.
    pub async fn contains(&self, station: &StationId, day: NaiveDate) -> bool {
        fs::try_exists(self.path_for(station, day))
            .await
            .unwrap_or(false)
    }

    /// Days that have an entry for `station`. File names that do not decode
    /// as cache entries are skipped.
    pub async fn list_days(&self, station: &StationId) -> Result<BTreeSet<NaiveDate>, CacheError> {
        let mut entries = match fs::read_dir(&self.dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(BTreeSet::new()),
            Err(e) => return Err(CacheError::ListDir(self.dir.clone(), e)),
        };

        let mut days = BTreeSet::new();
        while let Some(entry) = entries
            .next_entry()
            .await
            .map_err(|e| CacheError::ListDir(self.dir.clone(), e))?
        {
            let name = entry.file_name();
            let Some(name) = name.to_str() else {
                continue;
            };
            match parse_file_name(name) {
                Some((entry_station, day)) if entry_station == station.as_str() => {
                    days.insert(day);
                }
                _ => {}
            }
        }
        Ok(days)
    }

    async fn discard_corrupt(
        &self,
        station: &StationId,
        day: NaiveDate,
        path: &Path,
        cause: &CacheError,
    ) {
        self.stats.record_corrupt_entry();
        warn!(
            target: CORRUPTION_TARGET,
            "event=cache_corrupt station={} day={} path={} error={}",
            station,
            day,
            path.display(),
            cause
        );
        match fs::remove_file(path).await {
            Ok(()) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => {
                self.stats.record_removal_failure();
                error!(
                    target: CORRUPTION_TARGET,
                    "event=cache_remove_failed station={} day={} path={} error={}",
                    station,
                    day,
                    path.display(),
                    e
                );
            }
        }
    }
}

/// Reads and decodes a cache file. A missing file is `Ok(None)`; anything
/// else that goes wrong is an error.
async fn read_entry(path: &Path) -> Result<Option<Vec<ObservationRecord>>, CacheError> {
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(CacheError::Read(path.to_path_buf(), e)),
    };
    serde_json::from_slice::<Vec<ObservationRecord>>(&bytes)
        .map(Some)
        .map_err(|e| CacheError::Decode(path.to_path_buf(), e))
}

fn write_atomically(dir: &Path, final_path: &Path, bytes: &[u8]) -> Result<(), CacheError> {
    let mut temp_file =
        NamedTempFile::new_in(dir).map_err(|e| CacheError::Write(dir.to_path_buf(), e))?;
    temp_file
        .write_all(bytes)
        .map_err(|e| CacheError::Write(dir.to_path_buf(), e))?;
    temp_file
        .flush()
        .map_err(|e| CacheError::Write(dir.to_path_buf(), e))?;
    temp_file
        .as_file()
        .sync_all()
        .map_err(|e| CacheError::Write(dir.to_path_buf(), e))?;
    temp_file
        .persist(final_path)
        .map_err(|e| CacheError::Persist(final_path.to_path_buf(), e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn station(id: &str) -> StationId {
        StationId::new(id).unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn open_store(dir: &Path) -> CacheStore {
        CacheStore::open(dir, Arc::new(CacheStats::default()))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_put_then_get_round_trip() -> Result<(), CacheError> {
        let tmp = tempfile::tempdir().unwrap();
        let store = open_store(tmp.path()).await;
        let records = vec![
            ObservationRecord::from(json!({"a": 1})),
            ObservationRecord::from(json!({"properties": {"value": 3.5, "nested": {"x": [1, 2]}}})),
        ];

        store.put(&station("06180"), date(2024, 1, 1), &records).await?;

        assert_eq!(store.get(&station("06180"), date(2024, 1, 1)).await, Some(records));
        assert!(tmp.path().join("06180_20240101.json").is_file());
        assert_eq!(store.stats.snapshot().days_written, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_get_absent_entry() {
        let tmp = tempfile::tempdir().unwrap();
        let store = open_store(tmp.path()).await;
        assert_eq!(store.get(&station("06180"), date(2024, 1, 1)).await, None);
        assert_eq!(store.stats.snapshot().corrupt_entries, 0);
    }

    #[tokio::test]
    async fn test_put_overwrites_wholesale() -> Result<(), CacheError> {
        let tmp = tempfile::tempdir().unwrap();
        let store = open_store(tmp.path()).await;
        let day = date(2024, 1, 1);
        let first = vec![ObservationRecord::from(json!({"a": 1})), ObservationRecord::from(json!({"a": 2}))];
        let second = vec![ObservationRecord::from(json!({"b": 1}))];

        store.put(&station("06180"), day, &first).await?;
        store.put(&station("06180"), day, &second).await?;

        assert_eq!(store.get(&station("06180"), day).await, Some(second));
        Ok(())
    }

    #[tokio::test]
    async fn test_corrupt_entry_is_absent_and_removed() {
        let tmp = tempfile::tempdir().unwrap();
        let store = open_store(tmp.path()).await;
        let path = tmp.path().join("06180_20240101.json");
        std::fs::write(&path, b"[{\"a\": 1},").unwrap();

        assert_eq!(store.get(&station("06180"), date(2024, 1, 1)).await, None);
        assert!(!path.exists());
        assert_eq!(store.stats.snapshot().corrupt_entries, 1);
    }

    #[tokio::test]
    async fn test_wrong_shape_counts_as_corrupt() {
        let tmp = tempfile::tempdir().unwrap();
        let store = open_store(tmp.path()).await;
        let path = tmp.path().join("06180_20240101.json");
        std::fs::write(&path, br#"{"features": []}"#).unwrap();

        assert_eq!(store.get(&station("06180"), date(2024, 1, 1)).await, None);
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_list_days_filters_station_and_junk() -> Result<(), CacheError> {
        let tmp = tempfile::tempdir().unwrap();
        let store = open_store(tmp.path()).await;
        store.put(&station("06180"), date(2024, 1, 2), &[]).await?;
        store.put(&station("06180"), date(2024, 1, 1), &[]).await?;
        store.put(&station("06181"), date(2024, 1, 3), &[]).await?;
        for junk in ["06180_garbage.json", "06180_20240104.tmp", "notes.txt", "06180_20240101_20240102.json"] {
            std::fs::write(tmp.path().join(junk), b"[]").unwrap();
        }

        let days: Vec<_> = store.list_days(&station("06180")).await?.into_iter().collect();
        assert_eq!(days, vec![date(2024, 1, 1), date(2024, 1, 2)]);
        Ok(())
    }

    #[tokio::test]
    async fn test_contains_and_recreated_dir() -> Result<(), CacheError> {
        let tmp = tempfile::tempdir().unwrap();
        let dir = tmp.path().join("cache");
        let store = open_store(&dir).await;
        std::fs::remove_dir(&dir).unwrap();

        assert!(!store.contains(&station("06180"), date(2024, 1, 1)).await);
        assert!(store.list_days(&station("06180")).await?.is_empty());

        store.put(&station("06180"), date(2024, 1, 1), &[]).await?;
        assert!(store.contains(&station("06180"), date(2024, 1, 1)).await);
        Ok(())
    }
}
