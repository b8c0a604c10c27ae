//! Range queries over the day cache. Never touches the network.

use crate::cache::store::CacheStore;
use crate::types::day::days_inclusive;
use crate::types::into_utc::IntoUtcDateTime;
use crate::types::observation::ObservationRecord;
use crate::types::radiation::RadiationSeries;
use crate::types::station::StationId;
use crate::weather_data::radiation::project_hourly;
use chrono::{DateTime, NaiveDate, Utc};
use log::{debug, warn};

#[derive(Debug, Clone)]
pub struct RangeReader {
    store: CacheStore,
}

impl RangeReader {
    pub fn new(store: CacheStore) -> Self {
        Self { store }
    }

    /// Returns every cached record for `station` observed within
    /// `[start, end]`. The arguments may be given in either order.
    ///
    /// Fails closed: if any UTC day touched by the range has no usable cache
    /// entry, the whole call returns `None` rather than a partial result.
    /// Records without a parseable `observed` timestamp are dropped, unless
    /// no record in the range carries `observed` at all, in which case the
    /// records cannot be windowed and are all returned.
    pub async fn fetch_range(
        &self,
        station: &StationId,
        start: impl IntoUtcDateTime,
        end: impl IntoUtcDateTime,
    ) -> Option<Vec<ObservationRecord>> {
        let (start, end) = ordered(start.into_utc(), end.into_utc());

        let mut records = Vec::new();
        for day in days_inclusive(start.date_naive(), end.date_naive()) {
            let Some(day_records) = self.store.get(station, day).await else {
                warn!(
                    "Missing cache entry {} for station {}; refusing range {} to {}",
                    self.store.path_for(station, day).display(),
                    station,
                    start,
                    end
                );
                return None;
            };
            records.extend(day_records);
        }

        if records.iter().any(ObservationRecord::has_observed) {
            records.retain(|record| within(record, start, end));
        }
        debug!(
            "Read {} records for station {} from {} to {}",
            records.len(),
            station,
            start,
            end
        );
        Some(records)
    }

    /// Hourly mean global radiation for `station` over `[start, end]`.
    ///
    /// `None` only when [`fetch_range`](Self::fetch_range) fails; a range with
    /// no radiation observations yields an empty series.
    pub async fn project_hourly_radiation(
        &self,
        station: &StationId,
        start: impl IntoUtcDateTime,
        end: impl IntoUtcDateTime,
    ) -> Option<RadiationSeries> {
        let records = self.fetch_range(station, start, end).await?;
        Some(project_hourly(&records))
    }

    /// Days with a cache entry for `station`, ascending. A cache directory
    /// that cannot be listed is reported as having nothing available.
    pub async fn list_available_days(&self, station: &StationId) -> Vec<NaiveDate> {
        match self.store.list_days(station).await {
            Ok(days) => days.into_iter().collect(),
            Err(e) => {
                warn!("Could not list cached days for station {}: {}", station, e);
                Vec::new()
            }
        }
    }

    /// Days between `first` and `last` (inclusive, either order) that have no
    /// cache entry for `station`, ascending.
    ///
    /// Only the presence of each day file is checked. A corrupt file counts as
    /// cached until a read through [`fetch_range`](Self::fetch_range) discards
    /// it, after which the day is reported missing again.
    pub async fn missing_days(
        &self,
        station: &StationId,
        first: NaiveDate,
        last: NaiveDate,
    ) -> Vec<NaiveDate> {
        let (first, last) = ordered(first, last);
        let mut missing = Vec::new();
        for day in days_inclusive(first, last) {
            if !self.store.contains(station, day).await {
                missing.push(day);
            }
        }
        missing
    }
}

fn ordered<T: PartialOrd>(a: T, b: T) -> (T, T) {
    if a > b {
        (b, a)
    } else {
        (a, b)
    }
}

fn within(record: &ObservationRecord, start: DateTime<Utc>, end: DateTime<Utc>) -> bool {
    record
        .observed()
        .is_some_and(|observed| start <= observed && observed <= end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::stats::CacheStats;
    use chrono::{NaiveDateTime, TimeZone};
    use serde_json::json;
    use std::path::Path;
    use std::sync::Arc;

    fn station() -> StationId {
        StationId::new("S").unwrap()
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32) -> NaiveDateTime {
        date(y, m, d).and_hms_opt(h, 0, 0).unwrap()
    }

    fn radiation(observed: &str, value: f64) -> ObservationRecord {
        ObservationRecord::from(json!({
            "properties": {
                "observed": observed,
                "parameterId": "globalRadiation",
                "value": value
            }
        }))
    }

    /// A full day of hourly radiation records for 2024-01-01.
    fn first_of_january() -> Vec<ObservationRecord> {
        (0..24)
            .map(|h| radiation(&format!("2024-01-01T{h:02}:00:00Z"), f64::from(h)))
            .collect()
    }

    async fn reader_with(dir: &Path, days: &[(NaiveDate, Vec<ObservationRecord>)]) -> RangeReader {
        let store = CacheStore::open(dir, Arc::new(CacheStats::default()))
            .await
            .unwrap();
        for (day, records) in days {
            store.put(&station(), *day, records).await.unwrap();
        }
        RangeReader::new(store)
    }

    #[tokio::test]
    async fn test_single_cached_day_is_windowed() {
        let tmp = tempfile::tempdir().unwrap();
        let reader = reader_with(tmp.path(), &[(date(2024, 1, 1), first_of_january())]).await;

        let records = reader
            .fetch_range(&station(), at(2024, 1, 1, 6), at(2024, 1, 1, 8))
            .await
            .unwrap();
        let values: Vec<_> = records.iter().filter_map(|r| r.value()).collect();
        assert_eq!(values, vec![6.0, 7.0, 8.0]);

        let whole_day = reader
            .fetch_range(&station(), at(2024, 1, 1, 0), at(2024, 1, 1, 23))
            .await
            .unwrap();
        assert_eq!(whole_day.len(), 24);
    }

    #[tokio::test]
    async fn test_missing_day_fails_closed() {
        let tmp = tempfile::tempdir().unwrap();
        let reader = reader_with(
            tmp.path(),
            &[
                (date(2024, 1, 1), first_of_january()),
                (date(2024, 1, 3), vec![]),
            ],
        )
        .await;

        assert!(reader
            .fetch_range(&station(), at(2024, 1, 1, 0), at(2024, 1, 2, 12))
            .await
            .is_none());
        assert!(reader
            .fetch_range(&station(), at(2024, 1, 1, 0), at(2024, 1, 3, 12))
            .await
            .is_none());
        assert!(reader
            .project_hourly_radiation(&station(), at(2024, 1, 1, 0), at(2024, 1, 2, 0))
            .await
            .is_none());
    }

    #[tokio::test]
    async fn test_reversed_arguments_are_equivalent() {
        let tmp = tempfile::tempdir().unwrap();
        let reader = reader_with(tmp.path(), &[(date(2024, 1, 1), first_of_january())]).await;

        let forward = reader
            .fetch_range(&station(), at(2024, 1, 1, 3), at(2024, 1, 1, 9))
            .await;
        let reversed = reader
            .fetch_range(&station(), at(2024, 1, 1, 9), at(2024, 1, 1, 3))
            .await;
        assert!(forward.is_some());
        assert_eq!(forward, reversed);
    }

    #[tokio::test]
    async fn test_corrupt_day_fails_closed_and_is_removed() {
        let tmp = tempfile::tempdir().unwrap();
        let reader = reader_with(tmp.path(), &[(date(2024, 1, 1), first_of_january())]).await;
        let corrupt = tmp.path().join("S_20240102.json");
        std::fs::write(&corrupt, b"{{{").unwrap();

        assert!(reader
            .fetch_range(&station(), at(2024, 1, 1, 0), at(2024, 1, 2, 1))
            .await
            .is_none());
        assert!(!corrupt.exists());
        assert_eq!(reader.list_available_days(&station()).await, vec![date(2024, 1, 1)]);
    }

    #[tokio::test]
    async fn test_records_without_timestamp_are_dropped_when_others_have_one() {
        let tmp = tempfile::tempdir().unwrap();
        let reader = reader_with(
            tmp.path(),
            &[(
                date(2024, 1, 1),
                vec![
                    ObservationRecord::from(json!({"a": 1})),
                    radiation("garbage", 1.0),
                    radiation("2024-01-01T05:00:00Z", 2.0),
                    radiation("2024-01-01T23:30:00Z", 3.0),
                ],
            )],
        )
        .await;

        let records = reader
            .fetch_range(&station(), at(2024, 1, 1, 4), at(2024, 1, 1, 6))
            .await
            .unwrap();
        assert_eq!(records, vec![radiation("2024-01-01T05:00:00Z", 2.0)]);
    }

    #[tokio::test]
    async fn test_records_pass_through_when_none_has_timestamp() {
        let tmp = tempfile::tempdir().unwrap();
        let day = vec![
            ObservationRecord::from(json!({"a": 1})),
            ObservationRecord::from(json!({"properties": {"value": 4.0}})),
        ];
        let reader = reader_with(tmp.path(), &[(date(2024, 1, 1), day.clone())]).await;

        let records = reader
            .fetch_range(&station(), at(2024, 1, 1, 4), at(2024, 1, 1, 6))
            .await
            .unwrap();
        assert_eq!(records, day);
    }

    #[tokio::test]
    async fn test_range_spanning_days_concatenates() {
        let tmp = tempfile::tempdir().unwrap();
        let second_day = vec![
            radiation("2024-01-02T00:00:00Z", 500.0),
            radiation("2024-01-02T05:00:00Z", 900.0),
        ];
        let reader = reader_with(
            tmp.path(),
            &[(date(2024, 1, 1), first_of_january()), (date(2024, 1, 2), second_day)],
        )
        .await;

        let start = Utc.with_ymd_and_hms(2024, 1, 1, 22, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 1, 2, 1, 0, 0).unwrap();
        let values: Vec<_> = reader
            .fetch_range(&station(), start, end)
            .await
            .unwrap()
            .iter()
            .filter_map(|r| r.value())
            .collect();
        assert_eq!(values, vec![22.0, 23.0, 500.0]);
    }

    #[tokio::test]
    async fn test_projects_hourly_radiation() {
        let tmp = tempfile::tempdir().unwrap();
        let day = vec![
            radiation("2024-01-01T00:00:00Z", 100.0),
            radiation("2024-01-01T01:00:00Z", 200.0),
        ];
        let reader = reader_with(tmp.path(), &[(date(2024, 1, 1), day)]).await;

        let series = reader
            .project_hourly_radiation(&station(), at(2024, 1, 1, 0), at(2024, 1, 1, 23))
            .await
            .unwrap();
        assert_eq!(series.points(), &[(at(2024, 1, 1, 0), 100.0), (at(2024, 1, 1, 1), 200.0)]);
    }

    #[tokio::test]
    async fn test_empty_projection_is_not_a_failure() {
        let tmp = tempfile::tempdir().unwrap();
        let reader = reader_with(tmp.path(), &[(date(2024, 1, 1), vec![])]).await;

        let series = reader
            .project_hourly_radiation(&station(), at(2024, 1, 1, 0), at(2024, 1, 1, 23))
            .await;
        assert_eq!(series, Some(RadiationSeries::default()));
    }

    #[tokio::test]
    async fn test_missing_days_lists_gaps() {
        let tmp = tempfile::tempdir().unwrap();
        let reader = reader_with(
            tmp.path(),
            &[(date(2024, 1, 1), vec![]), (date(2024, 1, 3), vec![])],
        )
        .await;

        assert_eq!(
            reader.missing_days(&station(), date(2024, 1, 4), date(2024, 1, 1)).await,
            vec![date(2024, 1, 2), date(2024, 1, 4)]
        );
        assert_eq!(
            reader.list_available_days(&station()).await,
            vec![date(2024, 1, 1), date(2024, 1, 3)]
        );
    }

    #[tokio::test]
    async fn test_corrupt_day_counts_as_present_until_read() {
        let tmp = tempfile::tempdir().unwrap();
        let reader = reader_with(tmp.path(), &[(date(2024, 1, 1), vec![])]).await;
        std::fs::write(tmp.path().join("S_20240102.json"), b"not json").unwrap();

        assert!(reader
            .missing_days(&station(), date(2024, 1, 1), date(2024, 1, 2))
            .await
            .is_empty());

        assert!(reader
            .fetch_range(&station(), at(2024, 1, 2, 0), at(2024, 1, 2, 1))
            .await
            .is_none());
        assert_eq!(
            reader.missing_days(&station(), date(2024, 1, 1), date(2024, 1, 2)).await,
            vec![date(2024, 1, 2)]
        );
    }
}
