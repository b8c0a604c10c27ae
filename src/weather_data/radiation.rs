//! Hourly projection of global radiation from raw observation records.

use crate::types::observation::{ObservationRecord, GLOBAL_RADIATION};
use crate::types::radiation::RadiationSeries;
use chrono::{DateTime, DurationRound, NaiveDateTime, TimeDelta, Utc};
use std::collections::BTreeMap;

/// Averages all `globalRadiation` values per UTC hour.
///
/// The result has one entry for every hour from the first to the last hour
/// holding a radiation record. Hours with no usable value, either because no
/// record fell into them or because none of their values parsed as a number,
/// are `NaN`. Records of other parameters and records whose timestamp does not
/// parse are ignored. Duplicate timestamps simply take part in the hour's mean.
pub fn project_hourly(records: &[ObservationRecord]) -> RadiationSeries {
    let mut buckets: BTreeMap<NaiveDateTime, (f64, u32)> = BTreeMap::new();

    for record in records {
        if record.parameter_id() != Some(GLOBAL_RADIATION) {
            continue;
        }
        let Some(hour) = record.observed().and_then(hour_start) else {
            continue;
        };
        let bucket = buckets.entry(hour).or_insert((0.0, 0));
        if let Some(value) = record.value() {
            bucket.0 += value;
            bucket.1 += 1;
        }
    }

    let (Some(&first), Some(&last)) = (buckets.keys().next(), buckets.keys().next_back()) else {
        return RadiationSeries::default();
    };

    let mut points = Vec::with_capacity(buckets.len());
    let mut hour = first;
    while hour <= last {
        let mean = match buckets.get(&hour) {
            Some(&(sum, count)) if count > 0 => sum / f64::from(count),
            _ => f64::NAN,
        };
        points.push((hour, mean));
        hour += TimeDelta::hours(1);
    }
    RadiationSeries::from_sorted(points)
}

fn hour_start(observed: DateTime<Utc>) -> Option<NaiveDateTime> {
    observed
        .duration_trunc(TimeDelta::hours(1))
        .ok()
        .map(|hour| hour.naive_utc())
}
