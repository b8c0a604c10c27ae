//! File naming for cache entries: `{station}_{YYYYMMDD}.json`.

use crate::types::station::StationId;
use chrono::NaiveDate;

const DAY_FORMAT: &str = "%Y%m%d";
const EXTENSION: &str = ".json";

pub(crate) fn file_name(station: &StationId, day: NaiveDate) -> String {
    format!("{}_{}{}", station, day.format(DAY_FORMAT), EXTENSION)
}

/// Decodes a cache file name back into its station and day.
///
/// Splits on the last `_` so station ids that contain underscores survive.
/// Anything that does not look like a cache entry yields `None`.
pub(crate) fn parse_file_name(name: &str) -> Option<(&str, NaiveDate)> {
    let stem = name.strip_suffix(EXTENSION)?;
    let (station, day) = stem.rsplit_once('_')?;
    if station.is_empty() || day.len() != 8 {
        return None;
    }
    let day = NaiveDate::parse_from_str(day, DAY_FORMAT).ok()?;
    Some((station, day))
}
