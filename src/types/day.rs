//! Calendar-day helpers. A day is the unit of caching, and every day here is
//! a UTC calendar day.

use chrono::{DateTime, Days, NaiveDate, TimeZone, Utc};

/// Returns the half-open window `[day 00:00, day+1 00:00)` in UTC.
///
/// Returns `None` only at the very end of chrono's representable range.
pub fn day_window(day: NaiveDate) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
    let start = Utc.from_utc_datetime(&day.and_hms_opt(0, 0, 0)?);
    let next = day.checked_add_days(Days::new(1))?;
    let end = Utc.from_utc_datetime(&next.and_hms_opt(0, 0, 0)?);
    Some((start, end))
}

/// Iterates every calendar day from `first` through `last`, both inclusive,
/// in ascending order. Yields nothing if `first > last`.
pub fn days_inclusive(first: NaiveDate, last: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    first
        .iter_days()
        .take_while(move |day| *day <= last)
}
