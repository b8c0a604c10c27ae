use chrono::NaiveDateTime;
use polars::prelude::*;

/// Hourly mean global radiation, ordered by hour.
///
/// Timestamps are naive: they are the UTC wall-clock start of each hour with
/// the timezone stripped. The hours form a contiguous grid from the first to
/// the last observed hour; hours without any usable observation hold `NaN`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RadiationSeries {
    points: Vec<(NaiveDateTime, f64)>,
}

impl RadiationSeries {
    pub(crate) fn from_sorted(points: Vec<(NaiveDateTime, f64)>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[(NaiveDateTime, f64)] {
        &self.points
    }

    pub fn values(&self) -> Vec<f64> {
        self.points.iter().map(|(_, value)| *value).collect()
    }

    pub fn timestamps(&self) -> Vec<NaiveDateTime> {
        self.points.iter().map(|(hour, _)| *hour).collect()
    }

    /// Value for the hour starting at `hour`, or `None` outside the series.
    /// A gap inside the series is `Some(NaN)`.
    pub fn get(&self, hour: NaiveDateTime) -> Option<f64> {
        self.points
            .binary_search_by_key(&hour, |(h, _)| *h)
            .ok()
            .map(|idx| self.points[idx].1)
    }

    /// Converts the series into a two-column `DataFrame` (`time`, `value`)
    /// with a timezone-less millisecond `Datetime` index column, the shape the
    /// PV production model consumes. `NaN` gaps become nulls in `value`.
    pub fn to_frame(&self) -> PolarsResult<DataFrame> {
        let millis: Vec<i64> = self
            .points
            .iter()
            .map(|(hour, _)| hour.and_utc().timestamp_millis())
            .collect();
        let time = Series::new("time".into(), millis)
            .cast(&DataType::Datetime(TimeUnit::Milliseconds, None))?;
        let values: Vec<Option<f64>> = self
            .points
            .iter()
            .map(|(_, value)| (!value.is_nan()).then_some(*value))
            .collect();
        let value = Series::new("value".into(), values);

        DataFrame::new(vec![time.into(), value.into()])
    }
}

impl IntoIterator for RadiationSeries {
    type Item = (NaiveDateTime, f64);
    type IntoIter = std::vec::IntoIter<(NaiveDateTime, f64)>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.into_iter()
    }
}
