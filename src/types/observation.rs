//! The raw observation record as delivered by the provider.
//!
//! Records are GeoJSON features. Only three properties are ever interpreted
//! (`observed`, `parameterId` and `value`); everything else is carried through
//! the cache byte-for-byte equivalent.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Parameter identifier of the global radiation measurement.
pub const GLOBAL_RADIATION: &str = "globalRadiation";

/// A single provider observation, stored and returned verbatim.
///
/// # Examples
///
/// ```
/// use metobs_cache::ObservationRecord;
/// use serde_json::json;
///
/// let record = ObservationRecord::from(json!({
///     "properties": {
///         "observed": "2024-01-01T10:00:00Z",
///         "parameterId": "globalRadiation",
///         "value": 120.5
///     }
/// }));
/// assert_eq!(record.parameter_id(), Some("globalRadiation"));
/// assert_eq!(record.value(), Some(120.5));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ObservationRecord(Value);

impl ObservationRecord {
    fn property(&self, name: &str) -> Option<&Value> {
        self.0.get("properties")?.get(name)
    }

    /// Whether the record carries an `observed` timestamp at all, parseable or not.
    pub fn has_observed(&self) -> bool {
        self.property("observed").is_some_and(|v| !v.is_null())
    }

    /// The observation timestamp. RFC 3339 strings are normalized to UTC; a
    /// timestamp without offset is taken to be UTC.
    pub fn observed(&self) -> Option<DateTime<Utc>> {
        let raw = self.property("observed")?.as_str()?;
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
            .iter()
            .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
            .map(|naive| naive.and_utc())
    }

    pub fn parameter_id(&self) -> Option<&str> {
        self.property("parameterId")?.as_str()
    }

    /// The numeric value, coercing numeric strings. Non-finite values count as missing.
    pub fn value(&self) -> Option<f64> {
        let value = match self.property("value")? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }?;
        value.is_finite().then_some(value)
    }

    pub fn as_json(&self) -> &Value {
        &self.0
    }

    pub fn into_json(self) -> Value {
        self.0
    }
}

impl From<Value> for ObservationRecord {
    fn from(value: Value) -> Self {
        Self(value)
    }
}
