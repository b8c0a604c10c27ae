//! Identifier type for the weather station an observation belongs to.

use serde::{Deserialize, Serialize};
use std::fmt;

/// An opaque, provider-assigned weather station identifier (e.g. `"06180"`).
///
/// The identifier is used verbatim both in remote queries and in cache file
/// names. Apart from being non-empty, nothing about its format is assumed.
///
/// # Examples
///
/// ```
/// use metobs_cache::StationId;
///
/// let station = StationId::new("06180").unwrap();
/// assert_eq!(station.as_str(), "06180");
/// assert!(StationId::new("").is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StationId(String);

impl StationId {
    /// Creates a station identifier, returning `None` for an empty string.
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        if id.is_empty() {
            None
        } else {
            Some(Self(id))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for StationId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
