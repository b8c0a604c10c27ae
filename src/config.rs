//! Runtime configuration, built once at startup and handed to the client.

use crate::error::ConfigError;
use bon::Builder;
use chrono::NaiveDate;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_BASE_URL: &str = "https://dmigw.govcloud.dk/v2/metObs/collections/observation/items";
pub const DEFAULT_CACHE_DIR: &str = "cache";
/// Enough to hold a full day of 10-minute observations for every parameter a station reports.
pub const DEFAULT_RECORD_LIMIT: u32 = 100_000;
pub const DEFAULT_FILL_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(20);
pub const DEFAULT_EPOCH: NaiveDate = match NaiveDate::from_ymd_opt(2024, 1, 1) {
    Some(date) => date,
    None => panic!("invalid default epoch"),
};

const TOKEN_VAR: &str = "DMI_TOKEN";
const CACHE_DIR_VAR: &str = "CACHE_DIR";
const BASE_URL_VAR: &str = "DMI_BASE_URL";
const FILL_INTERVAL_VAR: &str = "FILL_INTERVAL_HOURS";

/// Settings for the observation cache, its fetcher and the background filler.
///
/// # Examples
///
/// ```
/// use metobs_cache::Config;
/// use std::time::Duration;
///
/// let config = Config::builder()
///     .token("my-api-key")
///     .cache_dir("/tmp/metobs")
///     .fill_interval(Duration::from_secs(3600))
///     .build();
/// assert_eq!(config.record_limit, 100_000);
/// ```
#[derive(Debug, Clone, Builder)]
pub struct Config {
    /// API credential sent with every request. Not validated locally.
    #[builder(into, default)]
    pub token: String,
    #[builder(into, default = PathBuf::from(DEFAULT_CACHE_DIR))]
    pub cache_dir: PathBuf,
    #[builder(into, default = DEFAULT_BASE_URL.to_string())]
    pub base_url: String,
    #[builder(default = DEFAULT_RECORD_LIMIT)]
    pub record_limit: u32,
    /// First day the background filler keeps cached.
    #[builder(default = DEFAULT_EPOCH)]
    pub epoch: NaiveDate,
    /// Pause between two scans of the background filler.
    #[builder(default = DEFAULT_FILL_INTERVAL)]
    pub fill_interval: Duration,
    #[builder(default = DEFAULT_REQUEST_TIMEOUT)]
    pub request_timeout: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Config::builder().build()
    }
}

impl Config {
    /// Reads `DMI_TOKEN`, `CACHE_DIR`, `DMI_BASE_URL` and `FILL_INTERVAL_HOURS`
    /// from the environment, after loading a `.env` file if one exists.
    /// Unset or empty variables fall back to the defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        let fill_interval = var(FILL_INTERVAL_VAR)
            .map(|raw| parse_interval_hours(&raw))
            .transpose()?;

        Ok(Config::builder()
            .maybe_token(var(TOKEN_VAR))
            .maybe_cache_dir(var(CACHE_DIR_VAR))
            .maybe_base_url(var(BASE_URL_VAR))
            .maybe_fill_interval(fill_interval)
            .build())
    }
}

fn parse_interval_hours(raw: &str) -> Result<Duration, ConfigError> {
    let hours: u64 = raw.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: FILL_INTERVAL_VAR,
        value: raw.to_string(),
        reason: "expected a whole number of hours",
    })?;
    if hours == 0 {
        return Err(ConfigError::InvalidValue {
            key: FILL_INTERVAL_VAR,
            value: raw.to_string(),
            reason: "interval must be at least one hour",
        });
    }
    Ok(Duration::from_secs(hours * 60 * 60))
}
