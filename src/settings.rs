use chrono::NaiveDate;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::client::RetryPolicy;
use crate::error::{ArchiveError, Result};
use crate::models::{validate_locations, Location};
use crate::utils::constants::*;

/// What to put in the dataset for a location whose fetch failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FailurePolicy {
    /// Insert an empty series under the location name
    #[default]
    Placeholder,
    /// Leave the location out of the dataset
    Omit,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_retries")]
    pub max_retries: u32,
    #[serde(default = "default_backoff_factor")]
    pub backoff_factor: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheSettings {
    #[serde(default = "default_cache_path")]
    pub path: PathBuf,
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Entry lifetime in seconds; absent or negative keeps entries forever
    #[serde(default)]
    pub expire_after_secs: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PeriodSettings {
    #[serde(default = "default_start_date")]
    pub start_date: NaiveDate,
    #[serde(default = "default_end_date")]
    pub end_date: NaiveDate,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSettings {
    #[serde(default = "default_dataset_path")]
    pub dataset_path: PathBuf,
    #[serde(default)]
    pub locations_path: Option<PathBuf>,
    #[serde(default = "default_chart_path")]
    pub chart_path: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub cache: CacheSettings,
    #[serde(default)]
    pub period: PeriodSettings,
    #[serde(default)]
    pub output: OutputSettings,
    #[serde(default)]
    pub failure_policy: FailurePolicy,
    #[serde(default = "Location::defaults")]
    pub locations: Vec<Location>,
}

impl Settings {
    /// Layer built-in defaults, an optional TOML file and `METEO_ARCHIVE__*`
    /// environment variables, then validate the result.
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = config_path {
            if !path.exists() {
                return Err(ArchiveError::Config(format!(
                    "Configuration file not found: {}",
                    path.display()
                )));
            }
            builder = builder.add_source(File::from(path).format(FileFormat::Toml));
        }

        builder = builder.add_source(
            Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true),
        );

        let settings: Settings = builder.build()?.try_deserialize()?;
        settings.validate()?;

        Ok(settings)
    }

    pub fn from_toml_str(toml: &str) -> Result<Self> {
        let settings: Settings = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()?
            .try_deserialize()?;
        settings.validate()?;

        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        if self.period.end_date < self.period.start_date {
            return Err(ArchiveError::Config(format!(
                "End date {} is before start date {}",
                self.period.end_date, self.period.start_date
            )));
        }

        if self.api.endpoint.trim().is_empty() {
            return Err(ArchiveError::Config("API endpoint is empty".to_string()));
        }

        if !self.api.backoff_factor.is_finite() || self.api.backoff_factor < 0.0 {
            return Err(ArchiveError::Config(format!(
                "Backoff factor must be a non-negative number, got {}",
                self.api.backoff_factor
            )));
        }

        validate_locations(&self.locations)
    }

    pub fn cache_expiry(&self) -> Option<Duration> {
        match self.cache.expire_after_secs {
            Some(secs) if secs >= 0 => Some(Duration::from_secs(secs as u64)),
            _ => None,
        }
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.api.max_retries,
            Duration::from_secs_f64(self.api.backoff_factor),
            Duration::from_secs_f64(DEFAULT_MAX_BACKOFF_SECS),
        )
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    /// Number of days in the requested period, both ends included.
    pub fn period_days(&self) -> i64 {
        (self.period.end_date - self.period.start_date).num_days() + 1
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api: ApiSettings::default(),
            cache: CacheSettings::default(),
            period: PeriodSettings::default(),
            output: OutputSettings::default(),
            failure_policy: FailurePolicy::default(),
            locations: Location::defaults(),
        }
    }
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout(),
            max_retries: default_max_retries(),
            backoff_factor: default_backoff_factor(),
        }
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            path: default_cache_path(),
            enabled: true,
            expire_after_secs: None,
        }
    }
}

impl Default for PeriodSettings {
    fn default() -> Self {
        Self {
            start_date: default_start_date(),
            end_date: default_end_date(),
        }
    }
}

impl Default for OutputSettings {
    fn default() -> Self {
        Self {
            dataset_path: default_dataset_path(),
            locations_path: None,
            chart_path: default_chart_path(),
        }
    }
}

fn default_endpoint() -> String {
    DEFAULT_ARCHIVE_ENDPOINT.to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_max_retries() -> u32 {
    DEFAULT_MAX_RETRIES
}

fn default_backoff_factor() -> f64 {
    DEFAULT_BACKOFF_FACTOR_SECS
}

fn default_cache_path() -> PathBuf {
    PathBuf::from(CACHE_FILE)
}

fn default_true() -> bool {
    true
}

fn default_start_date() -> NaiveDate {
    NaiveDate::parse_from_str(DEFAULT_START_DATE, DATE_FORMAT).unwrap_or(NaiveDate::MIN)
}

fn default_end_date() -> NaiveDate {
    NaiveDate::parse_from_str(DEFAULT_END_DATE, DATE_FORMAT).unwrap_or(NaiveDate::MIN)
}

fn default_dataset_path() -> PathBuf {
    PathBuf::from(DATASET_FILE)
}

fn default_chart_path() -> PathBuf {
    PathBuf::from(CHART_FILE)
}
