use serde::Deserialize;
use std::collections::HashMap;

use crate::models::DailyStatistic;

/// Archive API JSON document, as requested with `timeformat=unixtime`.
#[derive(Debug, Clone, Deserialize)]
pub struct ArchiveResponse {
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub elevation: Option<f64>,
    #[serde(default)]
    pub utc_offset_seconds: i64,
    #[serde(default)]
    pub timezone: String,
    #[serde(default)]
    pub timezone_abbreviation: String,
    #[serde(default)]
    pub daily_units: HashMap<String, String>,
    pub daily: Option<DailyBlock>,
}

/// Column-oriented daily series; `time` holds seconds since the Unix epoch.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct DailyBlock {
    pub time: Vec<i64>,
    #[serde(default)]
    pub temperature_2m_mean: Option<Vec<Option<f64>>>,
    #[serde(default)]
    pub temperature_2m_max: Option<Vec<Option<f64>>>,
    #[serde(default)]
    pub temperature_2m_min: Option<Vec<Option<f64>>>,
}

impl DailyBlock {
    pub fn values(&self, statistic: DailyStatistic) -> Option<&[Option<f64>]> {
        match statistic {
            DailyStatistic::Mean => self.temperature_2m_mean.as_deref(),
            DailyStatistic::Max => self.temperature_2m_max.as_deref(),
            DailyStatistic::Min => self.temperature_2m_min.as_deref(),
        }
    }
}

/// Error body returned with 4xx statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub error: bool,
    #[serde(default)]
    pub reason: String,
}

impl ArchiveResponse {
    pub fn unit(&self, statistic: DailyStatistic) -> Option<&str> {
        self.daily_units.get(statistic.api_name()).map(String::as_str)
    }

    pub fn summary(&self) -> String {
        format!(
            "Coordinates: {}°N {}°E, Elevation: {} m asl, Timezone: {} {} (offset to GMT+0: {} s)",
            self.latitude,
            self.longitude,
            self.elevation
                .map(|e| e.to_string())
                .unwrap_or_else(|| "unknown".to_string()),
            self.timezone,
            self.timezone_abbreviation,
            self.utc_offset_seconds
        )
    }
}
