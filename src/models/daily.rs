use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{ArchiveError, Result};
use crate::utils::constants::{MAX_PLAUSIBLE_TEMP, MIN_PLAUSIBLE_TEMP};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DailyStatistic {
    Mean,
    Max,
    Min,
}

impl DailyStatistic {
    /// Request order, which is also the field order of a serialized record.
    pub const ALL: [DailyStatistic; 3] = [
        DailyStatistic::Mean,
        DailyStatistic::Max,
        DailyStatistic::Min,
    ];

    /// Variable name used by the archive API and as JSON field name
    pub fn api_name(&self) -> &'static str {
        match self {
            DailyStatistic::Mean => "temperature_2m_mean",
            DailyStatistic::Max => "temperature_2m_max",
            DailyStatistic::Min => "temperature_2m_min",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            DailyStatistic::Mean => "Mean",
            DailyStatistic::Max => "Maximum",
            DailyStatistic::Min => "Minimum",
        }
    }

    /// Comma separated list for the `daily` query parameter
    pub fn query_value() -> String {
        Self::ALL
            .iter()
            .map(|s| s.api_name())
            .collect::<Vec<_>>()
            .join(",")
    }
}

impl fmt::Display for DailyStatistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.api_name())
    }
}

impl FromStr for DailyStatistic {
    type Err = ArchiveError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "mean" | "avg" | "temperature_2m_mean" => Ok(DailyStatistic::Mean),
            "max" | "temperature_2m_max" => Ok(DailyStatistic::Max),
            "min" | "temperature_2m_min" => Ok(DailyStatistic::Min),
            _ => Err(ArchiveError::InvalidFormat(format!(
                "Unknown daily statistic: '{}'",
                s
            ))),
        }
    }
}

/// One calendar day of temperature statistics for a location.
///
/// Values are `None` when the archive has no measurement for the day; they
/// serialize as `null` so every record keeps the same set of fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyWeatherRecord {
    #[serde(with = "date_format")]
    pub date: NaiveDate,
    pub temperature_2m_mean: Option<f64>,
    pub temperature_2m_max: Option<f64>,
    pub temperature_2m_min: Option<f64>,
}

impl DailyWeatherRecord {
    pub fn new(date: NaiveDate, mean: Option<f64>, max: Option<f64>, min: Option<f64>) -> Self {
        Self {
            date,
            temperature_2m_mean: mean,
            temperature_2m_max: max,
            temperature_2m_min: min,
        }
    }

    pub fn value(&self, statistic: DailyStatistic) -> Option<f64> {
        match statistic {
            DailyStatistic::Mean => self.temperature_2m_mean,
            DailyStatistic::Max => self.temperature_2m_max,
            DailyStatistic::Min => self.temperature_2m_min,
        }
    }

    pub fn is_complete(&self) -> bool {
        DailyStatistic::ALL.iter().all(|s| self.value(*s).is_some())
    }

    pub fn missing_count(&self) -> usize {
        DailyStatistic::ALL
            .iter()
            .filter(|s| self.value(**s).is_none())
            .count()
    }

    /// First present value that is not finite or outside the plausible range.
    pub fn implausible_value(&self) -> Option<(DailyStatistic, f64)> {
        DailyStatistic::ALL.iter().find_map(|s| {
            self.value(*s)
                .filter(|v| !v.is_finite() || !(MIN_PLAUSIBLE_TEMP..=MAX_PLAUSIBLE_TEMP).contains(v))
                .map(|v| (*s, v))
        })
    }

    /// Check that present values are finite, plausible and ordered
    /// `min <= mean <= max` within `tolerance`.
    pub fn validate_relationships(&self, tolerance: f64) -> Result<()> {
        if let Some((statistic, value)) = self.implausible_value() {
            return Err(ArchiveError::InvalidFormat(format!(
                "{} {} on {} is outside plausible range [{}, {}]",
                statistic, value, self.date, MIN_PLAUSIBLE_TEMP, MAX_PLAUSIBLE_TEMP
            )));
        }

        if let (Some(min), Some(mean)) = (self.temperature_2m_min, self.temperature_2m_mean) {
            if min > mean + tolerance {
                return Err(ArchiveError::InvalidFormat(format!(
                    "Min temperature {} > Mean temperature {} on {}",
                    min, mean, self.date
                )));
            }
        }

        if let (Some(mean), Some(max)) = (self.temperature_2m_mean, self.temperature_2m_max) {
            if mean > max + tolerance {
                return Err(ArchiveError::InvalidFormat(format!(
                    "Mean temperature {} > Max temperature {} on {}",
                    mean, max, self.date
                )));
            }
        }

        Ok(())
    }
}

/// Dates travel as plain `YYYY-MM-DD` strings.
mod date_format {
    use chrono::NaiveDate;
    use serde::{self, Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%Y-%m-%d";

    pub fn serialize<S>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&date.format(FORMAT).to_string())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<NaiveDate, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        NaiveDate::parse_from_str(&s, FORMAT).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, 15).unwrap()
    }

    #[test]
    fn test_statistic_parsing() {
        assert_eq!("mean".parse::<DailyStatistic>().unwrap(), DailyStatistic::Mean);
        assert_eq!("MAX".parse::<DailyStatistic>().unwrap(), DailyStatistic::Max);
        assert_eq!(
            "temperature_2m_min".parse::<DailyStatistic>().unwrap(),
            DailyStatistic::Min
        );
        assert!("median".parse::<DailyStatistic>().is_err());
    }

    #[test]
    fn test_query_value_order() {
        assert_eq!(
            DailyStatistic::query_value(),
            "temperature_2m_mean,temperature_2m_max,temperature_2m_min"
        );
    }

    #[test]
    fn test_record_serialization_shape() {
        let record = DailyWeatherRecord::new(date(), Some(31.2), Some(36.0), None);
        let json = serde_json::to_string(&record).unwrap();

        assert_eq!(
            json,
            r#"{"date":"2024-07-15","temperature_2m_mean":31.2,"temperature_2m_max":36.0,"temperature_2m_min":null}"#
        );
    }

    #[test]
    fn test_record_rejects_bad_date() {
        let json = r#"{"date":"2024-13-40","temperature_2m_mean":1.0,"temperature_2m_max":2.0,"temperature_2m_min":0.0}"#;
        assert!(serde_json::from_str::<DailyWeatherRecord>(json).is_err());
    }

    #[test]
    fn test_value_accessors() {
        let record = DailyWeatherRecord::new(date(), Some(30.0), Some(35.5), Some(26.0));

        assert_eq!(record.value(DailyStatistic::Mean), Some(30.0));
        assert_eq!(record.value(DailyStatistic::Max), Some(35.5));
        assert_eq!(record.value(DailyStatistic::Min), Some(26.0));
        assert!(record.is_complete());
        assert_eq!(record.missing_count(), 0);
    }

    #[test]
    fn test_missing_values() {
        let record = DailyWeatherRecord::new(date(), None, Some(35.5), None);

        assert!(!record.is_complete());
        assert_eq!(record.missing_count(), 2);
        assert!(record.validate_relationships(0.5).is_ok());
    }

    #[test]
    fn test_relationship_validation() {
        let valid = DailyWeatherRecord::new(date(), Some(20.0), Some(25.0), Some(15.0));
        assert!(valid.validate_relationships(0.5).is_ok());

        let inverted = DailyWeatherRecord::new(date(), Some(20.0), Some(18.0), Some(15.0));
        assert!(inverted.validate_relationships(0.5).is_err());

        let implausible = DailyWeatherRecord::new(date(), Some(120.0), None, None);
        assert!(implausible.validate_relationships(0.5).is_err());

        let not_finite = DailyWeatherRecord::new(date(), Some(f64::NAN), None, None);
        assert!(not_finite.validate_relationships(0.5).is_err());
    }
}
