use chrono::NaiveDate;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{ArchiveError, Result};
use crate::models::{DailyStatistic, DailyWeatherRecord};

/// Daily records keyed by location name, in the order locations were added.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WeatherDataset {
    series: IndexMap<String, Vec<DailyWeatherRecord>>,
}

impl WeatherDataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the series of a location.
    pub fn insert(&mut self, name: impl Into<String>, records: Vec<DailyWeatherRecord>) {
        self.series.insert(name.into(), records);
    }

    /// Insert an empty series so the location key is still present.
    pub fn insert_placeholder(&mut self, name: impl Into<String>) {
        self.series.insert(name.into(), Vec::new());
    }

    pub fn get(&self, name: &str) -> Option<&[DailyWeatherRecord]> {
        self.series.get(name).map(Vec::as_slice)
    }

    pub fn require(&self, name: &str) -> Result<&[DailyWeatherRecord]> {
        self.get(name).ok_or_else(|| ArchiveError::LocationNotFound {
            name: name.to_string(),
        })
    }

    pub fn contains(&self, name: &str) -> bool {
        self.series.contains_key(name)
    }

    pub fn location_names(&self) -> impl Iterator<Item = &str> {
        self.series.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[DailyWeatherRecord])> {
        self.series.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.series.len()
    }

    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }

    pub fn total_records(&self) -> usize {
        self.series.values().map(Vec::len).sum()
    }

    /// True when at least one location carries at least one record.
    pub fn has_records(&self) -> bool {
        self.series.values().any(|records| !records.is_empty())
    }

    /// Date/value pairs of one statistic for a location, skipping missing values.
    pub fn series(&self, name: &str, statistic: DailyStatistic) -> Result<Vec<(NaiveDate, f64)>> {
        Ok(self
            .require(name)?
            .iter()
            .filter_map(|r| r.value(statistic).map(|v| (r.date, v)))
            .collect())
    }

    /// Earliest and latest date over all locations.
    pub fn date_span(&self) -> Option<(NaiveDate, NaiveDate)> {
        self.series
            .values()
            .flatten()
            .map(|r| r.date)
            .fold(None, |span, date| match span {
                None => Some((date, date)),
                Some((first, last)) => Some((first.min(date), last.max(date))),
            })
    }
}
