use crate::error::{ArchiveError, Result};
use crate::models::{DailyStatistic, DailyWeatherRecord, WeatherDataset};
use chrono::NaiveDate;

#[derive(Debug, Clone, PartialEq)]
pub struct StatisticSummary {
    pub statistic: DailyStatistic,
    pub min: f64,
    pub max: f64,
    pub mean: f64,
    pub min_date: NaiveDate,
    pub max_date: NaiveDate,
    pub missing: usize,
}

#[derive(Debug, Clone)]
pub struct LocationSummary {
    pub name: String,
    pub records: usize,
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    pub statistics: Vec<StatisticSummary>,
}

#[derive(Debug)]
pub struct DatasetStatistics {
    pub total_records: usize,
    pub date_range: Option<(NaiveDate, NaiveDate)>,
    pub locations: Vec<LocationSummary>,
}

pub struct DatasetAnalyzer;

impl DatasetAnalyzer {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze(&self, dataset: &WeatherDataset) -> Result<DatasetStatistics> {
        if dataset.is_empty() {
            return Err(ArchiveError::EmptyDataset("analyze".to_string()));
        }

        let locations = dataset
            .iter()
            .map(|(name, records)| self.summarize_location(name, records))
            .collect();

        Ok(DatasetStatistics {
            total_records: dataset.total_records(),
            date_range: dataset.date_span(),
            locations,
        })
    }

    fn summarize_location(&self, name: &str, records: &[DailyWeatherRecord]) -> LocationSummary {
        let date_range = match (records.first(), records.last()) {
            (Some(first), Some(last)) => Some((first.date, last.date)),
            _ => None,
        };

        let statistics = DailyStatistic::ALL
            .iter()
            .filter_map(|s| summarize_statistic(*s, records))
            .collect();

        LocationSummary {
            name: name.to_string(),
            records: records.len(),
            date_range,
            statistics,
        }
    }
}

/// Extremes and mean of one statistic; `None` when every value is missing.
fn summarize_statistic(
    statistic: DailyStatistic,
    records: &[DailyWeatherRecord],
) -> Option<StatisticSummary> {
    let mut summary: Option<StatisticSummary> = None;
    let mut sum = 0.0;
    let mut count = 0usize;
    let mut missing = 0usize;

    for record in records {
        let Some(value) = record.value(statistic) else {
            missing += 1;
            continue;
        };
        sum += value;
        count += 1;

        match summary.as_mut() {
            None => {
                summary = Some(StatisticSummary {
                    statistic,
                    min: value,
                    max: value,
                    mean: 0.0,
                    min_date: record.date,
                    max_date: record.date,
                    missing: 0,
                })
            }
            Some(s) => {
                if value < s.min {
                    s.min = value;
                    s.min_date = record.date;
                }
                if value > s.max {
                    s.max = value;
                    s.max_date = record.date;
                }
            }
        }
    }

    summary.map(|mut s| {
        s.mean = sum / count as f64;
        s.missing = missing;
        s
    })
}

impl DatasetStatistics {
    pub fn summary(&self) -> String {
        let range = match self.date_range {
            Some((first, last)) => format!(
                "{} to {} ({} days)",
                first,
                last,
                (last - first).num_days() + 1
            ),
            None => "no records".to_string(),
        };

        format!(
            "Weather Parameters: Temperature (mean/max/min)\n\
            Locations: {}\n\
            Date Range: {}\n\
            Records: {} total",
            self.locations.len(),
            range,
            self.total_records
        )
    }

    pub fn detailed_summary(&self) -> String {
        let mut out = self.summary();
        out.push_str("\n\n--- Data for all locations ---");

        for location in &self.locations {
            out.push_str(&format!("\n\nData for {}:", location.name));

            match location.date_range {
                Some((first, last)) => out.push_str(&format!(
                    "\n  {} records from {} to {}",
                    location.records, first, last
                )),
                None => {
                    out.push_str("\n  No records");
                    continue;
                }
            }

            for s in &location.statistics {
                out.push_str(&format!(
                    "\n  {:<8} min {:>6.1}°C ({})  max {:>6.1}°C ({})  mean {:>6.1}°C",
                    s.statistic.label(),
                    s.min,
                    s.min_date,
                    s.max,
                    s.max_date,
                    s.mean
                ));
                if s.missing > 0 {
                    out.push_str(&format!("  [{} missing]", s.missing));
                }
            }
        }

        out
    }
}

impl Default for DatasetAnalyzer {
    fn default() -> Self {
        Self::new()
    }
}
