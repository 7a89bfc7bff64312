use crate::models::{DailyWeatherRecord, WeatherDataset};
use crate::utils::constants::TEMP_TOLERANCE;
use chrono::NaiveDate;
use indexmap::IndexMap;

#[derive(Debug, Clone)]
pub struct IntegrityReport {
    pub total_locations: usize,
    pub empty_locations: Vec<String>,
    pub total_records: usize,
    pub complete_records: usize,
    pub missing_values: usize,
    pub violations: Vec<Violation>,
    pub location_statistics: IndexMap<String, LocationStatistics>,
}

impl IntegrityReport {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Violation {
    pub location: String,
    pub date: Option<NaiveDate>,
    pub violation_type: ViolationType,
    pub details: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViolationType {
    DateOrder,
    OutOfPeriod,
    MissingDays,
    InvalidValue,
    StatisticOrder,
}

#[derive(Debug, Clone, Default)]
pub struct LocationStatistics {
    pub records: usize,
    pub complete_records: usize,
    pub missing_values: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
}

pub struct IntegrityChecker {
    period: Option<(NaiveDate, NaiveDate)>,
}

impl IntegrityChecker {
    pub fn new() -> Self {
        Self { period: None }
    }

    /// Also require the dates to fall inside and cover all of `start..=end`.
    pub fn with_period(mut self, start: NaiveDate, end: NaiveDate) -> Self {
        self.period = Some((start, end));
        self
    }

    pub fn check_integrity(&self, dataset: &WeatherDataset) -> IntegrityReport {
        let mut report = IntegrityReport {
            total_locations: dataset.len(),
            empty_locations: Vec::new(),
            total_records: dataset.total_records(),
            complete_records: 0,
            missing_values: 0,
            violations: Vec::new(),
            location_statistics: IndexMap::new(),
        };

        for (name, records) in dataset.iter() {
            let mut stats = LocationStatistics {
                records: records.len(),
                first_date: records.first().map(|r| r.date),
                last_date: records.last().map(|r| r.date),
                ..Default::default()
            };

            if records.is_empty() {
                report.empty_locations.push(name.to_string());
            }

            for record in records {
                if record.is_complete() {
                    stats.complete_records += 1;
                }
                stats.missing_values += record.missing_count();

                if let Err(e) = record.validate_relationships(TEMP_TOLERANCE) {
                    let violation_type = if record.implausible_value().is_some() {
                        ViolationType::InvalidValue
                    } else {
                        ViolationType::StatisticOrder
                    };
                    report.violations.push(Violation {
                        location: name.to_string(),
                        date: Some(record.date),
                        violation_type,
                        details: e.to_string(),
                    });
                }

                if let Some((start, end)) = self.period {
                    if record.date < start || record.date > end {
                        report.violations.push(Violation {
                            location: name.to_string(),
                            date: Some(record.date),
                            violation_type: ViolationType::OutOfPeriod,
                            details: format!("{} is outside {} to {}", record.date, start, end),
                        });
                    }
                }
            }

            self.check_date_sequence(name, records, &mut report);

            report.complete_records += stats.complete_records;
            report.missing_values += stats.missing_values;
            report.location_statistics.insert(name.to_string(), stats);
        }

        report
    }

    /// Dates must strictly increase and cover every day between first and
    /// last, or of the requested period when one is set.
    fn check_date_sequence(
        &self,
        name: &str,
        records: &[DailyWeatherRecord],
        report: &mut IntegrityReport,
    ) {
        let mut ordered = true;

        for window in records.windows(2) {
            let (prev, curr) = (&window[0], &window[1]);
            if curr.date <= prev.date {
                ordered = false;
                report.violations.push(Violation {
                    location: name.to_string(),
                    date: Some(curr.date),
                    violation_type: ViolationType::DateOrder,
                    details: format!("{} follows {}", curr.date, prev.date),
                });
            }
        }

        if !ordered {
            return;
        }

        if let (Some(first), Some(last)) = (records.first(), records.last()) {
            let expected = (last.date - first.date).num_days() as usize + 1;
            if expected != records.len() {
                report.violations.push(Violation {
                    location: name.to_string(),
                    date: None,
                    violation_type: ViolationType::MissingDays,
                    details: format!(
                        "{} records for {} days between {} and {}",
                        records.len(),
                        expected,
                        first.date,
                        last.date
                    ),
                });
            }

            if let Some((start, end)) = self.period {
                if first.date > start || last.date < end {
                    report.violations.push(Violation {
                        location: name.to_string(),
                        date: None,
                        violation_type: ViolationType::MissingDays,
                        details: format!(
                            "series covers {} to {}, requested {} to {}",
                            first.date, last.date, start, end
                        ),
                    });
                }
            }
        }
    }

    pub fn generate_summary(&self, report: &IntegrityReport) -> String {
        let mut summary = String::new();

        summary.push_str("=== Integrity Check Report ===\n");
        summary.push_str(&format!("Locations: {}\n", report.total_locations));
        summary.push_str(&format!("Total Records: {}\n", report.total_records));

        let complete_pct = if report.total_records > 0 {
            100.0 * report.complete_records as f64 / report.total_records as f64
        } else {
            0.0
        };
        summary.push_str(&format!(
            "Complete Records: {} ({:.1}%)\n",
            report.complete_records, complete_pct
        ));
        summary.push_str(&format!("Missing Values: {}\n", report.missing_values));

        if !report.empty_locations.is_empty() {
            summary.push_str(&format!(
                "Empty Series: {}\n",
                report.empty_locations.join(", ")
            ));
        }

        for (name, stats) in &report.location_statistics {
            match (stats.first_date, stats.last_date) {
                (Some(first), Some(last)) => summary.push_str(&format!(
                    "  {}: {} records, {} to {}\n",
                    name, stats.records, first, last
                )),
                _ => summary.push_str(&format!("  {}: no records\n", name)),
            }
        }

        summary.push_str(&format!("\nViolations: {}\n", report.violations.len()));

        if !report.violations.is_empty() {
            summary.push_str("\nTop 10 Violations:\n");
            for (i, violation) in report.violations.iter().take(10).enumerate() {
                let date = violation
                    .date
                    .map(|d| format!(" on {}", d))
                    .unwrap_or_default();
                summary.push_str(&format!(
                    "  {}. {}{}: {}\n",
                    i + 1,
                    violation.location,
                    date,
                    violation.details
                ));
            }
        }

        summary
    }
}

impl Default for IntegrityChecker {
    fn default() -> Self {
        Self::new()
    }
}
