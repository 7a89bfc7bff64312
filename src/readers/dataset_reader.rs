use crate::error::{ArchiveError, Result};
use crate::models::{DailyStatistic, Location, WeatherDataset};
use chrono::NaiveDate;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Per-location table of one statistic, as used for plotting.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationSeries {
    pub name: String,
    pub points: Vec<(NaiveDate, f64)>,
}

pub struct DatasetReader {
    allow_empty: bool,
}

impl DatasetReader {
    pub fn new() -> Self {
        Self { allow_empty: true }
    }

    /// Reject files in which no location has any record.
    pub fn with_allow_empty(allow_empty: bool) -> Self {
        Self { allow_empty }
    }

    pub fn read_dataset(&self, path: &Path) -> Result<WeatherDataset> {
        let file = File::open(path)?;
        let dataset: WeatherDataset = serde_json::from_reader(BufReader::new(file))?;

        if !self.allow_empty && !dataset.has_records() {
            return Err(ArchiveError::EmptyDataset(format!(
                "read from {}",
                path.display()
            )));
        }

        Ok(dataset)
    }

    pub fn read_locations(&self, path: &Path) -> Result<Vec<Location>> {
        let file = File::open(path)?;
        let locations: Vec<Location> = serde_json::from_reader(BufReader::new(file))?;
        Ok(locations)
    }

    /// `(date, value)` pairs of one location, skipping missing values.
    pub fn series(
        &self,
        dataset: &WeatherDataset,
        name: &str,
        statistic: DailyStatistic,
    ) -> Result<Vec<(NaiveDate, f64)>> {
        dataset.series(name, statistic)
    }

    /// One table per location, in dataset order, for the chosen statistic.
    pub fn location_series(
        &self,
        dataset: &WeatherDataset,
        statistic: DailyStatistic,
    ) -> Result<Vec<LocationSeries>> {
        dataset
            .location_names()
            .map(|name| {
                Ok(LocationSeries {
                    name: name.to_string(),
                    points: self.series(dataset, name, statistic)?,
                })
            })
            .collect()
    }
}

impl Default for DatasetReader {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DailyWeatherRecord;
    use crate::writers::JsonWriter;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn sample_dataset() -> WeatherDataset {
        let start = NaiveDate::from_ymd_opt(2024, 5, 18).unwrap();
        let mut dataset = WeatherDataset::new();
        dataset.insert(
            "Karachi",
            (0..5)
                .map(|i| {
                    let t = 30.0 + i as f64 * 0.3;
                    DailyWeatherRecord::new(
                        start + chrono::Duration::days(i),
                        Some(t),
                        Some(t + 4.1),
                        Some(t - 3.7),
                    )
                })
                .collect(),
        );
        dataset.insert_placeholder("Islamabad");
        dataset
    }

    #[test]
    fn test_round_trip_preserves_order_and_values() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("all_weather_data.json");
        let dataset = sample_dataset();

        JsonWriter::new().write_dataset(&dataset, &path).unwrap();
        let loaded = DatasetReader::new().read_dataset(&path).unwrap();

        assert_eq!(loaded, dataset);
        let names: Vec<&str> = loaded.location_names().collect();
        assert_eq!(names, vec!["Karachi", "Islamabad"]);
    }

    #[test]
    fn test_location_series() {
        let series = DatasetReader::new()
            .location_series(&sample_dataset(), DailyStatistic::Max)
            .unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series[0].name, "Karachi");
        assert_eq!(series[0].points.len(), 5);
        assert!((series[0].points[0].1 - 34.1).abs() < 1e-9);
        assert!(series[1].points.is_empty());
    }

    #[test]
    fn test_series_unknown_location() {
        let result = DatasetReader::new().series(&sample_dataset(), "Lahore", DailyStatistic::Mean);
        assert!(matches!(result, Err(ArchiveError::LocationNotFound { .. })));
    }

    #[test]
    fn test_reject_empty_dataset() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("empty.json");
        std::fs::write(&path, r#"{"Karachi": []}"#).unwrap();

        assert!(DatasetReader::new().read_dataset(&path).is_ok());
        assert!(matches!(
            DatasetReader::with_allow_empty(false).read_dataset(&path),
            Err(ArchiveError::EmptyDataset(_))
        ));
    }

    #[test]
    fn test_malformed_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("bad.json");
        std::fs::write(&path, r#"{"Karachi": [{"date": "yesterday"}]}"#).unwrap();

        assert!(matches!(
            DatasetReader::new().read_dataset(&path),
            Err(ArchiveError::Json(_))
        ));
    }

    #[test]
    fn test_missing_file() {
        let result = DatasetReader::new().read_dataset(Path::new("/no/such/file.json"));
        assert!(matches!(result, Err(ArchiveError::Io(_))));
    }

    #[test]
    fn test_read_locations() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("locations_data.json");
        JsonWriter::new()
            .write_locations(&Location::defaults(), &path)
            .unwrap();

        let locations = DatasetReader::new().read_locations(&path).unwrap();
        assert_eq!(locations, Location::defaults());
    }
}
