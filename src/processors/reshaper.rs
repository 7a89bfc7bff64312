use chrono::{DateTime, NaiveDate};

use crate::client::{ArchiveResponse, DailyBlock};
use crate::error::{ArchiveError, Result};
use crate::models::{DailyStatistic, DailyWeatherRecord};

/// Calendar date (UTC) of a Unix timestamp in seconds; time of day is dropped.
pub fn timestamp_to_date(seconds: i64) -> Result<NaiveDate> {
    DateTime::from_timestamp(seconds, 0)
        .map(|dt| dt.date_naive())
        .ok_or_else(|| {
            ArchiveError::InvalidFormat(format!("Timestamp {} is out of range", seconds))
        })
}

/// Turn the column-oriented archive response into one record per day.
pub fn reshape_response(response: &ArchiveResponse) -> Result<Vec<DailyWeatherRecord>> {
    let daily = response
        .daily
        .as_ref()
        .ok_or_else(|| ArchiveError::InvalidFormat("Response has no daily block".to_string()))?;

    reshape_daily(daily)
}

pub fn reshape_daily(daily: &DailyBlock) -> Result<Vec<DailyWeatherRecord>> {
    let len = daily.time.len();

    let columns = DailyStatistic::ALL
        .iter()
        .map(|statistic| {
            let values = daily.values(*statistic).ok_or_else(|| {
                ArchiveError::InvalidFormat(format!("Response is missing {}", statistic))
            })?;
            if values.len() != len {
                return Err(ArchiveError::InvalidFormat(format!(
                    "{} has {} values for {} timestamps",
                    statistic,
                    values.len(),
                    len
                )));
            }
            Ok(values)
        })
        .collect::<Result<Vec<_>>>()?;

    let (mean, max, min) = (columns[0], columns[1], columns[2]);

    daily
        .time
        .iter()
        .enumerate()
        .map(|(i, &seconds)| {
            let date = timestamp_to_date(seconds)?;
            Ok(DailyWeatherRecord::new(date, mean[i], max[i], min[i]))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn block(time: Vec<i64>, values: Vec<Option<f64>>) -> DailyBlock {
        DailyBlock {
            time,
            temperature_2m_mean: Some(values.clone()),
            temperature_2m_max: Some(values.iter().map(|v| v.map(|t| t + 4.0)).collect()),
            temperature_2m_min: Some(values.iter().map(|v| v.map(|t| t - 4.0)).collect()),
        }
    }

    #[test]
    fn test_timestamp_to_date_truncates_time() {
        // 2024-05-18 00:00:00 UTC and 23:59:59 the same day
        assert_eq!(
            timestamp_to_date(1715990400).unwrap(),
            NaiveDate::from_ymd_opt(2024, 5, 18).unwrap()
        );
        assert_eq!(
            timestamp_to_date(1715990400 + 86399).unwrap(),
            NaiveDate::from_ymd_opt(2024, 5, 18).unwrap()
        );
        assert_eq!(
            timestamp_to_date(0).unwrap(),
            NaiveDate::from_ymd_opt(1970, 1, 1).unwrap()
        );
        assert!(timestamp_to_date(i64::MAX).is_err());
    }

    #[test]
    fn test_reshape_daily() {
        let daily = block(vec![1715990400, 1716076800], vec![Some(31.0), None]);
        let records = reshape_daily(&daily).unwrap();

        assert_eq!(
            records,
            vec![
                DailyWeatherRecord::new(
                    NaiveDate::from_ymd_opt(2024, 5, 18).unwrap(),
                    Some(31.0),
                    Some(35.0),
                    Some(27.0)
                ),
                DailyWeatherRecord::new(
                    NaiveDate::from_ymd_opt(2024, 5, 19).unwrap(),
                    None,
                    None,
                    None
                ),
            ]
        );
    }

    #[test]
    fn test_reshape_empty_series() {
        let daily = block(vec![], vec![]);
        assert!(reshape_daily(&daily).unwrap().is_empty());
    }

    #[test]
    fn test_length_mismatch_rejected() {
        let mut daily = block(vec![1715990400, 1716076800], vec![Some(31.0), Some(30.0)]);
        daily.temperature_2m_max = Some(vec![Some(35.0)]);

        let err = reshape_daily(&daily).unwrap_err();
        assert!(err.to_string().contains("temperature_2m_max"));
    }

    #[test]
    fn test_missing_variable_rejected() {
        let mut daily = block(vec![1715990400], vec![Some(31.0)]);
        daily.temperature_2m_min = None;

        assert!(reshape_daily(&daily).is_err());
    }
}
