use chrono::NaiveDate;
use tracing::{debug, error, info};

use crate::client::ArchiveClient;
use crate::error::{ArchiveError, Result};
use crate::models::{DailyWeatherRecord, Location, WeatherDataset};
use crate::processors::reshaper::reshape_response;
use crate::settings::FailurePolicy;
use crate::utils::progress::ProgressReporter;

#[derive(Debug)]
pub struct LocationFailure {
    pub location: String,
    pub error: ArchiveError,
}

#[derive(Debug)]
pub struct FetchReport {
    pub dataset: WeatherDataset,
    pub failures: Vec<LocationFailure>,
}

impl FetchReport {
    pub fn succeeded(&self) -> usize {
        self.dataset
            .iter()
            .filter(|(name, _)| !self.failures.iter().any(|f| f.location == *name))
            .count()
    }

    pub fn all_failed(&self) -> bool {
        !self.failures.is_empty() && self.succeeded() == 0
    }
}

/// Fetches every location one after another and collects the results.
///
/// A failing location never aborts the run: the error is logged, recorded in
/// the report, and the location is either given an empty series or left out,
/// depending on the failure policy.
pub struct FetchPipeline<'a> {
    client: &'a ArchiveClient,
    start: NaiveDate,
    end: NaiveDate,
    failure_policy: FailurePolicy,
}

impl<'a> FetchPipeline<'a> {
    pub fn new(client: &'a ArchiveClient, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            client,
            start,
            end,
            failure_policy: FailurePolicy::default(),
        }
    }

    pub fn with_failure_policy(mut self, failure_policy: FailurePolicy) -> Self {
        self.failure_policy = failure_policy;
        self
    }

    pub async fn run(
        &self,
        locations: &[Location],
        progress: Option<&ProgressReporter>,
    ) -> FetchReport {
        let mut dataset = WeatherDataset::new();
        let mut failures = Vec::new();

        for location in locations {
            info!("Processing data for {}", location.name);
            debug!("{} at {}", location.name, location.coordinates_label());
            if let Some(p) = progress {
                p.set_message(&format!("Fetching {}", location.name));
            }

            match self.fetch_location(location).await {
                Ok(records) => {
                    info!("{}: {} daily records", location.name, records.len());
                    dataset.insert(location.name.clone(), records);
                }
                Err(e) => {
                    error!("Error fetching data for {}: {}", location.name, e);
                    if self.failure_policy == FailurePolicy::Placeholder {
                        dataset.insert_placeholder(location.name.clone());
                    }
                    failures.push(LocationFailure {
                        location: location.name.clone(),
                        error: e,
                    });
                }
            }

            if let Some(p) = progress {
                p.increment(1);
            }
        }

        FetchReport { dataset, failures }
    }

    async fn fetch_location(&self, location: &Location) -> Result<Vec<DailyWeatherRecord>> {
        let response = self.client.fetch_daily(location, self.start, self.end).await?;
        info!("{}: {}", location.name, response.summary());

        reshape_response(&response)
    }
}
