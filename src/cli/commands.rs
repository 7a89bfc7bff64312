use chrono::NaiveDate;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::analyzers::DatasetAnalyzer;
use crate::cli::args::{Cli, Commands};
use crate::client::ArchiveClient;
use crate::error::Result;
use crate::plotting::{render_chart, ChartOptions};
use crate::processors::{FetchPipeline, IntegrityChecker};
use crate::readers::DatasetReader;
use crate::settings::{FailurePolicy, Settings};
use crate::utils::progress::ProgressReporter;
use crate::writers::JsonWriter;

pub async fn run(cli: Cli) -> Result<()> {
    init_logging(cli.verbose, cli.log_file.as_deref())?;

    let mut settings = Settings::load(cli.config.as_deref())?;
    debug!("Loaded settings: {:?}", settings);

    match cli.command {
        Commands::Fetch {
            output,
            locations_output,
            start_date,
            end_date,
            omit_failed,
            no_cache,
        } => {
            if let Some(date) = start_date {
                settings.period.start_date = date;
            }
            if let Some(date) = end_date {
                settings.period.end_date = date;
            }
            if let Some(path) = output {
                settings.output.dataset_path = path;
            }
            if locations_output.is_some() {
                settings.output.locations_path = locations_output;
            }
            if omit_failed {
                settings.failure_policy = FailurePolicy::Omit;
            }
            if no_cache {
                settings.cache.enabled = false;
            }
            settings.validate()?;

            fetch(&settings, cli.verbose).await?;
        }

        Commands::Plot {
            input,
            output,
            statistic,
            title,
            width,
            height,
        } => {
            let input = input.unwrap_or_else(|| settings.output.dataset_path.clone());
            let output = output.unwrap_or_else(|| settings.output.chart_path.clone());

            let mut options = ChartOptions {
                statistic,
                title,
                ..Default::default()
            };
            if let Some(width) = width {
                options.width = width;
            }
            if let Some(height) = height {
                options.height = height;
            }

            plot(&input, &output, &options)?;
        }

        Commands::Info { input } => {
            let input = input.unwrap_or_else(|| settings.output.dataset_path.clone());
            println!("Analyzing dataset file: {}", input.display());

            let dataset = DatasetReader::new().read_dataset(&input)?;
            let stats = DatasetAnalyzer::new().analyze(&dataset)?;

            println!("\n{}", stats.detailed_summary());
        }

        Commands::Validate {
            input,
            start_date,
            end_date,
        } => {
            let input = input.unwrap_or_else(|| settings.output.dataset_path.clone());
            let period = expected_period(&settings, start_date, end_date);

            validate(&input, period)?;
        }
    }

    Ok(())
}

fn init_logging(verbose: bool, log_file: Option<&Path>) -> Result<()> {
    let default_level = if verbose {
        "meteo_archive=debug"
    } else {
        "meteo_archive=info"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false);

    let installed = match log_file {
        Some(path) => {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            let file = File::create(path)?;
            builder
                .with_writer(Arc::new(file))
                .with_ansi(false)
                .try_init()
        }
        None => builder.with_writer(std::io::stderr).try_init(),
    };

    // Already installed when `run` is called twice in one process
    if installed.is_err() {
        debug!("Global tracing subscriber already set");
    }

    Ok(())
}

async fn fetch(settings: &Settings, verbose: bool) -> Result<()> {
    let start = settings.period.start_date;
    let end = settings.period.end_date;

    println!("Fetching daily temperatures...");
    println!(
        "Period: {} to {} ({} days)",
        start,
        end,
        settings.period_days()
    );
    println!("Locations: {}", settings.locations.len());
    println!("Output file: {}", settings.output.dataset_path.display());

    let client = ArchiveClient::new(settings)?;
    let pipeline =
        FetchPipeline::new(&client, start, end).with_failure_policy(settings.failure_policy);

    // Log lines and the bar would interleave on stderr in verbose mode
    let progress = ProgressReporter::new(
        settings.locations.len() as u64,
        "Fetching locations...",
        verbose,
    );
    let report = pipeline.run(&settings.locations, Some(&progress)).await;
    progress.finish_with_message(&format!(
        "Fetched {} of {} locations",
        report.succeeded(),
        settings.locations.len()
    ));

    let writer = JsonWriter::new();
    writer.write_dataset(&report.dataset, &settings.output.dataset_path)?;
    info!(
        "Saved {} records to {}",
        report.dataset.total_records(),
        settings.output.dataset_path.display()
    );

    if let Some(path) = &settings.output.locations_path {
        match writer.write_locations(&settings.locations, path) {
            Ok(()) => info!("Saved location list to {}", path.display()),
            Err(e) => error!("Error saving location list to {}: {}", path.display(), e),
        }
    }

    if report.dataset.has_records() {
        let stats = DatasetAnalyzer::new().analyze(&report.dataset)?;
        println!("\n{}", stats.summary());
    }

    if report.failures.is_empty() {
        println!("✅ All locations fetched");
    } else {
        println!("⚠️  {} location(s) failed:", report.failures.len());
        for failure in &report.failures {
            println!("  {}: {}", failure.location, failure.error);
        }
        if report.all_failed() {
            warn!("No location could be fetched");
        }
    }

    println!("Fetch complete!");
    Ok(())
}

fn plot(input: &Path, output: &Path, options: &ChartOptions) -> Result<()> {
    println!("Plotting {} from {}", options.statistic.label(), input.display());

    let reader = DatasetReader::with_allow_empty(false);
    let dataset = reader.read_dataset(input)?;
    let series = reader.location_series(&dataset, options.statistic)?;

    for location in series.iter().filter(|s| s.points.is_empty()) {
        warn!("No {} values for {}", options.statistic, location.name);
    }

    render_chart(&series, options, output)?;
    println!("Chart written to {}", output.display());

    Ok(())
}

fn validate(input: &Path, period: Option<(NaiveDate, NaiveDate)>) -> Result<()> {
    println!("Validating dataset file: {}", input.display());

    let dataset = DatasetReader::new().read_dataset(input)?;

    let mut checker = IntegrityChecker::new();
    if let Some((start, end)) = period {
        checker = checker.with_period(start, end);
    }
    let report = checker.check_integrity(&dataset);

    println!("\n{}", checker.generate_summary(&report));

    if report.violations.is_empty() {
        println!("✅ All data passed validation checks");
    } else {
        println!("⚠️  Found {} validation issues", report.violations.len());
    }

    Ok(())
}

/// Period to check against: none unless a bound was given on the command
/// line, the configured period fills in a missing bound.
fn expected_period(
    settings: &Settings,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Option<(NaiveDate, NaiveDate)> {
    if start.is_none() && end.is_none() {
        return None;
    }

    Some((
        start.unwrap_or(settings.period.start_date),
        end.unwrap_or(settings.period.end_date),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_period() {
        let settings = Settings::default();
        let start = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

        assert_eq!(expected_period(&settings, None, None), None);
        assert_eq!(
            expected_period(&settings, Some(start), None),
            Some((start, settings.period.end_date))
        );
    }

    #[test]
    fn test_expected_period_both_bounds() {
        let settings = Settings::default();
        let start = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();
        let end = NaiveDate::from_ymd_opt(2024, 6, 30).unwrap();

        assert_eq!(
            expected_period(&settings, Some(start), Some(end)),
            Some((start, end))
        );
    }
}
