use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::models::DailyStatistic;

#[derive(Parser)]
#[command(name = "meteo-archive")]
#[command(about = "Open-Meteo historical temperature fetcher and plotter")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(short, long, global = true, help = "TOML configuration file")]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Enable verbose logging")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log file path")]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch daily temperatures for every configured location and save them as JSON
    Fetch {
        #[arg(short, long, help = "Dataset file [default: all_weather_data.json]")]
        output: Option<PathBuf>,

        #[arg(long, help = "Also write the location list to this file")]
        locations_output: Option<PathBuf>,

        #[arg(long, help = "First day of the period (YYYY-MM-DD)")]
        start_date: Option<NaiveDate>,

        #[arg(long, help = "Last day of the period (YYYY-MM-DD)")]
        end_date: Option<NaiveDate>,

        #[arg(long, help = "Leave failed locations out instead of writing an empty series")]
        omit_failed: bool,

        #[arg(long, help = "Bypass the response cache")]
        no_cache: bool,
    },

    /// Plot one statistic for every location in a dataset file
    Plot {
        #[arg(short, long, help = "Dataset file [default: all_weather_data.json]")]
        input: Option<PathBuf>,

        #[arg(short, long, help = "SVG chart file [default: weather_chart.svg]")]
        output: Option<PathBuf>,

        #[arg(short, long, default_value = "mean", help = "mean, max or min")]
        statistic: DailyStatistic,

        #[arg(short, long)]
        title: Option<String>,

        #[arg(long)]
        width: Option<u32>,

        #[arg(long)]
        height: Option<u32>,
    },

    /// Display per-location statistics for a dataset file
    Info {
        #[arg(short, long, help = "Dataset file [default: all_weather_data.json]")]
        input: Option<PathBuf>,
    },

    /// Check ordering, gaps and plausibility of a dataset file
    Validate {
        #[arg(short, long, help = "Dataset file [default: all_weather_data.json]")]
        input: Option<PathBuf>,

        #[arg(long, help = "Expected first day (YYYY-MM-DD)")]
        start_date: Option<NaiveDate>,

        #[arg(long, help = "Expected last day (YYYY-MM-DD)")]
        end_date: Option<NaiveDate>,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_fetch() {
        let cli = Cli::parse_from([
            "meteo-archive",
            "fetch",
            "--start-date",
            "2024-01-01",
            "--omit-failed",
            "-v",
        ]);

        assert!(cli.verbose);
        match cli.command {
            Commands::Fetch {
                start_date,
                end_date,
                omit_failed,
                no_cache,
                ..
            } => {
                assert_eq!(start_date, NaiveDate::from_ymd_opt(2024, 1, 1));
                assert_eq!(end_date, None);
                assert!(omit_failed);
                assert!(!no_cache);
            }
            _ => panic!("expected fetch"),
        }
    }

    #[test]
    fn test_parse_plot_statistic() {
        let cli = Cli::parse_from(["meteo-archive", "plot", "--statistic", "max"]);
        match cli.command {
            Commands::Plot { statistic, .. } => assert_eq!(statistic, DailyStatistic::Max),
            _ => panic!("expected plot"),
        }
    }

    #[test]
    fn test_reject_bad_date() {
        let result = Cli::try_parse_from(["meteo-archive", "fetch", "--end-date", "May 17"]);
        assert!(result.is_err());
    }
}
