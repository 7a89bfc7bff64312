use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use plotters::coord::types::RangedDateTime;
use plotters::prelude::*;
use std::path::Path;

use crate::error::{ArchiveError, Result};
use crate::models::DailyStatistic;
use crate::readers::dataset_reader::LocationSeries;
use crate::utils::constants::{DEFAULT_CHART_HEIGHT, DEFAULT_CHART_WIDTH};

const PALETTE: [RGBColor; 6] = [
    RGBColor(255, 165, 0),
    RGBColor(0, 0, 255),
    RGBColor(0, 128, 0),
    RGBColor(220, 20, 60),
    RGBColor(128, 0, 128),
    RGBColor(139, 69, 19),
];

#[derive(Debug, Clone)]
pub struct ChartOptions {
    pub statistic: DailyStatistic,
    /// Derived from the statistic and location names when not set
    pub title: Option<String>,
    pub width: u32,
    pub height: u32,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            statistic: DailyStatistic::Mean,
            title: None,
            width: DEFAULT_CHART_WIDTH,
            height: DEFAULT_CHART_HEIGHT,
        }
    }
}

impl ChartOptions {
    pub fn title_for(&self, series: &[LocationSeries]) -> String {
        if let Some(title) = &self.title {
            return title.clone();
        }

        let names: Vec<&str> = series.iter().map(|s| s.name.as_str()).collect();
        let places = match names.as_slice() {
            [] => String::new(),
            [only] => only.to_string(),
            [rest @ .., last] => format!("{} and {}", rest.join(", "), last),
        };

        format!(
            "Daily {} Temperature for {}",
            self.statistic.label(),
            places
        )
    }

    pub fn y_label(&self) -> String {
        format!("{} Temperature (°C)", self.statistic.label())
    }
}

/// Axis bounds over every point: first and last date, padded value range.
pub fn chart_bounds(series: &[LocationSeries]) -> Option<(NaiveDate, NaiveDate, f64, f64)> {
    let mut points = series.iter().flat_map(|s| s.points.iter());
    let &(first_date, first_value) = points.next()?;

    let (min_date, max_date, min_value, max_value) = points.fold(
        (first_date, first_date, first_value, first_value),
        |(d0, d1, v0, v1), &(date, value)| (d0.min(date), d1.max(date), v0.min(value), v1.max(value)),
    );

    let padding = if (max_value - min_value).abs() > 1e-6 {
        (max_value - min_value) * 0.1
    } else {
        1.0
    };

    Some((min_date, max_date, min_value - padding, max_value + padding))
}

fn midnight(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

fn plot_err<E: std::fmt::Display>(e: E) -> ArchiveError {
    ArchiveError::Plot(e.to_string())
}

/// Render one line per location into an SVG file.
pub fn render_chart(series: &[LocationSeries], options: &ChartOptions, output: &Path) -> Result<()> {
    let (min_date, max_date, y_start, y_end) = chart_bounds(series)
        .ok_or_else(|| ArchiveError::EmptyDataset("plot".to_string()))?;

    // A single day still needs a non-empty x range
    let x_start = midnight(min_date);
    let x_end = if max_date > min_date {
        midnight(max_date)
    } else {
        x_start + chrono::Duration::days(1)
    };

    if let Some(parent) = output.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let root = SVGBackend::new(output, (options.width, options.height)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(options.title_for(series), ("sans-serif", 24))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(RangedDateTime::from(x_start..x_end), y_start..y_end)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc("Date")
        .y_desc(options.y_label())
        .x_label_formatter(&|dt: &NaiveDateTime| dt.format("%Y-%m-%d").to_string())
        .light_line_style(BLACK.mix(0.15))
        .draw()
        .map_err(plot_err)?;

    for (i, location) in series.iter().enumerate() {
        if location.points.is_empty() {
            continue;
        }
        let color = PALETTE[i % PALETTE.len()];

        chart
            .draw_series(LineSeries::new(
                location.points.iter().map(|(date, value)| (midnight(*date), *value)),
                color.stroke_width(2),
            ))
            .map_err(plot_err)?
            .label(location.name.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
    }

    chart
        .configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(plot_err)?;

    root.present().map_err(plot_err)?;

    Ok(())
}
