pub mod chart;

pub use chart::{chart_bounds, render_chart, ChartOptions};
