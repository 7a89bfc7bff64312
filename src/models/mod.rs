pub mod daily;
pub mod dataset;
pub mod location;

pub use daily::{DailyStatistic, DailyWeatherRecord};
pub use dataset::WeatherDataset;
pub use location::{validate_locations, Location};
