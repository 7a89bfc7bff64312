/// Archive API
pub const DEFAULT_ARCHIVE_ENDPOINT: &str = "https://archive-api.open-meteo.com/v1/archive";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_TIMEZONE: &str = "GMT";
pub const TIME_FORMAT_UNIX: &str = "unixtime";

/// Requested period (one year, both ends inclusive)
pub const DEFAULT_START_DATE: &str = "2024-05-18";
pub const DEFAULT_END_DATE: &str = "2025-05-17";
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Retry defaults
pub const DEFAULT_MAX_RETRIES: u32 = 5;
pub const DEFAULT_BACKOFF_FACTOR_SECS: f64 = 0.2;
pub const DEFAULT_MAX_BACKOFF_SECS: f64 = 10.0;

/// File names
pub const CACHE_FILE: &str = ".cache.sqlite";
pub const DATASET_FILE: &str = "all_weather_data.json";
pub const LOCATIONS_FILE: &str = "locations_data.json";
pub const CHART_FILE: &str = "weather_chart.svg";

/// Temperature constraints (°C)
pub const MIN_PLAUSIBLE_TEMP: f64 = -90.0;
pub const MAX_PLAUSIBLE_TEMP: f64 = 60.0;
pub const TEMP_TOLERANCE: f64 = 0.5;

/// Chart defaults
pub const DEFAULT_CHART_WIDTH: u32 = 1400;
pub const DEFAULT_CHART_HEIGHT: u32 = 600;

/// Environment variable prefix for configuration overrides
pub const ENV_PREFIX: &str = "METEO_ARCHIVE";
