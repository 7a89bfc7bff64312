use thiserror::Error;

pub type Result<T> = std::result::Result<T, ArchiveError>;

#[derive(Error, Debug)]
pub enum ArchiveError {
    #[error("File I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Archive API returned {status}: {reason}")]
    Api { status: u16, reason: String },

    #[error("Response cache error: {0}")]
    Cache(#[from] rusqlite::Error),

    #[error("Date parsing error: {0}")]
    DateParse(#[from] chrono::ParseError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),

    #[error("Invalid data format: {0}")]
    InvalidFormat(String),

    #[error("Location {name} not found in dataset")]
    LocationNotFound { name: String },

    #[error("Plot error: {0}")]
    Plot(String),

    #[error("No data to {0}")]
    EmptyDataset(String),
}

impl From<config::ConfigError> for ArchiveError {
    fn from(e: config::ConfigError) -> Self {
        ArchiveError::Config(e.to_string())
    }
}
