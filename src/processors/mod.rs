pub mod integrity_checker;
pub mod pipeline;
pub mod reshaper;

pub use integrity_checker::{IntegrityChecker, IntegrityReport, LocationStatistics, Violation, ViolationType};
pub use pipeline::{FetchPipeline, FetchReport, LocationFailure};
pub use reshaper::{reshape_daily, reshape_response, timestamp_to_date};
