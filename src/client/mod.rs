pub mod archive_client;
pub mod cache;
pub mod response;
pub mod retry;

pub use archive_client::ArchiveClient;
pub use cache::{CachedResponse, ResponseCache};
pub use response::{ArchiveResponse, DailyBlock};
pub use retry::RetryPolicy;
