pub mod analyzers;
pub mod cli;
pub mod client;
pub mod error;
pub mod models;
pub mod plotting;
pub mod processors;
pub mod readers;
pub mod settings;
pub mod utils;
pub mod writers;

pub use error::{ArchiveError, Result};
