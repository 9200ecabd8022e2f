pub mod adapters;
pub mod app;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::cli::CliArgs;

pub use adapters::{HttpFetcher, IncrementalCsvSink, RetryingFetcher};
pub use app::{run_job, RunReport};
pub use config::HarvestConfig;
pub use crate::core::{PagePlan, PaginationDriver, RunState, RunSummary};
pub use utils::error::{FetchError, HarvestError, Result};
