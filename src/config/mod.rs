#[cfg(feature = "cli")]
pub mod cli;
pub mod presets;
pub mod toml_config;

pub use toml_config::{FetcherKind, HarvestConfig, PageRange, SiteKind};
