// Adapters layer: concrete fetchers and sinks behind the domain ports.

pub mod browser;
pub mod csv_sink;
pub mod http;
pub mod retry;

pub use csv_sink::IncrementalCsvSink;
pub use http::HttpFetcher;
pub use retry::RetryingFetcher;
