use crate::domain::model::{Extraction, Record, Schema};
use crate::utils::error::{FetchError, Result};
use async_trait::async_trait;
use std::time::Duration;

/// Retrieves the raw document for a URL.
#[async_trait]
pub trait PageFetcher: Send {
    async fn fetch(&mut self, url: &str) -> std::result::Result<String, FetchError>;

    /// Releases the underlying session. Called once, on every exit path.
    async fn release(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Turns one page of content into flat records. Never fails; entries that
/// cannot be parsed are counted in [`Extraction::dropped`].
pub trait RecordExtractor: Send + Sync {
    fn schema(&self) -> &Schema;
    fn extract(&self, content: &str) -> Extraction;
}

pub trait RecordSink: Send {
    fn append(&mut self, records: &[Record]) -> Result<usize>;
    fn finish(&mut self) -> Result<()>;
}

pub trait Sleeper: Send + Sync {
    fn sleep(&self, duration: Duration) -> impl std::future::Future<Output = ()> + Send;
}

#[async_trait]
impl<F: PageFetcher + ?Sized> PageFetcher for Box<F> {
    async fn fetch(&mut self, url: &str) -> std::result::Result<String, FetchError> {
        (**self).fetch(url).await
    }

    async fn release(&mut self) -> Result<()> {
        (**self).release().await
    }
}
