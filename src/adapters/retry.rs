use crate::domain::ports::{PageFetcher, Sleeper};
use crate::utils::delay::DelayRange;
use crate::utils::error::{FetchError, Result};
use async_trait::async_trait;

pub const DEFAULT_MAX_RETRIES: u32 = 3;

/// Bounded retry around another fetcher.
///
/// Every failed attempt is logged and followed by a delay drawn fresh from
/// `backoff`; after `max_retries` attempts the page is given up with
/// [`FetchError::MaxRetriesExceeded`].
pub struct RetryingFetcher<F, S> {
    inner: F,
    max_retries: u32,
    backoff: DelayRange,
    sleeper: S,
}

impl<F: PageFetcher, S: Sleeper> RetryingFetcher<F, S> {
    pub fn new(inner: F, max_retries: u32, backoff: DelayRange, sleeper: S) -> Self {
        Self {
            inner,
            max_retries,
            backoff,
            sleeper,
        }
    }
}

#[async_trait]
impl<F: PageFetcher, S: Sleeper> PageFetcher for RetryingFetcher<F, S> {
    async fn fetch(&mut self, url: &str) -> std::result::Result<String, FetchError> {
        let mut retries = 0;
        while retries < self.max_retries {
            match self.inner.fetch(url).await {
                Ok(content) => return Ok(content),
                Err(e) => {
                    retries += 1;
                    tracing::warn!(
                        "Error: {}. Retrying... ({}/{})",
                        e,
                        retries,
                        self.max_retries
                    );
                    self.sleeper.sleep(self.backoff.sample()).await;
                }
            }
        }

        Err(FetchError::MaxRetriesExceeded {
            url: url.to_string(),
            attempts: retries,
        })
    }

    async fn release(&mut self) -> Result<()> {
        self.inner.release().await
    }
}
