use crate::domain::ports::PageFetcher;
use crate::utils::error::{FetchError, HarvestError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Plain GET against static pages. One attempt per call; wrap it in a
/// [`RetryingFetcher`](crate::adapters::retry::RetryingFetcher) for resilience.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(user_agent: Option<&str>, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(agent) = user_agent {
            builder = builder.user_agent(agent.to_string());
        }
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().map_err(|e| HarvestError::SetupError {
            message: format!("Could not build HTTP client: {}", e),
        })?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&mut self, url: &str) -> std::result::Result<String, FetchError> {
        tracing::debug!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| FetchError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        tracing::debug!("Response status: {}", status);
        if status != StatusCode::OK {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|source| FetchError::Transport {
            url: url.to_string(),
            source,
        })
    }
}
