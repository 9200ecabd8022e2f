//! Long-lived Chromium session for client-rendered listing pages.

use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct BrowserOptions {
    pub user_agent: Option<String>,
    pub headless: bool,
    pub window_size: (u32, u32),
    pub timeout: Option<Duration>,
}

impl Default for BrowserOptions {
    fn default() -> Self {
        Self {
            user_agent: None,
            headless: true,
            window_size: (1920, 1200),
            timeout: None,
        }
    }
}

impl BrowserOptions {
    /// Command-line switches passed to the browser process.
    pub fn launch_args(&self) -> Vec<String> {
        let mut args = vec!["--disable-blink-features=AutomationControlled".to_string()];
        if let Some(agent) = &self.user_agent {
            args.push(format!("--user-agent={}", agent));
        }
        args
    }
}

#[cfg(feature = "browser")]
pub use session::BrowserFetcher;

#[cfg(feature = "browser")]
mod session {
    use super::BrowserOptions;
    use crate::domain::ports::PageFetcher;
    use crate::utils::error::{FetchError, HarvestError, Result};
    use async_trait::async_trait;
    use chromiumoxide::browser::{Browser, BrowserConfig};
    use chromiumoxide::Page;
    use futures::StreamExt;
    use tokio::task::JoinHandle;

    pub struct BrowserFetcher {
        browser: Option<Browser>,
        page: Page,
        handler: Option<JoinHandle<()>>,
    }

    impl BrowserFetcher {
        pub async fn launch(options: &BrowserOptions) -> Result<Self> {
            let (width, height) = options.window_size;
            let mut builder = BrowserConfig::builder()
                .window_size(width, height)
                .args(options.launch_args());
            if !options.headless {
                builder = builder.with_head();
            }
            if let Some(timeout) = options.timeout {
                builder = builder.request_timeout(timeout);
            }
            let config = builder.build().map_err(|message| HarvestError::SetupError {
                message: format!("Invalid browser configuration: {}", message),
            })?;

            let (mut browser, mut handler) =
                Browser::launch(config)
                    .await
                    .map_err(|e| HarvestError::SetupError {
                        message: format!("Could not launch browser: {}", e),
                    })?;

            let handler = tokio::spawn(async move {
                while let Some(event) = handler.next().await {
                    if event.is_err() {
                        break;
                    }
                }
            });

            let page = match browser.new_page("about:blank").await {
                Ok(page) => page,
                Err(e) => {
                    let _ = browser.close().await;
                    handler.abort();
                    return Err(HarvestError::SetupError {
                        message: format!("Could not open browser tab: {}", e),
                    });
                }
            };

            tracing::info!("Browser session started");
            Ok(Self {
                browser: Some(browser),
                page,
                handler: Some(handler),
            })
        }
    }

    #[async_trait]
    impl PageFetcher for BrowserFetcher {
        async fn fetch(&mut self, url: &str) -> std::result::Result<String, FetchError> {
            let browser_error = |e: chromiumoxide::error::CdpError| FetchError::Browser {
                url: url.to_string(),
                message: e.to_string(),
            };

            self.page.goto(url).await.map_err(browser_error)?;
            self.page.content().await.map_err(browser_error)
        }

        async fn release(&mut self) -> Result<()> {
            let Some(mut browser) = self.browser.take() else {
                return Ok(());
            };

            let closed = browser.close().await;
            let _ = browser.wait().await;
            if let Some(handler) = self.handler.take() {
                let _ = handler.await;
            }
            tracing::info!("Browser session closed");

            closed.map(|_| ()).map_err(|e| HarvestError::SetupError {
                message: format!("Browser did not shut down cleanly: {}", e),
            })
        }
    }
}
