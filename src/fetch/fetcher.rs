//! Page fetcher
//!
//! Drives a `PageRenderer` through one load-wait-query cycle and always closes
//! the session before returning.

use std::time::Duration;
use tracing::{debug, info, warn};

use crate::core::config::TargetConfig;
use crate::core::{Result, SnipsheetError, Target, WaitPolicy};
use crate::fetch::renderer::PageRenderer;

/// Selector-wait settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchOptions {
    /// Upper bound on the selector wait
    pub wait_timeout: Duration,
    /// What to do when the selector never shows up
    pub wait_policy: WaitPolicy,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            wait_timeout: Duration::from_millis(10_000),
            wait_policy: WaitPolicy::default(),
        }
    }
}

impl From<&TargetConfig> for FetchOptions {
    fn from(config: &TargetConfig) -> Self {
        Self {
            wait_timeout: Duration::from_millis(config.wait_timeout_ms),
            wait_policy: config.wait_policy,
        }
    }
}

/// Outcome of the bounded selector wait
#[derive(Debug)]
enum SelectorWait {
    Found,
    TimedOut,
    Failed(SnipsheetError),
}

/// Collects inner markup of every selector match on one page
pub struct PageFetcher<R> {
    renderer: R,
    options: FetchOptions,
}

impl<R: PageRenderer> PageFetcher<R> {
    /// Create a fetcher over a renderer
    pub fn new(renderer: R, options: FetchOptions) -> Self {
        Self { renderer, options }
    }

    /// Access the underlying renderer
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Load the page, query it, and close the session on every path
    pub async fn fetch(&self, target: &Target) -> Result<Vec<String>> {
        let outcome = self.collect(target).await;

        match (outcome, self.renderer.close().await) {
            (Ok(snippets), Ok(())) => Ok(snippets),
            (Ok(snippets), Err(e)) => {
                warn!("Browser session did not close cleanly: {}", e);
                Ok(snippets)
            }
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(close_err)) => {
                warn!("Browser session did not close after failure: {}", close_err);
                Err(e)
            }
        }
    }

    async fn collect(&self, target: &Target) -> Result<Vec<String>> {
        self.renderer.open(&target.url).await?;
        info!(url = %target.url, "Page opened");

        // A page that never settles is a failed load
        self.renderer
            .wait_for_network_idle()
            .await
            .map_err(|e| match e {
                nav @ SnipsheetError::Navigation { .. } => nav,
                other => SnipsheetError::navigation(&target.url, other.to_string()),
            })?;

        self.await_selector(&target.selector).await?;

        let snippets = self.renderer.inner_html_all(&target.selector).await?;
        info!(count = snippets.len(), selector = %target.selector, "Collected matches");
        Ok(snippets)
    }

    /// Best-effort wait for the first match, resolved through the wait policy
    async fn await_selector(&self, selector: &str) -> Result<()> {
        let timeout = self.options.wait_timeout;
        let outcome =
            match tokio::time::timeout(timeout, self.renderer.wait_for_selector(selector)).await {
                Ok(Ok(())) => SelectorWait::Found,
                Ok(Err(e)) => SelectorWait::Failed(e),
                Err(_) => SelectorWait::TimedOut,
            };

        let failure = match outcome {
            SelectorWait::Found => {
                debug!(selector, "Selector present");
                return Ok(());
            }
            SelectorWait::TimedOut => SnipsheetError::SelectorTimeout {
                selector: selector.to_string(),
                timeout_ms: timeout.as_millis() as u64,
            },
            SelectorWait::Failed(e) => e,
        };

        match self.options.wait_policy {
            WaitPolicy::Ignore => Ok(()),
            WaitPolicy::Warn => {
                warn!(selector, "Selector wait gave up ({}), querying anyway", failure);
                Ok(())
            }
            WaitPolicy::Fail => Err(failure),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_from_config() {
        let config = TargetConfig {
            url: "https://example.com".to_string(),
            selector: "div".to_string(),
            wait_timeout_ms: 2500,
            wait_policy: WaitPolicy::Fail,
        };
        let options = FetchOptions::from(&config);
        assert_eq!(options.wait_timeout, Duration::from_millis(2500));
        assert_eq!(options.wait_policy, WaitPolicy::Fail);
    }

    #[test]
    fn test_default_options() {
        let options = FetchOptions::default();
        assert_eq!(options.wait_timeout, Duration::from_secs(10));
        assert_eq!(options.wait_policy, WaitPolicy::Warn);
    }
}
