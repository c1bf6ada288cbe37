//! Page renderer trait
//!
//! Abstracts "render a page and query the DOM" so the fetcher can run against
//! agent-browser or an in-memory fake.

use async_trait::async_trait;

use crate::core::Result;

/// A browser session that can load one page and query it
#[async_trait]
pub trait PageRenderer: Send + Sync {
    /// Navigate to a URL; failure is fatal for the run
    async fn open(&self, url: &str) -> Result<()>;

    /// Wait until network activity settles
    async fn wait_for_network_idle(&self) -> Result<()>;

    /// Wait until at least one element matches; the caller bounds the wait
    async fn wait_for_selector(&self, selector: &str) -> Result<()>;

    /// `innerHTML` of every match, in document order
    async fn inner_html_all(&self, selector: &str) -> Result<Vec<String>>;

    /// Tear the session down
    async fn close(&self) -> Result<()>;
}
