//! Fetch module - page rendering and DOM queries
//!
//! Wraps agent-browser for headless page loads and collects inner markup of
//! selector matches.

mod browser;
mod fetcher;
mod renderer;
mod response;

pub use browser::AgentBrowser;
pub use fetcher::{FetchOptions, PageFetcher};
pub use renderer::PageRenderer;
pub use response::{decode_snippets, inner_html_script, CommandOutput};
