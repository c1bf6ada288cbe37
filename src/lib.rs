//! snipsheet - scrape element markup into a Google Sheets tab
//!
//! Loads one page in a headless browser, collects the `innerHTML` of every
//! element matching a CSS selector, and overwrites a spreadsheet tab with one
//! snippet per row.
//!
//! # Architecture
//!
//! - **Core**: Shared types, configuration, and error handling
//! - **Fetch**: Page rendering via agent-browser and the selector query
//! - **Sheets**: Service account auth, Sheets REST client, and the tab writer
//! - **Pipeline**: The fetch-then-write run
//!
//! # Usage
//!
//! ```rust,no_run
//! use snipsheet::fetch::{AgentBrowser, FetchOptions, PageFetcher};
//! use snipsheet::sheets::{ServiceAccountKey, SheetWriter, SheetsClient, WriterOptions};
//! use snipsheet::{Config, Pipeline};
//!
//! #[tokio::main]
//! async fn main() -> snipsheet::Result<()> {
//!     let config = Config::load()?;
//!     config.validate()?;
//!
//!     let fetcher = PageFetcher::new(
//!         AgentBrowser::from_config(&config.browser),
//!         FetchOptions::from(&config.target),
//!     );
//!     let client = SheetsClient::from_config(&config.sheet, ServiceAccountKey::from_env()?)?;
//!     let writer = SheetWriter::new(
//!         client,
//!         config.sheet_handle()?,
//!         WriterOptions::from(&config.sheet),
//!     );
//!
//!     let summary = Pipeline::new(fetcher, writer).run(&config.target()).await?;
//!     println!("{}", summary);
//!     Ok(())
//! }
//! ```

pub mod core;
pub mod fetch;
pub mod pipeline;
pub mod sheets;

// Re-export commonly used items
pub use core::{Config, Result, SnipsheetError};
pub use pipeline::Pipeline;
