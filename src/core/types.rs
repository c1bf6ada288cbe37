//! Shared types used across snipsheet modules
//!
//! Contains the target reference, sheet handle, and run summaries.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::core::error::SnipsheetError;

/// Page and selector to scrape
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    /// Page URL (http or https)
    pub url: String,
    /// CSS selector evaluated over the whole document
    pub selector: String,
}

impl Target {
    /// Create a new target
    pub fn new(url: impl Into<String>, selector: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            selector: selector.into(),
        }
    }
}

/// A tab within a remote spreadsheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SheetHandle {
    /// Spreadsheet id (the long key in the sheet URL)
    pub spreadsheet_id: String,
    /// Tab title
    pub tab: String,
}

impl SheetHandle {
    /// Create a new sheet handle
    pub fn new(spreadsheet_id: impl Into<String>, tab: impl Into<String>) -> Self {
        Self {
            spreadsheet_id: spreadsheet_id.into(),
            tab: tab.into(),
        }
    }
}

impl fmt::Display for SheetHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.spreadsheet_id, self.tab)
    }
}

/// Dimensions used when a missing tab has to be created
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridSize {
    pub rows: u32,
    pub cols: u32,
}

impl Default for GridSize {
    fn default() -> Self {
        Self {
            rows: 1000,
            cols: 2,
        }
    }
}

/// What to do when the selector does not appear before the wait timeout
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum WaitPolicy {
    /// Continue without a word
    Ignore,
    /// Continue, but log a warning
    #[default]
    Warn,
    /// Abort the run
    Fail,
}

impl FromStr for WaitPolicy {
    type Err = SnipsheetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ignore" => Ok(Self::Ignore),
            "warn" => Ok(Self::Warn),
            "fail" => Ok(Self::Fail),
            other => Err(SnipsheetError::config(format!(
                "Unknown wait policy '{}' (expected ignore, warn or fail)",
                other
            ))),
        }
    }
}

impl fmt::Display for WaitPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Ignore => "ignore",
            Self::Warn => "warn",
            Self::Fail => "fail",
        };
        f.write_str(name)
    }
}

/// Pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetching,
    Writing,
    Done,
}

/// Outcome of a sheet write
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriteReport {
    /// Where the rows went
    pub handle: SheetHandle,
    /// Rows written to column A (1 when the sentinel was written)
    pub rows_written: usize,
    /// Whether the tab had to be created first
    pub tab_created: bool,
}

/// Outcome of a full run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Number of elements matched on the page
    pub snippets: usize,
    /// What the writer did with them
    pub write: WriteReport,
}

impl fmt::Display for RunSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Wrote {} cell(s) to Google Sheets ({}).",
            self.snippets, self.write.handle
        )
    }
}
