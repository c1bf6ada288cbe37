//! Spreadsheet service trait
//!
//! The four calls the writer needs; implemented by the Sheets REST client and
//! by in-memory fakes in tests.

use async_trait::async_trait;

use crate::core::{GridSize, Result};

#[async_trait]
pub trait SpreadsheetService: Send + Sync {
    /// Titles of every tab in the spreadsheet
    async fn tab_titles(&self, spreadsheet_id: &str) -> Result<Vec<String>>;

    /// Create a tab with the given size
    async fn add_tab(&self, spreadsheet_id: &str, title: &str, size: GridSize) -> Result<()>;

    /// Remove every cell value in the tab
    async fn clear_tab(&self, spreadsheet_id: &str, title: &str) -> Result<()>;

    /// Write `rows` into column A starting at A1, values taken literally
    async fn write_column(&self, spreadsheet_id: &str, title: &str, rows: &[String])
        -> Result<()>;
}
