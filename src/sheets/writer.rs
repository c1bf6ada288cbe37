//! Sheet writer
//!
//! Overwrites one tab's column A with the snippet list.

use tracing::info;

use crate::core::config::SheetConfig;
use crate::core::{GridSize, Result, SheetHandle, WriteReport};
use crate::sheets::service::SpreadsheetService;

/// Tab creation size and empty-result marker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriterOptions {
    pub new_tab_size: GridSize,
    pub empty_marker: String,
}

impl From<&SheetConfig> for WriterOptions {
    fn from(config: &SheetConfig) -> Self {
        Self {
            new_tab_size: config.new_tab_size,
            empty_marker: config.empty_marker.clone(),
        }
    }
}

/// Rows to write for a snippet list: the snippets, or the marker alone
pub fn column_rows(snippets: &[String], empty_marker: &str) -> Vec<String> {
    if snippets.is_empty() {
        vec![empty_marker.to_string()]
    } else {
        snippets.to_vec()
    }
}

/// Writes snippets into a single tab, replacing whatever was there
pub struct SheetWriter<S> {
    service: S,
    handle: SheetHandle,
    options: WriterOptions,
}

impl<S: SpreadsheetService> SheetWriter<S> {
    pub fn new(service: S, handle: SheetHandle, options: WriterOptions) -> Self {
        Self {
            service,
            handle,
            options,
        }
    }

    /// Access the underlying service
    pub fn service(&self) -> &S {
        &self.service
    }

    /// The tab this writer targets
    pub fn handle(&self) -> &SheetHandle {
        &self.handle
    }

    /// Resolve or create the tab, clear it, and write one snippet per row
    pub async fn write(&self, snippets: &[String]) -> Result<WriteReport> {
        let id = self.handle.spreadsheet_id.as_str();
        let tab = self.handle.tab.as_str();

        let tab_created = self.ensure_tab().await?;

        self.service.clear_tab(id, tab).await?;

        let rows = column_rows(snippets, &self.options.empty_marker);
        self.service.write_column(id, tab, &rows).await?;
        info!(sheet = %self.handle, rows = rows.len(), "Rows written");

        Ok(WriteReport {
            handle: self.handle.clone(),
            rows_written: rows.len(),
            tab_created,
        })
    }

    /// Returns whether the tab had to be created
    async fn ensure_tab(&self) -> Result<bool> {
        let id = self.handle.spreadsheet_id.as_str();
        let tab = self.handle.tab.as_str();

        let titles = self.service.tab_titles(id).await?;
        if titles.iter().any(|t| t == tab) {
            return Ok(false);
        }

        self.service
            .add_tab(id, tab, self.options.new_tab_size)
            .await?;
        info!(sheet = %self.handle, "Tab not found, created it");
        Ok(true)
    }
}
