//! In-memory stand-ins for the browser and the spreadsheet service

#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use snipsheet::core::{GridSize, Result, SheetHandle, SnipsheetError, WaitPolicy};
use snipsheet::fetch::{FetchOptions, PageFetcher, PageRenderer};
use snipsheet::sheets::{SheetWriter, SpreadsheetService, WriterOptions};
use snipsheet::Pipeline;

/// A page whose selector query returns fixed snippets
#[derive(Default)]
pub struct FakePage {
    pub matches: Vec<String>,
    pub open_error: Option<String>,
    pub idle_error: Option<String>,
    pub selector_error: Option<String>,
    pub query_error: Option<String>,
    /// When false, the selector wait never completes
    pub selector_appears: bool,
    pub calls: Mutex<Vec<String>>,
}

impl FakePage {
    pub fn with_matches(matches: &[&str]) -> Self {
        Self {
            matches: matches.iter().map(|s| s.to_string()).collect(),
            selector_appears: true,
            ..Default::default()
        }
    }

    pub fn unreachable() -> Self {
        Self {
            open_error: Some("net::ERR_NAME_NOT_RESOLVED".to_string()),
            ..Default::default()
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: impl Into<String>) {
        self.calls.lock().unwrap().push(call.into());
    }
}

#[async_trait]
impl PageRenderer for FakePage {
    async fn open(&self, url: &str) -> Result<()> {
        self.record(format!("open {}", url));
        match &self.open_error {
            Some(e) => Err(SnipsheetError::navigation(url, e.clone())),
            None => Ok(()),
        }
    }

    async fn wait_for_network_idle(&self) -> Result<()> {
        self.record("networkidle");
        match &self.idle_error {
            Some(e) => Err(SnipsheetError::browser(e.clone())),
            None => Ok(()),
        }
    }

    async fn wait_for_selector(&self, selector: &str) -> Result<()> {
        self.record(format!("wait {}", selector));
        if let Some(e) = &self.selector_error {
            return Err(SnipsheetError::query(selector, e.clone()));
        }
        if !self.selector_appears {
            std::future::pending::<()>().await;
        }
        Ok(())
    }

    async fn inner_html_all(&self, selector: &str) -> Result<Vec<String>> {
        self.record(format!("query {}", selector));
        match &self.query_error {
            Some(e) => Err(SnipsheetError::query(selector, e.clone())),
            None => Ok(self.matches.clone()),
        }
    }

    async fn close(&self) -> Result<()> {
        self.record("close");
        Ok(())
    }
}

/// One spreadsheet with tabs of column-A values
pub struct FakeSheets {
    pub spreadsheet_id: String,
    pub tabs: Mutex<HashMap<String, Vec<String>>>,
    pub created: Mutex<Vec<(String, GridSize)>>,
    pub calls: Mutex<Vec<String>>,
    pub read_only: bool,
}

impl FakeSheets {
    pub fn new(spreadsheet_id: &str) -> Self {
        Self {
            spreadsheet_id: spreadsheet_id.to_string(),
            tabs: Mutex::new(HashMap::new()),
            created: Mutex::new(Vec::new()),
            calls: Mutex::new(Vec::new()),
            read_only: false,
        }
    }

    pub fn with_tab(self, title: &str, rows: &[&str]) -> Self {
        self.tabs.lock().unwrap().insert(
            title.to_string(),
            rows.iter().map(|s| s.to_string()).collect(),
        );
        self
    }

    pub fn column(&self, title: &str) -> Option<Vec<String>> {
        self.tabs.lock().unwrap().get(title).cloned()
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn check(&self, spreadsheet_id: &str, call: String) -> Result<()> {
        self.calls.lock().unwrap().push(call);
        if spreadsheet_id != self.spreadsheet_id {
            return Err(SnipsheetError::SpreadsheetNotFound(format!(
                "Requested entity was not found: {}",
                spreadsheet_id
            )));
        }
        Ok(())
    }

    fn check_writable(&self) -> Result<()> {
        if self.read_only {
            return Err(SnipsheetError::PermissionDenied(
                "The caller does not have permission".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl SpreadsheetService for FakeSheets {
    async fn tab_titles(&self, spreadsheet_id: &str) -> Result<Vec<String>> {
        self.check(spreadsheet_id, "titles".to_string())?;
        let mut titles: Vec<String> = self.tabs.lock().unwrap().keys().cloned().collect();
        titles.sort();
        Ok(titles)
    }

    async fn add_tab(&self, spreadsheet_id: &str, title: &str, size: GridSize) -> Result<()> {
        self.check(spreadsheet_id, format!("add {}", title))?;
        self.check_writable()?;
        self.tabs
            .lock()
            .unwrap()
            .insert(title.to_string(), Vec::new());
        self.created
            .lock()
            .unwrap()
            .push((title.to_string(), size));
        Ok(())
    }

    async fn clear_tab(&self, spreadsheet_id: &str, title: &str) -> Result<()> {
        self.check(spreadsheet_id, format!("clear {}", title))?;
        self.check_writable()?;
        if let Some(rows) = self.tabs.lock().unwrap().get_mut(title) {
            rows.clear();
        }
        Ok(())
    }

    async fn write_column(
        &self,
        spreadsheet_id: &str,
        title: &str,
        rows: &[String],
    ) -> Result<()> {
        self.check(spreadsheet_id, format!("write {} {}", title, rows.len()))?;
        self.check_writable()?;
        let mut tabs = self.tabs.lock().unwrap();
        let column = tabs.entry(title.to_string()).or_default();
        // Overwrites from A1 down; anything below stays
        for (i, row) in rows.iter().enumerate() {
            if i < column.len() {
                column[i] = row.clone();
            } else {
                column.push(row.clone());
            }
        }
        Ok(())
    }
}

pub const SHEET_ID: &str = "sheet-123";
pub const TAB: &str = "Scrapes";
pub const MARKER: &str = "NO MATCHES FOUND";

pub fn fetch_options(policy: WaitPolicy) -> FetchOptions {
    FetchOptions {
        wait_timeout: Duration::from_millis(50),
        wait_policy: policy,
    }
}

pub fn writer_options() -> WriterOptions {
    WriterOptions {
        new_tab_size: GridSize::default(),
        empty_marker: MARKER.to_string(),
    }
}

pub fn pipeline(page: FakePage, sheets: FakeSheets) -> Pipeline<FakePage, FakeSheets> {
    pipeline_with_policy(page, sheets, WaitPolicy::Warn)
}

pub fn pipeline_with_policy(
    page: FakePage,
    sheets: FakeSheets,
    policy: WaitPolicy,
) -> Pipeline<FakePage, FakeSheets> {
    Pipeline::new(
        PageFetcher::new(page, fetch_options(policy)),
        SheetWriter::new(sheets, SheetHandle::new(SHEET_ID, TAB), writer_options()),
    )
}
