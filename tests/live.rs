//! Live end-to-end tests
//!
//! Need agent-browser installed and, for the sheet run, SHEET_ID plus a
//! service account credential in the environment.

use snipsheet::core::{Config, Target, WaitPolicy};
use snipsheet::fetch::{AgentBrowser, FetchOptions, PageFetcher};
use snipsheet::sheets::{ServiceAccountKey, SheetWriter, SheetsClient, WriterOptions};
use snipsheet::Pipeline;
use std::time::Duration;
use tokio::time::timeout;

async fn live_browser() -> Option<AgentBrowser> {
    let browser = AgentBrowser::new("snipsheet-live-test");
    if browser.is_available().await {
        Some(browser)
    } else {
        eprintln!("Skipping test: agent-browser not available");
        None
    }
}

/// example.com has exactly one <p> inside its single <div>
#[tokio::test]
#[ignore] // Requires agent-browser to be installed
async fn test_fetch_example_com() {
    let Some(browser) = live_browser().await else {
        return;
    };

    let fetcher = PageFetcher::new(browser, FetchOptions::default());
    let result = timeout(
        Duration::from_secs(60),
        fetcher.fetch(&Target::new("https://example.com", "body > div")),
    )
    .await;

    let snippets = result.expect("Fetch timed out").expect("Fetch failed");
    assert_eq!(snippets.len(), 1);
    assert!(snippets[0].contains("<h1>"));
    assert!(!snippets[0].starts_with("<div"));
}

#[tokio::test]
#[ignore]
async fn test_no_matches_is_empty() {
    let Some(browser) = live_browser().await else {
        return;
    };

    let options = FetchOptions {
        wait_timeout: Duration::from_millis(500),
        wait_policy: WaitPolicy::Ignore,
    };
    let fetcher = PageFetcher::new(browser, options);
    let snippets = timeout(
        Duration::from_secs(60),
        fetcher.fetch(&Target::new("https://example.com", "div.does-not-exist")),
    )
    .await
    .expect("Fetch timed out")
    .expect("Fetch failed");

    assert!(snippets.is_empty());
}

/// Full run into a real spreadsheet tab
#[tokio::test]
#[ignore] // Requires agent-browser, SHEET_ID and service account credentials
async fn test_full_run() {
    let Some(browser) = live_browser().await else {
        return;
    };
    let Ok(config) = Config::load() else {
        eprintln!("Skipping test: config did not load");
        return;
    };
    let (Ok(handle), Ok(key)) = (config.sheet_handle(), ServiceAccountKey::from_env()) else {
        eprintln!("Skipping test: SHEET_ID or credentials missing");
        return;
    };

    let writer = SheetWriter::new(
        SheetsClient::from_config(&config.sheet, key).unwrap(),
        handle,
        WriterOptions::from(&config.sheet),
    );
    let pipeline = Pipeline::new(PageFetcher::new(browser, FetchOptions::default()), writer);

    let summary = timeout(
        Duration::from_secs(120),
        pipeline.run(&Target::new("https://example.com", "body > div")),
    )
    .await
    .expect("Run timed out")
    .expect("Run failed");

    assert_eq!(summary.snippets, 1);
    assert_eq!(summary.write.rows_written, 1);
}
