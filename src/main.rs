//! snipsheet - scrape element markup into a Google Sheets tab
//!
//! Main entry point for the CLI application.

use clap::Parser;
use snipsheet::core::WaitPolicy;
use snipsheet::fetch::{AgentBrowser, FetchOptions, PageFetcher};
use snipsheet::sheets::{ServiceAccountKey, SheetWriter, SheetsClient, WriterOptions};
use snipsheet::{Config, Pipeline};
use tracing_subscriber::EnvFilter;

/// Scrape the inner HTML of matching elements into a Google Sheets tab
#[derive(Parser, Debug)]
#[command(name = "snipsheet")]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Page to load (overrides TARGET_URL)
    #[arg(long, short = 'u')]
    url: Option<String>,

    /// CSS selector to collect (overrides SNIPSHEET_SELECTOR)
    #[arg(long, short = 's')]
    selector: Option<String>,

    /// Spreadsheet id (overrides SHEET_ID)
    #[arg(long)]
    sheet_id: Option<String>,

    /// Tab to overwrite (overrides SHEET_TAB)
    #[arg(long, short = 't')]
    tab: Option<String>,

    /// How long to wait for the selector, in ms
    #[arg(long)]
    wait_timeout_ms: Option<u64>,

    /// What to do when the selector never appears: ignore, warn or fail
    #[arg(long)]
    wait_policy: Option<WaitPolicy>,

    /// Run in headed browser mode (visible window)
    #[arg(long)]
    headed: bool,

    /// Enable debug output
    #[arg(long, short = 'd')]
    debug: bool,

    /// Print the effective configuration and exit
    #[arg(long)]
    print_config: bool,
}

fn init_logging(debug: bool) -> anyhow::Result<()> {
    let level = if debug { "snipsheet=debug" } else { "snipsheet=info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();
    init_logging(args.debug)?;

    // Build configuration
    let mut config = Config::load()?;

    // Apply CLI overrides
    if let Some(url) = args.url {
        config.target.url = url;
    }

    if let Some(selector) = args.selector {
        config.target.selector = selector;
    }

    if let Some(sheet_id) = args.sheet_id {
        config.sheet.spreadsheet_id = Some(sheet_id);
    }

    if let Some(tab) = args.tab {
        config.sheet.tab = tab;
    }

    if let Some(ms) = args.wait_timeout_ms {
        config.target.wait_timeout_ms = ms;
    }

    if let Some(policy) = args.wait_policy {
        config.target.wait_policy = policy;
    }

    if args.headed {
        config.browser.headed = true;
    }

    if args.print_config {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    config.validate()?;

    let key = ServiceAccountKey::from_env()?;

    let fetcher = PageFetcher::new(
        AgentBrowser::from_config(&config.browser),
        FetchOptions::from(&config.target),
    );
    let writer = SheetWriter::new(
        SheetsClient::from_config(&config.sheet, key)?,
        config.sheet_handle()?,
        WriterOptions::from(&config.sheet),
    );

    let summary = Pipeline::new(fetcher, writer)
        .run(&config.target())
        .await?;

    println!("{}", summary);
    Ok(())
}
