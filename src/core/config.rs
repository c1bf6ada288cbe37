//! Configuration management for snipsheet
//!
//! Supports environment variables, a config file, and runtime overrides.
//! Every setting has an environment variable; the config file is optional.
//!
//! Config file location: ~/.config/snipsheet/config.toml (or $SNIPSHEET_CONFIG)

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::fmt::Display;
use std::str::FromStr;
use tracing::debug;

use crate::core::error::{Result, SnipsheetError};
use crate::core::types::{GridSize, SheetHandle, Target, WaitPolicy};

/// Selector for the main content column of a WordPress block layout
pub const DEFAULT_SELECTOR: &str = concat!(
    "div.wp-block-column.is-layout-flow.wp-block-column-is-layout-flow",
    r#"[style*="flex-basis"][style*="66.66%"]"#
);

/// Written to A1 when nothing matched
pub const DEFAULT_EMPTY_MARKER: &str = "NO MATCHES FOUND";

/// Sheets v4 spreadsheets collection
pub const DEFAULT_SHEETS_API_BASE: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Main configuration for snipsheet
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// What to scrape
    #[serde(default)]
    pub target: TargetConfig,
    /// Browser configuration
    #[serde(default)]
    pub browser: BrowserConfig,
    /// Where to write
    #[serde(default)]
    pub sheet: SheetConfig,
}

/// Page, selector and selector-wait settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TargetConfig {
    /// Page to load
    pub url: String,
    /// CSS selector whose matches are collected
    pub selector: String,
    /// How long to wait for the first match, in ms
    pub wait_timeout_ms: u64,
    /// What to do when the wait runs out
    pub wait_policy: WaitPolicy,
}

/// Browser automation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserConfig {
    /// agent-browser executable
    pub program: String,
    /// Session name for agent-browser
    pub session_name: String,
    /// Whether to run in headed mode (visible browser)
    pub headed: bool,
}

/// Spreadsheet target configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetConfig {
    /// Spreadsheet id, required
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spreadsheet_id: Option<String>,
    /// Tab to overwrite
    pub tab: String,
    /// Written to A1 when the snippet list is empty
    pub empty_marker: String,
    /// Sheets API base URL
    pub api_base: String,
    /// Size of the tab when it has to be created
    pub new_tab_size: GridSize,
}

fn env_nonempty(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" => Some(true),
        "false" | "0" => Some(false),
        _ => None,
    }
}

fn env_flag(key: &str) -> Option<bool> {
    env_nonempty(key).and_then(|v| parse_flag(&v))
}

fn env_parse<T: FromStr>(key: &str) -> Option<T> {
    env_nonempty(key).and_then(|v| v.trim().parse().ok())
}

/// Fails when `key` is set to something `T` cannot parse
fn check_env_var<T>(key: &str) -> Result<()>
where
    T: FromStr,
    T::Err: Display,
{
    match env_nonempty(key) {
        Some(value) => value.trim().parse::<T>().map(|_| ()).map_err(|e| {
            SnipsheetError::config(format!("{}='{}' is invalid: {}", key, value, e))
        }),
        None => Ok(()),
    }
}

impl Default for TargetConfig {
    fn default() -> Self {
        Self {
            url: env_nonempty("TARGET_URL").unwrap_or_else(|| "https://example.com".to_string()),
            selector: env_nonempty("SNIPSHEET_SELECTOR")
                .unwrap_or_else(|| DEFAULT_SELECTOR.to_string()),
            wait_timeout_ms: env_parse("SNIPSHEET_WAIT_TIMEOUT_MS").unwrap_or(10_000),
            wait_policy: env_parse("SNIPSHEET_WAIT_POLICY").unwrap_or_default(),
        }
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            program: env_nonempty("SNIPSHEET_BROWSER_BIN")
                .unwrap_or_else(|| "agent-browser".to_string()),
            session_name: env_nonempty("SNIPSHEET_BROWSER_SESSION")
                .unwrap_or_else(|| "snipsheet".to_string()),
            headed: env_flag("SNIPSHEET_BROWSER_HEADED").unwrap_or(false),
        }
    }
}

impl Default for SheetConfig {
    fn default() -> Self {
        let defaults = GridSize::default();
        Self {
            spreadsheet_id: env_nonempty("SHEET_ID"),
            tab: env_nonempty("SHEET_TAB").unwrap_or_else(|| "Scrapes".to_string()),
            empty_marker: env_nonempty("SNIPSHEET_EMPTY_MARKER")
                .unwrap_or_else(|| DEFAULT_EMPTY_MARKER.to_string()),
            api_base: DEFAULT_SHEETS_API_BASE.to_string(),
            new_tab_size: GridSize {
                rows: env_parse("SNIPSHEET_TAB_ROWS").unwrap_or(defaults.rows),
                cols: env_parse("SNIPSHEET_TAB_COLS").unwrap_or(defaults.cols),
            },
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("snipsheet")
    }

    /// Get the config file path
    pub fn config_file() -> PathBuf {
        env_nonempty("SNIPSHEET_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|| Self::config_dir().join("config.toml"))
    }

    /// Load configuration from file, environment, and defaults
    /// Priority: CLI args > config file > env vars > defaults
    pub fn load() -> Result<Self> {
        // Try to load .env file if it exists
        if let Ok(path) = dotenvy::dotenv() {
            debug!(path = %path.display(), "Loaded .env");
        }

        Self::check_env()?;

        let path = Self::config_file();
        if path.exists() {
            debug!(
                path = %path.display(),
                "Loading config file; its keys override the environment"
            );
            return Self::load_from_path(&path);
        }

        debug!(path = %path.display(), "No config file, using environment");
        // Fall back to defaults (which respect env vars)
        Ok(Self::default())
    }

    /// Reject typed environment settings that are set but do not parse
    pub fn check_env() -> Result<()> {
        check_env_var::<u64>("SNIPSHEET_WAIT_TIMEOUT_MS")?;
        check_env_var::<WaitPolicy>("SNIPSHEET_WAIT_POLICY")?;
        check_env_var::<u32>("SNIPSHEET_TAB_ROWS")?;
        check_env_var::<u32>("SNIPSHEET_TAB_COLS")?;

        if let Some(value) = env_nonempty("SNIPSHEET_BROWSER_HEADED") {
            if parse_flag(&value).is_none() {
                return Err(SnipsheetError::config(format!(
                    "SNIPSHEET_BROWSER_HEADED='{}' is invalid: expected true, false, 1 or 0",
                    value
                )));
            }
        }

        Ok(())
    }

    /// Load configuration from a TOML file; missing keys fall back to env/defaults
    pub fn load_from_path(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            SnipsheetError::config(format!("Failed to read {}: {}", path.display(), e))
        })?;

        Self::from_toml(&content)
    }

    /// Parse configuration from TOML text
    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| SnipsheetError::config(format!("Failed to parse config: {}", e)))
    }

    /// Render the configuration as TOML
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self)
            .map_err(|e| SnipsheetError::config(format!("Failed to serialize config: {}", e)))
    }

    /// Check everything a run needs before any browser or network work starts
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.target.url).map_err(|e| {
            SnipsheetError::config(format!("Invalid target URL '{}': {}", self.target.url, e))
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(SnipsheetError::config(format!(
                "Target URL must be http or https, got '{}'",
                url.scheme()
            )));
        }

        if self.target.selector.trim().is_empty() {
            return Err(SnipsheetError::config("Selector is empty"));
        }

        self.spreadsheet_id()?;

        if self.sheet.tab.trim().is_empty() {
            return Err(SnipsheetError::config("Tab name is empty"));
        }

        if self.sheet.new_tab_size.rows == 0 || self.sheet.new_tab_size.cols == 0 {
            return Err(SnipsheetError::config("New tab size must be at least 1x1"));
        }

        Ok(())
    }

    /// The required spreadsheet id
    pub fn spreadsheet_id(&self) -> Result<&str> {
        self.sheet
            .spreadsheet_id
            .as_deref()
            .filter(|id| !id.trim().is_empty())
            .ok_or_else(|| SnipsheetError::config("SHEET_ID is not set"))
    }

    /// The page and selector to scrape
    pub fn target(&self) -> Target {
        Target::new(&self.target.url, &self.target.selector)
    }

    /// The tab to write into
    pub fn sheet_handle(&self) -> Result<SheetHandle> {
        Ok(SheetHandle::new(self.spreadsheet_id()?, &self.sheet.tab))
    }
}
