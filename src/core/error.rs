//! Custom error types for snipsheet
//!
//! One error enum shared by the fetch and sheet stages.

use thiserror::Error;

/// Main error type for snipsheet operations
#[derive(Error, Debug)]
pub enum SnipsheetError {
    /// Browser automation errors
    #[error("Browser error: {0}")]
    Browser(String),

    /// agent-browser not installed
    #[error("agent-browser not found. Install with: npm install -g agent-browser && agent-browser install")]
    AgentBrowserNotFound,

    /// The page could not be loaded
    #[error("Failed to load {url}: {message}")]
    Navigation { url: String, message: String },

    /// The DOM query failed (usually a malformed selector)
    #[error("Query for '{selector}' failed: {message}")]
    Query { selector: String, message: String },

    /// The selector never appeared and the wait policy is `fail`
    #[error("Selector '{selector}' did not appear within {timeout_ms}ms")]
    SelectorTimeout { selector: String, timeout_ms: u64 },

    /// Token exchange or bearer token rejected
    #[error("Authentication error: {0}")]
    Auth(String),

    /// Service account credential missing or malformed
    #[error("Credentials error: {0}")]
    Credentials(String),

    /// Spreadsheet id does not resolve
    #[error("Spreadsheet not found: {0}")]
    SpreadsheetNotFound(String),

    /// Credential lacks access to the spreadsheet
    #[error("Permission denied: {0}")]
    PermissionDenied(String),

    /// Any other Sheets API failure
    #[error("Sheets API error (status {status}): {message}")]
    SheetsApi { status: u16, message: String },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// HTTP request errors
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing errors
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),

    /// JWT signing errors
    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),

    /// Generic error with context
    #[error("{context}: {source}")]
    WithContext {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

/// Convenience Result type for snipsheet operations
pub type Result<T> = std::result::Result<T, SnipsheetError>;

impl SnipsheetError {
    /// Create a browser error
    pub fn browser(msg: impl Into<String>) -> Self {
        Self::Browser(msg.into())
    }

    /// Create a navigation error
    pub fn navigation(url: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Navigation {
            url: url.into(),
            message: msg.into(),
        }
    }

    /// Create a query error
    pub fn query(selector: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::Query {
            selector: selector.into(),
            message: msg.into(),
        }
    }

    /// Create an auth error
    pub fn auth(msg: impl Into<String>) -> Self {
        Self::Auth(msg.into())
    }

    /// Create a credentials error
    pub fn credentials(msg: impl Into<String>) -> Self {
        Self::Credentials(msg.into())
    }

    /// Create a config error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Wrap an error with additional context
    pub fn with_context<E>(context: impl Into<String>, error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::WithContext {
            context: context.into(),
            source: Box::new(error),
        }
    }

    /// Map a non-success Sheets API status to an error
    pub fn from_sheets_status(status: u16, message: impl Into<String>) -> Self {
        let message = message.into();
        match status {
            401 => Self::Auth(message),
            403 => Self::PermissionDenied(message),
            404 => Self::SpreadsheetNotFound(message),
            _ => Self::SheetsApi { status, message },
        }
    }
}
