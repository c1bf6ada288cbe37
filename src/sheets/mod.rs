//! Sheets module - spreadsheet output
//!
//! Service account auth, the Sheets REST client, and the tab writer.

pub mod a1;
pub mod auth;
mod client;
mod service;
mod writer;

pub use auth::{ServiceAccountKey, ServiceAccountTokenSource, StaticToken, TokenSource};
pub use client::SheetsClient;
pub use service::SpreadsheetService;
pub use writer::{column_rows, SheetWriter, WriterOptions};
