//! Core module - shared infrastructure for snipsheet
//!
//! This module contains foundational types, configuration, and error handling
//! used by the fetch and sheet stages.

pub mod config;
pub mod error;
pub mod types;

pub use config::Config;
pub use error::{Result, SnipsheetError};
pub use types::*;
