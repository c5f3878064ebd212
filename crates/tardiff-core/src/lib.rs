//! tardiff Core Library
//!
//! This crate provides the report types, error handling and logging setup
//! shared across all tardiff components.

pub mod error;
pub mod logging;
pub mod report;
pub mod types;

pub use error::{Error, Result};
pub use report::{render, ReportSources};
pub use types::*;
