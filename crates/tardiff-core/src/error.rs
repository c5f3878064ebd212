//! Unified error handling for tardiff
//!
//! Errors that abort a comparison run live here. Per-entry content read
//! failures are not errors at this level; the comparator folds them into
//! the report as content differences.

use std::path::PathBuf;
use thiserror::Error;

use crate::types::ArchiveSide;

/// Boxed error from a lower layer (archive reader, serializer, ...)
pub type BoxedSource = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Unified error type for all tardiff operations
#[derive(Error, Debug)]
pub enum Error {
    // ==================== I/O Errors ====================

    /// An input archive could not be opened for reading
    #[error("failed to open {side} {}: {source}", path.display())]
    OpenFailure {
        side: ArchiveSide,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ==================== Archive Errors ====================

    /// A header could not be read for a reason other than end of archive
    #[error("error reading {side} tar: {source}")]
    MalformedContainer {
        side: ArchiveSide,
        #[source]
        source: BoxedSource,
    },

    // ==================== Configuration Errors ====================

    /// Invalid configuration
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        message: String,
    },

    // ==================== Output Errors ====================

    /// Report could not be serialized
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type using the unified Error
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create an open failure for one side of the comparison
    pub fn open_failure(side: ArchiveSide, path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::OpenFailure {
            side,
            path: path.into(),
            source,
        }
    }

    /// Create a malformed container error for one side of the comparison
    pub fn malformed(side: ArchiveSide, source: impl Into<BoxedSource>) -> Self {
        Error::MalformedContainer {
            side,
            source: source.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn invalid_config(message: impl Into<String>) -> Self {
        Error::InvalidConfig {
            message: message.into(),
        }
    }

    /// The archive this error is attributed to
    pub fn side(&self) -> Option<ArchiveSide> {
        match self {
            Error::OpenFailure { side, .. } | Error::MalformedContainer { side, .. } => Some(*side),
            _ => None,
        }
    }

    /// Check if this is an open failure
    pub fn is_open_failure(&self) -> bool {
        matches!(self, Error::OpenFailure { .. })
    }

    /// Check if this is a container parse error
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Error::MalformedContainer { .. })
    }
}
