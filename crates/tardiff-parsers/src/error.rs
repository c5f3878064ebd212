//! Errors raised while walking a tar archive

use thiserror::Error;

/// Errors that can occur while reading archive headers
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Header block is corrupt, truncated or unreadable, or the
    /// end-of-archive marker is damaged
    #[error("invalid header for entry {index}: {source}")]
    InvalidHeader {
        index: usize,
        #[source]
        source: std::io::Error,
    },
}

impl ParseError {
    /// Index of the entry whose header failed, if known
    pub fn entry_index(&self) -> Option<usize> {
        match self {
            ParseError::InvalidHeader { index, .. } => Some(*index),
            ParseError::Io(_) => None,
        }
    }
}

/// Result type alias for parsing operations
pub type ParseResult<T> = Result<T, ParseError>;
