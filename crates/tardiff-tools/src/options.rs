//! Comparison options

use tardiff_core::{Error, Result};

/// Default number of bytes read from each entry per lockstep step
pub const DEFAULT_CHUNK_SIZE: usize = 8192;

/// Configuration for one comparison run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompareOptions {
    /// Bytes read from each side per content comparison step
    pub chunk_size: usize,
    /// Report entries left over in the longer archive instead of
    /// stopping silently when the shorter one ends
    pub report_unmatched: bool,
}

impl Default for CompareOptions {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            report_unmatched: false,
        }
    }
}

impl CompareOptions {
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_report_unmatched(mut self, report_unmatched: bool) -> Self {
        self.report_unmatched = report_unmatched;
        self
    }

    /// Reject settings the walker cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::invalid_config("chunk size must be greater than zero"));
        }
        Ok(())
    }
}
