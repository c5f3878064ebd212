//! tardiff-tools
//!
//! Positional comparison of two tar archives.
//!
//! Both archives are walked in lockstep. Each pair of entries is first
//! compared by name and declared size; only when those match is the
//! content read, chunk by chunk, until the first difference.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use tardiff_tools::{ArchiveDiff, CompareOptions};
//!
//! let diff = ArchiveDiff::new(CompareOptions::default())?;
//! let report = diff.compare_files(Path::new("before.tar"), Path::new("after.tar"))?;
//! print!("{}", report);
//! # Ok::<(), tardiff_core::Error>(())
//! ```

pub mod compare;
pub mod diff;
pub mod options;

pub use compare::{bytes_equal, ContentComparison, EntryComparator, MismatchReason};
pub use diff::ArchiveDiff;
pub use options::{CompareOptions, DEFAULT_CHUNK_SIZE};
