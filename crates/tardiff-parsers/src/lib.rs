//! tardiff-parsers
//!
//! Forward-only reading of tar archives for positional comparison.
//!
//! # Supported Formats
//!
//! | Format | Extension | Description |
//! |--------|-----------|-------------|
//! | ustar  | `.tar`    | POSIX ustar archive |
//! | GNU    | `.tar`    | GNU tar, including long names |
//! | PAX    | `.tar`    | POSIX.1-2001 extended headers |
//!
//! # Example
//!
//! ```rust,no_run
//! use tardiff_parsers::TarReader;
//!
//! let mut reader = TarReader::open("backup.tar")?;
//! let mut entries = reader.entries()?;
//! while let Some(entry) = entries.next_entry()? {
//!     println!("{} ({} bytes)", entry.header().path, entry.header().size);
//! }
//! # Ok::<(), tardiff_parsers::ParseError>(())
//! ```

pub mod error;
pub mod tarfile;

pub use error::{ParseError, ParseResult};
pub use tarfile::{TarEntries, TarEntry, TarEntryHeader, TarReader, BLOCK_SIZE};
