//! Entry comparison
//!
//! Decides whether one positionally paired pair of entries is equal.
//!
//! ```text
//! HeaderCheck ──names/sizes differ──> HeaderMismatch
//!      │
//!      └──match──> ContentCheck ──chunk pair differs──> ContentMismatch
//!                       │  ▲
//!                       └──┘ chunks equal
//!                       │
//!                       └──both ended──> Equal
//! ```

use std::io::{self, Read};

use tracing::{debug, warn};

use tardiff_core::{ArchiveSide, EntryDiff};
use tardiff_parsers::{TarEntry, TarEntryHeader};

/// Byte-for-byte equality of two buffers
///
/// Lengths are checked first, explicitly, so buffers of different lengths
/// are reported unequal without any byte being compared.
pub fn bytes_equal(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a == b
}

/// Why a content comparison stopped early
#[derive(Debug)]
pub enum MismatchReason {
    /// One side ran out of content before the other
    LengthDiffers { first: usize, second: usize },
    /// A chunk pair differs
    BytesDiffer,
    /// Reading one side failed; counted as a difference, not an error
    ReadFailed { side: ArchiveSide, error: io::Error },
}

/// Outcome of reading two entries' content in lockstep
#[derive(Debug)]
pub enum ContentComparison {
    Equal { bytes: u64 },
    Mismatch {
        /// Offset of the chunk where the difference was detected
        offset: u64,
        reason: MismatchReason,
    },
}

impl ContentComparison {
    pub fn is_equal(&self) -> bool {
        matches!(self, ContentComparison::Equal { .. })
    }
}

/// Compares paired entries, reusing its chunk buffers across entries
pub struct EntryComparator {
    first_buf: Vec<u8>,
    second_buf: Vec<u8>,
}

impl EntryComparator {
    /// Create a comparator reading `chunk_size` bytes per side per step
    pub fn new(chunk_size: usize) -> Self {
        let chunk_size = chunk_size.max(1);
        Self {
            first_buf: vec![0; chunk_size],
            second_buf: vec![0; chunk_size],
        }
    }

    /// Compare two walked tar entries
    pub fn compare_entries<A: Read, B: Read>(
        &mut self,
        first: &mut TarEntry<'_, A>,
        second: &mut TarEntry<'_, B>,
    ) -> Option<EntryDiff> {
        let first_header = first.header().clone();
        let second_header = second.header().clone();
        self.compare(&first_header, first, &second_header, second)
    }

    /// Classify one pair of entries
    ///
    /// `first` and `second` must be positioned at the start of each entry's
    /// content. They are not touched at all when the headers differ.
    pub fn compare<A: Read, B: Read>(
        &mut self,
        first_header: &TarEntryHeader,
        first: A,
        second_header: &TarEntryHeader,
        second: B,
    ) -> Option<EntryDiff> {
        if !first_header.same_identity(second_header) {
            debug!(
                first = %first_header.path,
                second = %second_header.path,
                first_size = first_header.size,
                second_size = second_header.size,
                "Header mismatch"
            );
            return Some(EntryDiff::size(first_header.path.clone()));
        }

        match self.compare_content(first, second) {
            ContentComparison::Equal { bytes } => {
                debug!(path = %first_header.path, bytes, "Entries equal");
                None
            }
            ContentComparison::Mismatch { offset, reason } => {
                match &reason {
                    MismatchReason::ReadFailed { side, error } => warn!(
                        path = %first_header.path,
                        side = %side,
                        offset,
                        error = %error,
                        "Content read failed; reporting entry as different"
                    ),
                    _ => debug!(path = %first_header.path, offset, ?reason, "Content mismatch"),
                }
                Some(EntryDiff::content(first_header.path.clone()))
            }
        }
    }

    /// Read both streams chunk by chunk until they end together or differ
    ///
    /// Stops at the first difference without draining the rest.
    pub fn compare_content<A: Read, B: Read>(&mut self, mut first: A, mut second: B) -> ContentComparison {
        let mut offset = 0u64;

        loop {
            let first_read = read_chunk(&mut first, &mut self.first_buf);
            let second_read = read_chunk(&mut second, &mut self.second_buf);

            let (n1, n2) = match (first_read, second_read) {
                (Err(error), _) => {
                    return ContentComparison::Mismatch {
                        offset,
                        reason: MismatchReason::ReadFailed { side: ArchiveSide::First, error },
                    };
                }
                (_, Err(error)) => {
                    return ContentComparison::Mismatch {
                        offset,
                        reason: MismatchReason::ReadFailed { side: ArchiveSide::Second, error },
                    };
                }
                (Ok(n1), Ok(n2)) => (n1, n2),
            };

            if n1 == 0 && n2 == 0 {
                return ContentComparison::Equal { bytes: offset };
            }

            if n1 != n2 {
                return ContentComparison::Mismatch {
                    offset,
                    reason: MismatchReason::LengthDiffers { first: n1, second: n2 },
                };
            }

            if !bytes_equal(&self.first_buf[..n1], &self.second_buf[..n2]) {
                return ContentComparison::Mismatch {
                    offset,
                    reason: MismatchReason::BytesDiffer,
                };
            }

            offset += n1 as u64;
        }
    }
}

/// Fill `buf` from `reader` until it is full or the reader is exhausted
///
/// Returns the number of bytes read; 0 means end of content.
fn read_chunk<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}
