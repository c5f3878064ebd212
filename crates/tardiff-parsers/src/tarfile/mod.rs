// tardiff-parsers/src/tarfile/mod.rs
//! Tar Archive Reader
//!
//! A tar archive is a forward-only sequence of 512-byte blocks. Each member
//! is a header block followed by its content, padded to the block size.
//! The archive ends with two zero-filled blocks.
//!
//! # Format Structure
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! |                         Tar Archive                         |
//! ├─────────────────────────────────────────────────────────────┤
//! │  ┌─────────────────┐┌─────────────────────────────────────┐ │
//! │  │ Header (512 B)  ││ Content (size B, padded to 512)     │ │
//! │  │  - name         │└─────────────────────────────────────┘ │
//! │  │  - size (octal) │                                        │
//! │  │  - typeflag     │  ... repeated for every member ...     │
//! │  │  - checksum     │                                        │
//! │  └─────────────────┘                                        │
//! │  ┌─────────────────────────────────────────────────────────┐│
//! │  │            End of archive: 2 x 512 zero bytes           ││
//! │  └─────────────────────────────────────────────────────────┘│
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! GNU long-name records and PAX extended headers are folded into the
//! member that follows them and never surface as entries of their own.

mod entry;

pub use entry::{TarEntry, TarEntryHeader};

use std::cell::RefCell;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;
use std::rc::Rc;

use tracing::{debug, trace};

use crate::error::{ParseError, ParseResult};

/// Size of one tar block
pub const BLOCK_SIZE: usize = 512;

/// Byte source shared between the `tar` reader and the end-of-archive check
pub(crate) struct SharedSource<R>(Rc<RefCell<R>>);

impl<R: Read> Read for SharedSource<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.0.borrow_mut().read(buf)
    }
}

/// Forward-only reader over one tar archive
///
/// Owns the underlying stream; dropping the reader closes it.
pub struct TarReader<R: Read> {
    archive: tar::Archive<SharedSource<R>>,
    source: Rc<RefCell<R>>,
}

impl TarReader<BufReader<File>> {
    /// Open an archive file for reading
    ///
    /// Only the open itself can fail here; the archive is not inspected
    /// until entries are read.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        debug!(path = %path.display(), "Opened tar archive");
        Ok(Self::new(BufReader::new(file)))
    }
}

impl<R: Read> TarReader<R> {
    /// Wrap an already open byte stream
    pub fn new(reader: R) -> Self {
        let source = Rc::new(RefCell::new(reader));
        Self {
            archive: tar::Archive::new(SharedSource(Rc::clone(&source))),
            source,
        }
    }

    /// Start walking the archive's entries
    ///
    /// May only be called once per archive; the stream is consumed.
    pub fn entries(&mut self) -> ParseResult<TarEntries<'_, R>> {
        let inner = self.archive.entries().map_err(ParseError::Io)?;
        Ok(TarEntries {
            inner,
            source: Rc::clone(&self.source),
            index: 0,
            finished: false,
        })
    }
}

/// Stream of entries from a [`TarReader`]
pub struct TarEntries<'a, R: 'a + Read> {
    inner: tar::Entries<'a, SharedSource<R>>,
    source: Rc<RefCell<R>>,
    index: usize,
    finished: bool,
}

impl<'a, R: 'a + Read> TarEntries<'a, R> {
    /// Advance to the next entry header
    ///
    /// Returns `Ok(None)` at the natural end of the archive: two zero
    /// blocks, or a zero block followed by end of input, or end of input
    /// at a block boundary. Any other failure (bad checksum, short block,
    /// a zero block followed by data, I/O error) is an error, after which
    /// the stream stays finished.
    pub fn next_entry(&mut self) -> ParseResult<Option<TarEntry<'a, R>>> {
        if self.finished {
            return Ok(None);
        }

        match self.inner.next() {
            None => {
                self.finished = true;
                self.check_end_marker()?;
                trace!(entries = self.index, "End of archive");
                Ok(None)
            }
            Some(Err(source)) => {
                self.finished = true;
                Err(self.invalid_header(source))
            }
            Some(Ok(raw)) => {
                let entry = TarEntry::new(raw);
                trace!(
                    index = self.index,
                    path = %entry.path(),
                    size = entry.size(),
                    "Read entry header"
                );
                self.index += 1;
                Ok(Some(entry))
            }
        }
    }

    /// Drain the remaining headers, returning them in order
    pub fn remaining_headers(&mut self) -> ParseResult<Vec<TarEntryHeader>> {
        let mut headers = Vec::new();
        while let Some(entry) = self.next_entry()? {
            headers.push(entry.header().clone());
        }
        Ok(headers)
    }

    /// Check the block after the one that ended the `tar` stream
    ///
    /// `tar` stops at the first zero block. The archive really ends only if
    /// the next block is zero too, or if input ends there.
    fn check_end_marker(&self) -> ParseResult<()> {
        let mut block = Vec::with_capacity(BLOCK_SIZE);
        let read = {
            let mut source = self.source.borrow_mut();
            let read = source.by_ref().take(BLOCK_SIZE as u64).read_to_end(&mut block);
            read
        };
        read.map_err(|e| self.invalid_header(e))?;

        if block.is_empty() || (block.len() == BLOCK_SIZE && block.iter().all(|&b| b == 0)) {
            return Ok(());
        }

        let message = if block.len() < BLOCK_SIZE {
            "truncated end-of-archive marker"
        } else {
            "zero block followed by data"
        };
        Err(self.invalid_header(io::Error::new(io::ErrorKind::InvalidData, message)))
    }

    fn invalid_header(&self, source: io::Error) -> ParseError {
        ParseError::InvalidHeader {
            index: self.index,
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn build_archive(files: &[(&str, &[u8])]) -> Vec<u8> {
        let mut builder = tar::Builder::new(Vec::new());
        for (path, data) in files {
            let mut header = tar::Header::new_gnu();
            header.set_size(data.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder.append_data(&mut header, path, *data).unwrap();
        }
        builder.into_inner().unwrap()
    }

    #[test]
    fn test_walks_entries_in_order() {
        let data = build_archive(&[("a.txt", b"hello"), ("dir/b.bin", b""), ("c.txt", b"xyz")]);
        let mut reader = TarReader::new(&data[..]);
        let mut entries = reader.entries().unwrap();

        let headers = entries.remaining_headers().unwrap();
        let summary: Vec<_> = headers.iter().map(|h| (h.path.as_str(), h.size)).collect();
        assert_eq!(summary, [("a.txt", 5), ("dir/b.bin", 0), ("c.txt", 3)]);
        assert!(entries.next_entry().unwrap().is_none());
    }

    #[test]
    fn test_entry_reads_exact_content() {
        let data = build_archive(&[("a.txt", b"hello"), ("b.txt", b"world!")]);
        let mut reader = TarReader::new(&data[..]);
        let mut entries = reader.entries().unwrap();

        let mut first = entries.next_entry().unwrap().unwrap();
        let mut content = Vec::new();
        first.read_to_end(&mut content).unwrap();
        assert_eq!(content, b"hello");
        drop(first);

        let mut second = entries.next_entry().unwrap().unwrap();
        content.clear();
        second.read_to_end(&mut content).unwrap();
        assert_eq!(content, b"world!");
    }

    #[test]
    fn test_unread_content_is_skipped() {
        let big = vec![7u8; 3 * BLOCK_SIZE + 17];
        let data = build_archive(&[("big.bin", &big), ("next.txt", b"ok")]);
        let mut reader = TarReader::new(&data[..]);
        let mut entries = reader.entries().unwrap();

        let mut first = entries.next_entry().unwrap().unwrap();
        let mut partial = [0u8; 10];
        first.read_exact(&mut partial).unwrap();
        drop(first);

        let second = entries.next_entry().unwrap().unwrap();
        assert_eq!(second.path(), "next.txt");
    }

    #[test]
    fn test_empty_archive() {
        let data = vec![0u8; 2 * BLOCK_SIZE];
        let mut reader = TarReader::new(&data[..]);
        let mut entries = reader.entries().unwrap();
        assert!(entries.next_entry().unwrap().is_none());
    }

    #[test]
    fn test_long_gnu_name_is_resolved() {
        let long_name = format!("{}/file.txt", "nested".repeat(30));
        let data = build_archive(&[(long_name.as_str(), b"data")]);
        let mut reader = TarReader::new(&data[..]);
        let mut entries = reader.entries().unwrap();

        let entry = entries.next_entry().unwrap().unwrap();
        assert_eq!(entry.path(), long_name);
        assert_eq!(entry.header().raw_path, long_name.as_bytes());
        drop(entry);
        assert!(entries.next_entry().unwrap().is_none());
    }

    #[test]
    fn test_corrupt_header_is_error() {
        let mut data = build_archive(&[("a.txt", b"hello"), ("b.txt", b"world")]);
        // Second header starts after the first header and one content block
        data[2 * BLOCK_SIZE] ^= 0x20;

        let mut reader = TarReader::new(&data[..]);
        let mut entries = reader.entries().unwrap();
        assert!(entries.next_entry().unwrap().is_some());

        let err = entries.next_entry().err().expect("corrupt header should fail");
        assert_eq!(err.entry_index(), Some(1));
        assert!(entries.next_entry().unwrap().is_none());
    }

    #[test]
    fn test_truncated_block_is_error() {
        let mut data = build_archive(&[("a.txt", b"hello")]);
        data.truncate(2 * BLOCK_SIZE);
        data.extend_from_slice(&[0xAB; 100]);

        let mut reader = TarReader::new(&data[..]);
        let mut entries = reader.entries().unwrap();
        assert!(entries.next_entry().unwrap().is_some());
        assert!(entries.next_entry().is_err());
    }

    /// Archive holding `a.txt`, then a single zero block, then whatever follows
    fn archive_with_one_zero_block(tail: &[u8]) -> Vec<u8> {
        let full = build_archive(&[("a.txt", b"hello")]);
        let mut data = full[..3 * BLOCK_SIZE].to_vec();
        data.extend_from_slice(tail);
        data
    }

    #[test]
    fn test_zero_block_followed_by_data_is_error() {
        let trailing = build_archive(&[("b.txt", b"hidden")]);
        let data = archive_with_one_zero_block(&trailing);

        let mut reader = TarReader::new(&data[..]);
        let mut entries = reader.entries().unwrap();
        assert_eq!(entries.next_entry().unwrap().unwrap().path(), "a.txt");

        let err = entries.next_entry().err().expect("data after a zero block should fail");
        assert_eq!(err.entry_index(), Some(1));
        assert!(err.to_string().contains("zero block followed by data"));
    }

    #[test]
    fn test_zero_block_then_end_of_input() {
        let data = archive_with_one_zero_block(&[]);
        let mut reader = TarReader::new(&data[..]);
        let mut entries = reader.entries().unwrap();

        assert!(entries.next_entry().unwrap().is_some());
        assert!(entries.next_entry().unwrap().is_none());
    }

    #[test]
    fn test_missing_end_marker() {
        let full = build_archive(&[("a.txt", b"hello")]);
        let data = &full[..2 * BLOCK_SIZE];
        let mut reader = TarReader::new(data);
        let mut entries = reader.entries().unwrap();

        assert!(entries.next_entry().unwrap().is_some());
        assert!(entries.next_entry().unwrap().is_none());
    }

    #[test]
    fn test_truncated_end_marker_is_error() {
        let data = archive_with_one_zero_block(&[0u8; 100]);
        let mut reader = TarReader::new(&data[..]);
        let mut entries = reader.entries().unwrap();

        assert!(entries.next_entry().unwrap().is_some());
        assert!(entries.next_entry().is_err());
    }

    #[test]
    fn test_open_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("one.tar");
        let mut file = File::create(&path).unwrap();
        file.write_all(&build_archive(&[("only.txt", b"1")])).unwrap();
        drop(file);

        let mut reader = TarReader::open(&path).unwrap();
        let mut entries = reader.entries().unwrap();
        assert_eq!(entries.next_entry().unwrap().unwrap().path(), "only.txt");
    }

    #[test]
    fn test_open_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = TarReader::open(dir.path().join("missing.tar")).err().unwrap();
        assert_eq!(err.kind(), std::io::ErrorKind::NotFound);
    }
}
