// tardiff-parsers/src/tarfile/entry.rs
//! Tar archive entry structures

use std::io::{self, Read};

use super::SharedSource;

/// Header metadata for one archive member
///
/// Immutable once read; the name and size are what positional comparison keys on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TarEntryHeader {
    /// Full path within the archive, lossily decoded for display
    pub path: String,
    /// Path bytes exactly as stored, after long-name and PAX resolution
    pub raw_path: Vec<u8>,
    /// Declared content length in bytes
    pub size: u64,
}

impl TarEntryHeader {
    /// Build a header from the raw path bytes and declared size
    pub fn new(raw_path: impl Into<Vec<u8>>, size: u64) -> Self {
        let raw_path = raw_path.into();
        Self {
            path: String::from_utf8_lossy(&raw_path).into_owned(),
            raw_path,
            size,
        }
    }

    /// Name bytes and declared size both match
    ///
    /// Names are compared as stored, so two names that decode to the same
    /// display string are still distinct.
    pub fn same_identity(&self, other: &TarEntryHeader) -> bool {
        self.raw_path == other.raw_path && self.size == other.size
    }

    pub(crate) fn from_entry<R: Read>(entry: &tar::Entry<'_, R>) -> Self {
        Self::new(entry.path_bytes().into_owned(), entry.size())
    }
}

/// One entry of an archive being walked
///
/// Reading yields exactly the entry's content bytes; the archive's block
/// padding is never exposed. Dropping the entry and advancing the stream
/// skips whatever content was not read.
pub struct TarEntry<'a, R: 'a + Read> {
    header: TarEntryHeader,
    inner: tar::Entry<'a, SharedSource<R>>,
}

impl<'a, R: 'a + Read> TarEntry<'a, R> {
    pub(crate) fn new(inner: tar::Entry<'a, SharedSource<R>>) -> Self {
        Self {
            header: TarEntryHeader::from_entry(&inner),
            inner,
        }
    }

    /// Header metadata
    pub fn header(&self) -> &TarEntryHeader {
        &self.header
    }

    /// Entry path
    pub fn path(&self) -> &str {
        &self.header.path
    }

    /// Declared content length
    pub fn size(&self) -> u64 {
        self.header.size
    }
}

impl<'a, R: 'a + Read> Read for TarEntry<'a, R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        self.inner.read(buf)
    }
}
