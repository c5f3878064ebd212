//! Lockstep walk over two tar archives

use std::io::Read;
use std::path::Path;
use std::time::Instant;

use tracing::{debug, info, info_span};

use tardiff_core::{ArchiveSide, DiffReport, EntryDiff, Error, Result};
use tardiff_parsers::{TarEntries, TarEntry, TarReader};

use crate::compare::EntryComparator;
use crate::options::CompareOptions;

/// Compares two tar archives entry by entry, by position
///
/// The walk stops as soon as either archive ends. Entries are paired by
/// position only; a renamed or inserted entry shifts every later pair.
#[derive(Debug, Clone, Default)]
pub struct ArchiveDiff {
    options: CompareOptions,
}

impl ArchiveDiff {
    /// Create a differ, rejecting invalid options
    pub fn new(options: CompareOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    /// Compare two archive files
    ///
    /// Both files are closed on every exit path when their readers drop.
    pub fn compare_files(&self, first: &Path, second: &Path) -> Result<DiffReport> {
        let _span = info_span!("compare", first = %first.display(), second = %second.display()).entered();

        let first_reader = TarReader::open(first).map_err(|e| Error::open_failure(ArchiveSide::First, first, e))?;
        let second_reader =
            TarReader::open(second).map_err(|e| Error::open_failure(ArchiveSide::Second, second, e))?;

        self.walk(first_reader, second_reader)
    }

    /// Compare two archives from already open byte streams
    pub fn compare_readers<A: Read, B: Read>(&self, first: A, second: B) -> Result<DiffReport> {
        self.walk(TarReader::new(first), TarReader::new(second))
    }

    fn walk<A: Read, B: Read>(&self, mut first: TarReader<A>, mut second: TarReader<B>) -> Result<DiffReport> {
        let start = Instant::now();
        info!(chunk_size = self.options.chunk_size, "Comparing archives");

        let mut first_entries = first.entries().map_err(|e| Error::malformed(ArchiveSide::First, e))?;
        let mut second_entries = second.entries().map_err(|e| Error::malformed(ArchiveSide::Second, e))?;

        let mut comparator = EntryComparator::new(self.options.chunk_size);
        let mut report = DiffReport::new();

        loop {
            let Some(mut first_entry) = advance(&mut first_entries, ArchiveSide::First)? else {
                debug!(pairs = report.entries_compared, "First archive ended");
                if self.options.report_unmatched {
                    push_unmatched(&mut report, &mut second_entries, ArchiveSide::Second)?;
                }
                break;
            };

            let Some(mut second_entry) = advance(&mut second_entries, ArchiveSide::Second)? else {
                debug!(pairs = report.entries_compared, "Second archive ended");
                if self.options.report_unmatched {
                    report.push(EntryDiff::unmatched(first_entry.path(), ArchiveSide::First));
                    push_unmatched(&mut report, &mut first_entries, ArchiveSide::First)?;
                }
                break;
            };

            report.entries_compared += 1;
            if let Some(diff) = comparator.compare_entries(&mut first_entry, &mut second_entry) {
                report.push(diff);
            }
        }

        let (size, content, unmatched) = report.counts();
        info!(
            pairs = report.entries_compared,
            size_diffs = size,
            content_diffs = content,
            unmatched,
            elapsed = ?start.elapsed(),
            "Comparison complete"
        );

        Ok(report)
    }
}

fn advance<'a, R: Read>(entries: &mut TarEntries<'a, R>, side: ArchiveSide) -> Result<Option<TarEntry<'a, R>>> {
    entries.next_entry().map_err(|e| Error::malformed(side, e))
}

fn push_unmatched<R: Read>(report: &mut DiffReport, entries: &mut TarEntries<'_, R>, side: ArchiveSide) -> Result<()> {
    let headers = entries.remaining_headers().map_err(|e| Error::malformed(side, e))?;
    for header in headers {
        report.push(EntryDiff::unmatched(header.path, side));
    }
    Ok(())
}
