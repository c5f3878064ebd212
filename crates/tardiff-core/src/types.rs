//! Common types used throughout tardiff

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which of the two compared archives something belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ArchiveSide {
    First,
    Second,
}

impl fmt::Display for ArchiveSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArchiveSide::First => write!(f, "first archive"),
            ArchiveSide::Second => write!(f, "second archive"),
        }
    }
}

/// How a positionally paired entry differs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffKind {
    /// Names or declared sizes differ; content was not read
    Size,
    /// Headers matched but the content bytes differ
    Content,
    /// Entry has no counterpart because the other archive ended first
    Unmatched(ArchiveSide),
}

/// One reported difference
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryDiff {
    /// Entry name, from the first archive's header when both exist
    pub name: String,
    /// Kind of difference
    pub kind: DiffKind,
}

impl EntryDiff {
    pub fn size(name: impl Into<String>) -> Self {
        Self { name: name.into(), kind: DiffKind::Size }
    }

    pub fn content(name: impl Into<String>) -> Self {
        Self { name: name.into(), kind: DiffKind::Content }
    }

    pub fn unmatched(name: impl Into<String>, side: ArchiveSide) -> Self {
        Self { name: name.into(), kind: DiffKind::Unmatched(side) }
    }

    /// Header-level mismatch flag
    pub fn size_differs(&self) -> bool {
        self.kind == DiffKind::Size
    }

    /// Content-level mismatch flag
    pub fn content_differs(&self) -> bool {
        self.kind == DiffKind::Content
    }

    /// Side holding the entry when it has no counterpart
    pub fn unmatched_side(&self) -> Option<ArchiveSide> {
        match self.kind {
            DiffKind::Unmatched(side) => Some(side),
            _ => None,
        }
    }
}

/// Ordered result of one comparison run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffReport {
    /// Differences in the order they were encountered
    pub differences: Vec<EntryDiff>,
    /// Number of entry pairs examined before either archive ended
    pub entries_compared: usize,
}

impl DiffReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diff: EntryDiff) {
        self.differences.push(diff);
    }

    /// True when no differences were recorded
    pub fn is_equal(&self) -> bool {
        self.differences.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EntryDiff> {
        self.differences.iter()
    }

    /// Count records of each kind: (size, content, unmatched)
    pub fn counts(&self) -> (usize, usize, usize) {
        self.differences.iter().fold((0, 0, 0), |(s, c, u), d| match d.kind {
            DiffKind::Size => (s + 1, c, u),
            DiffKind::Content => (s, c + 1, u),
            DiffKind::Unmatched(_) => (s, c, u + 1),
        })
    }
}

impl<'a> IntoIterator for &'a DiffReport {
    type Item = &'a EntryDiff;
    type IntoIter = std::slice::Iter<'a, EntryDiff>;

    fn into_iter(self) -> Self::IntoIter {
        self.differences.iter()
    }
}

/// Output format for rendered reports
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
    Csv,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}
