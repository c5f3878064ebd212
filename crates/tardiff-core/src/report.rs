//! Report rendering
//!
//! Text output is the console report; JSON and CSV carry the same records
//! with the header/content flags spelled out.

use std::fmt::{self, Write as _};
use std::path::Path;

use crate::error::Result;
use crate::types::{ArchiveSide, DiffKind, DiffReport, EntryDiff, OutputFormat};

/// Line printed when no differences were found
pub const EQUAL_MESSAGE: &str = "The contents of the tar files are equal.";

/// Heading printed before the list of differences
pub const DIFFERENT_HEADING: &str = "The following files are different:";

impl fmt::Display for EntryDiff {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            DiffKind::Size => write!(f, " {} - Size differs", self.name),
            // Two spaces before the dash are part of the established output
            DiffKind::Content => write!(f, " {}  - Content differs", self.name),
            DiffKind::Unmatched(ArchiveSide::First) => {
                write!(f, " {} - Only in first archive", self.name)
            }
            DiffKind::Unmatched(ArchiveSide::Second) => {
                write!(f, " {} - Only in second archive", self.name)
            }
        }
    }
}

impl fmt::Display for DiffReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_equal() {
            return writeln!(f, "{}", EQUAL_MESSAGE);
        }

        writeln!(f, "{}", DIFFERENT_HEADING)?;
        for diff in self {
            writeln!(f, "{}", diff)?;
        }
        Ok(())
    }
}

/// Paths of the compared archives, for formats that record them
#[derive(Debug, Clone, Copy, Default)]
pub struct ReportSources<'a> {
    pub first: Option<&'a Path>,
    pub second: Option<&'a Path>,
}

impl<'a> ReportSources<'a> {
    pub fn new(first: &'a Path, second: &'a Path) -> Self {
        Self {
            first: Some(first),
            second: Some(second),
        }
    }
}

/// Render a report in the requested format
pub fn render(report: &DiffReport, format: OutputFormat, sources: ReportSources<'_>) -> Result<String> {
    match format {
        OutputFormat::Text => Ok(report.to_string()),
        OutputFormat::Json => render_json(report, sources),
        OutputFormat::Csv => Ok(render_csv(report)),
    }
}

/// Build the JSON value for a report
pub fn to_json_value(report: &DiffReport, sources: ReportSources<'_>) -> serde_json::Value {
    let differences: Vec<_> = report
        .iter()
        .map(|d| {
            serde_json::json!({
                "name": d.name,
                "size_diff": d.size_differs(),
                "content_diff": d.content_differs(),
                "unmatched": d.unmatched_side(),
            })
        })
        .collect();

    serde_json::json!({
        "first": sources.first.map(|p| p.display().to_string()),
        "second": sources.second.map(|p| p.display().to_string()),
        "entries_compared": report.entries_compared,
        "equal": report.is_equal(),
        "differences": differences,
    })
}

/// Render a report as pretty-printed JSON
pub fn render_json(report: &DiffReport, sources: ReportSources<'_>) -> Result<String> {
    let mut out = serde_json::to_string_pretty(&to_json_value(report, sources))?;
    out.push('\n');
    Ok(out)
}

/// Render a report as CSV
pub fn render_csv(report: &DiffReport) -> String {
    let mut out = String::from("name,size_diff,content_diff,unmatched\n");
    for d in report {
        let unmatched = match d.unmatched_side() {
            Some(ArchiveSide::First) => "first",
            Some(ArchiveSide::Second) => "second",
            None => "",
        };
        // Writing into a String cannot fail
        let _ = writeln!(
            out,
            "{},{},{},{}",
            csv_field(&d.name),
            d.size_differs(),
            d.content_differs(),
            unmatched
        );
    }
    out
}

fn csv_field(value: &str) -> String {
    if value.contains(&[',', '"', '\n', '\r'][..]) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_report() -> DiffReport {
        DiffReport {
            differences: vec![EntryDiff::size("a.txt"), EntryDiff::content("b.txt")],
            entries_compared: 3,
        }
    }

    #[test]
    fn test_equal_report_text() {
        let report = DiffReport::new();
        assert_eq!(report.to_string(), "The contents of the tar files are equal.\n");
    }

    #[test]
    fn test_text_report_is_bit_exact() {
        let text = sample_report().to_string();
        assert_eq!(
            text,
            "The following files are different:\n a.txt - Size differs\n b.txt  - Content differs\n"
        );
    }

    #[test]
    fn test_unmatched_lines() {
        assert_eq!(
            EntryDiff::unmatched("c.txt", ArchiveSide::First).to_string(),
            " c.txt - Only in first archive"
        );
        assert_eq!(
            EntryDiff::unmatched("d.txt", ArchiveSide::Second).to_string(),
            " d.txt - Only in second archive"
        );
    }

    #[test]
    fn test_json_flags() {
        let first = Path::new("one.tar");
        let second = Path::new("two.tar");
        let value = to_json_value(&sample_report(), ReportSources::new(first, second));

        assert_eq!(value["first"], "one.tar");
        assert_eq!(value["entries_compared"], 3);
        assert_eq!(value["equal"], false);
        assert_eq!(value["differences"][0]["name"], "a.txt");
        assert_eq!(value["differences"][0]["size_diff"], true);
        assert_eq!(value["differences"][0]["content_diff"], false);
        assert_eq!(value["differences"][1]["content_diff"], true);
        assert!(value["differences"][1]["unmatched"].is_null());
    }

    #[test]
    fn test_json_unmatched_side() {
        let report = DiffReport {
            differences: vec![EntryDiff::unmatched("z", ArchiveSide::Second)],
            entries_compared: 0,
        };
        let value = to_json_value(&report, ReportSources::default());
        assert_eq!(value["differences"][0]["unmatched"], "second");
        assert!(value["first"].is_null());
    }

    #[test]
    fn test_csv_quotes_awkward_names() {
        let report = DiffReport {
            differences: vec![EntryDiff::content("dir/a,b.txt"), EntryDiff::size("say \"hi\"")],
            entries_compared: 2,
        };
        let csv = render_csv(&report);
        let lines: Vec<_> = csv.lines().collect();

        assert_eq!(lines[0], "name,size_diff,content_diff,unmatched");
        assert_eq!(lines[1], "\"dir/a,b.txt\",false,true,");
        assert_eq!(lines[2], "\"say \"\"hi\"\"\",true,false,");
    }

    #[test]
    fn test_render_dispatch() {
        let report = sample_report();
        let text = render(&report, OutputFormat::Text, ReportSources::default()).unwrap();
        assert!(text.starts_with(DIFFERENT_HEADING));

        let json = render(&report, OutputFormat::Json, ReportSources::default()).unwrap();
        assert!(json.contains("\"entries_compared\": 3"));
    }
}
