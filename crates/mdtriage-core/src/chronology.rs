//! Chronological ordering from multiple weak date signals
//!
//! Real documentation filenames rarely carry exactly one reliable date
//! source, so ordering is a graceful degradation chain: authored metadata
//! date, then filename date, then a date found in the text, then filesystem
//! timestamps, then the minimum representable date (sorts first). Ties fall
//! through a secondary chain: filename sequence number, filename version,
//! content-type priority, and finally lexical filename order so the result
//! is always deterministic.

use std::cmp::Ordering;
use std::sync::OnceLock;

use chrono::NaiveDate;
use regex::Regex;
use serde::Serialize;

use crate::classify::{AnalyzedFile, ContentType};
use crate::dates;

/// Which rung of the cascade produced a file's date
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DateSource {
    ContentMetadata,
    Filename,
    ContentText,
    FsModified,
    FsCreated,
    None,
}

/// Sentinel sequence for unnumbered files, sorting last among date ties
const NO_SEQUENCE: u64 = u64::MAX;

/// Composite sort key for one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChronoKey {
    pub date: NaiveDate,
    pub source: DateSource,
    pub sequence: u64,
    pub version: (u64, u64, u64),
    pub type_priority: u8,
    pub filename: String,
}

impl Ord for ChronoKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.date
            .cmp(&other.date)
            .then_with(|| self.sequence.cmp(&other.sequence))
            .then_with(|| self.version.cmp(&other.version))
            .then_with(|| self.type_priority.cmp(&other.type_priority))
            .then_with(|| self.filename.cmp(&other.filename))
    }
}

impl PartialOrd for ChronoKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Resolve the best available date for a file.
pub fn resolve_date(file: &AnalyzedFile) -> (NaiveDate, DateSource) {
    if let Some(date) = file.metadata.creation_date {
        return (date, DateSource::ContentMetadata);
    }
    if let Some(date) = dates::date_from_filename(file.filename()) {
        return (date, DateSource::Filename);
    }
    if let Some(date) = file.record.text().and_then(dates::date_from_content) {
        return (date, DateSource::ContentText);
    }
    if let Some(ts) = file.record.modified() {
        return (ts.date_naive(), DateSource::FsModified);
    }
    if let Some(ts) = file.record.created() {
        return (ts.date_naive(), DateSource::FsCreated);
    }
    (NaiveDate::MIN, DateSource::None)
}

/// Build the full composite key for a file.
pub fn sort_key(file: &AnalyzedFile) -> ChronoKey {
    let (date, source) = resolve_date(file);
    ChronoKey {
        date,
        source,
        sequence: sequence_from_filename(file.filename()).unwrap_or(NO_SEQUENCE),
        version: version_from_filename(file.filename()).unwrap_or((0, 0, 0)),
        type_priority: type_priority(file.classification.content_type),
        filename: file.filename().to_string(),
    }
}

/// Sort files ascending by composite key.
pub fn order<'a>(files: &[&'a AnalyzedFile]) -> Vec<&'a AnalyzedFile> {
    let mut keyed: Vec<(ChronoKey, &AnalyzedFile)> =
        files.iter().map(|f| (sort_key(f), *f)).collect();
    keyed.sort_by(|a, b| a.0.cmp(&b.0));
    keyed.into_iter().map(|(_, f)| f).collect()
}

/// Sequence number from the filename: `TASK_3`, `PHASE 2`, `V4`, `STEP-1`,
/// or a trailing `_3` before the extension.
pub fn sequence_from_filename(filename: &str) -> Option<u64> {
    static LABELED: OnceLock<Regex> = OnceLock::new();
    let labeled = LABELED.get_or_init(|| {
        Regex::new(r"(?i)\b(?:task|phase|step|part|v)[ _-]?(\d+)\b").unwrap()
    });

    static TRAILING: OnceLock<Regex> = OnceLock::new();
    let trailing = TRAILING.get_or_init(|| Regex::new(r"_(\d+)(?:_|\.|$)").unwrap());

    if let Some(caps) = labeled.captures(filename) {
        return caps[1].parse().ok();
    }
    if let Some(caps) = trailing.captures(filename) {
        return caps[1].parse().ok();
    }
    None
}

/// Dotted numeric version from the filename, e.g. `guide_v2.1.3.md`
pub fn version_from_filename(filename: &str) -> Option<(u64, u64, u64)> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"(\d+)\.(\d+)(?:\.(\d+))?").unwrap());

    // Require a dot so plain sequence numbers don't read as versions;
    // the filename extension dot is excluded by stripping it first
    let stem = filename.rsplit_once('.').map(|(s, _)| s).unwrap_or(filename);
    let caps = re.captures(stem)?;
    let major = caps[1].parse().ok()?;
    let minor = caps[2].parse().ok()?;
    let patch = caps
        .get(3)
        .map(|m| m.as_str().parse().ok())
        .unwrap_or(Some(0))?;
    Some((major, minor, patch))
}

/// Narrative priority by content type: completions first, then setup, then
/// implementation guides, then test output, then everything else.
pub fn type_priority(content_type: ContentType) -> u8 {
    match content_type {
        ContentType::CompletionSummary => 10,
        ContentType::SetupProcedure => 20,
        ContentType::FeatureGuide | ContentType::IntegrationGuide => 30,
        ContentType::TestReport => 40,
        _ => 50,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Classification;
    use crate::metadata;
    use std::path::PathBuf;

    fn file(name: &str, text: &str) -> AnalyzedFile {
        let record = crate::file::FileRecord::with_text(
            PathBuf::from(format!("/docs/{name}")),
            text.to_string(),
            None,
        );
        let meta = metadata::extract(text, 20);
        let classification = crate::classify::classify(name, &meta, text);
        AnalyzedFile {
            record,
            metadata: meta,
            classification,
        }
    }

    #[test]
    fn test_metadata_date_beats_filename_date() {
        let f = file("notes_2020-01-01.md", "Created: 2024-06-01\n\ncontent\n");
        let (date, source) = resolve_date(&f);
        assert_eq!(date, NaiveDate::from_ymd_opt(2024, 6, 1).unwrap());
        assert_eq!(source, DateSource::ContentMetadata);
    }

    #[test]
    fn test_filename_date_beats_content_date() {
        let f = file(
            "notes_2022-03-05.md",
            "Shipped around 2021-01-01 originally.\n",
        );
        let (date, source) = resolve_date(&f);
        assert_eq!(date, NaiveDate::from_ymd_opt(2022, 3, 5).unwrap());
        assert_eq!(source, DateSource::Filename);
    }

    #[test]
    fn test_undated_file_sorts_first() {
        let dated = file("a_2024-01-15.md", "x\n");
        let undated = file("b.md", "x\n");
        let ordered = order(&[&dated, &undated]);
        assert_eq!(ordered[0].filename(), "b.md");
    }

    #[test]
    fn test_dated_files_monotonic() {
        let early = file("x_2024-01-15.md", "x\n");
        let late = file("x_2024-02-01.md", "x\n");
        let ordered = order(&[&late, &early]);
        assert_eq!(ordered[0].filename(), "x_2024-01-15.md");
        assert_eq!(ordered[1].filename(), "x_2024-02-01.md");
    }

    #[test]
    fn test_sequence_breaks_date_ties() {
        let one = file("TASK_1_COMPLETE.md", "Created: 2024-01-01\n");
        let two = file("TASK_2_COMPLETE.md", "Created: 2024-01-01\n");
        let ordered = order(&[&two, &one]);
        assert_eq!(ordered[0].filename(), "TASK_1_COMPLETE.md");
    }

    #[test]
    fn test_unnumbered_sorts_after_numbered_on_ties() {
        let numbered = file("PHASE_2_PLAN.md", "Created: 2024-01-01\n");
        let unnumbered = file("AAA_PLAN.md", "Created: 2024-01-01\n");
        let ordered = order(&[&unnumbered, &numbered]);
        assert_eq!(ordered[0].filename(), "PHASE_2_PLAN.md");
    }

    #[test]
    fn test_sequence_extraction() {
        assert_eq!(sequence_from_filename("TASK_3_COMPLETE.md"), Some(3));
        assert_eq!(sequence_from_filename("phase 2 summary.md"), Some(2));
        assert_eq!(sequence_from_filename("report_7.md"), Some(7));
        assert_eq!(sequence_from_filename("V4_NOTES.md"), Some(4));
        assert_eq!(sequence_from_filename("README.md"), None);
    }

    #[test]
    fn test_version_extraction() {
        assert_eq!(version_from_filename("guide_v2.1.3.md"), Some((2, 1, 3)));
        assert_eq!(version_from_filename("guide_1.5.md"), Some((1, 5, 0)));
        assert_eq!(version_from_filename("guide_v2.md"), None);
        assert_eq!(version_from_filename("guide.md"), None);
    }

    #[test]
    fn test_filename_is_final_tiebreak() {
        let a = file("ALPHA.md", "Created: 2024-01-01\n");
        let b = file("BETA.md", "Created: 2024-01-01\n");
        let ordered = order(&[&b, &a]);
        assert_eq!(ordered[0].filename(), "ALPHA.md");
    }
}
