//! Outdated-content detection
//!
//! Four independent sub-analyses over the classified corpus: timestamp
//! staleness, version supersession, removal candidacy, and archive
//! candidacy. Each one annotates the affected file's processing notes with
//! its reason and contributes to the returned report; none of them mutates
//! file content. Freshness indicators are a separate entry point used by
//! archival and reporting.

mod archive_candidates;
mod freshness;
mod removal;
mod staleness;
mod supersession;

pub use freshness::{freshness_indicator, FreshnessBucket, FreshnessIndicator};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::classify::AnalyzedFile;
use crate::config::TriageConfig;

/// One flagged file with the reason it was flagged
#[derive(Debug, Clone, Serialize)]
pub struct FlaggedFile {
    pub filename: String,
    pub reason: String,
}

/// The combined result of all four sub-analyses
#[derive(Debug, Clone, Default, Serialize)]
pub struct OutdatedReport {
    pub potentially_outdated: Vec<FlaggedFile>,
    pub superseded: Vec<FlaggedFile>,
    pub removal_candidates: Vec<FlaggedFile>,
    pub archive_candidates: Vec<FlaggedFile>,
}

impl OutdatedReport {
    pub fn is_empty(&self) -> bool {
        self.potentially_outdated.is_empty()
            && self.superseded.is_empty()
            && self.removal_candidates.is_empty()
            && self.archive_candidates.is_empty()
    }

}

/// Run all four analyses. `now` is passed explicitly so age math is
/// reproducible under test.
pub fn detect(
    files: &mut [AnalyzedFile],
    config: &TriageConfig,
    now: DateTime<Utc>,
) -> OutdatedReport {
    let mut report = OutdatedReport::default();

    staleness::analyze(files, &config.staleness, now, &mut report);
    supersession::analyze(files, &mut report);
    removal::analyze(files, &config.removal, now, &mut report);
    archive_candidates::analyze(files, &config.staleness, now, &mut report);

    report
}

/// Flag a file in one report list and mirror the reason onto its
/// processing notes.
fn flag(
    file: &mut AnalyzedFile,
    list: &mut Vec<FlaggedFile>,
    label: &str,
    reason: impl Into<String>,
) {
    let reason = reason.into();
    file.classification.note(format!("{label}: {reason}"));
    list.push(FlaggedFile {
        filename: file.filename().to_string(),
        reason,
    });
}

/// Whole days between a timestamp and now
fn age_days(ts: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - ts).num_days()
}
