//! Report rendering
//!
//! Templated markdown from core data: the per-file freshness report, the
//! outdated-content summary, and the cross-reference footer appended to
//! consolidated documents.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};

use crate::classify::AnalyzedFile;
use crate::outdated::{freshness_indicator, FreshnessIndicator, OutdatedReport};
use crate::xref::CrossReferenceMap;

/// Freshness indicators for every file, keyed by filename.
pub fn freshness_map(
    files: &[AnalyzedFile],
    now: DateTime<Utc>,
) -> BTreeMap<String, FreshnessIndicator> {
    files
        .iter()
        .map(|f| (f.filename().to_string(), freshness_indicator(f, now)))
        .collect()
}

/// Per-file freshness table.
pub fn render_freshness(indicators: &BTreeMap<String, FreshnessIndicator>) -> String {
    let mut out = String::from(
        "# Documentation Freshness\n\n| File | Freshness | Recommendation |\n|---|---|---|\n",
    );
    for (filename, indicator) in indicators {
        out.push_str(&format!(
            "| {} | {} | {} |\n",
            filename, indicator.label, indicator.recommendation
        ));
    }
    out
}

/// Outdated-content summary, one section per flag list.
pub fn render_outdated(report: &OutdatedReport) -> String {
    let mut out = String::from("# Outdated Content Report\n");

    let sections: &[(&str, &[crate::outdated::FlaggedFile])] = &[
        ("Potentially Outdated", &report.potentially_outdated),
        ("Superseded", &report.superseded),
        ("Removal Candidates", &report.removal_candidates),
        ("Archive Candidates", &report.archive_candidates),
    ];

    for (title, flagged) in sections {
        if flagged.is_empty() {
            continue;
        }
        out.push_str(&format!("\n## {title}\n\n"));
        for file in *flagged {
            out.push_str(&format!("- **{}**: {}\n", file.filename, file.reason));
        }
    }

    if report.is_empty() {
        out.push_str("\nNothing flagged.\n");
    }
    out
}

/// "Related Documents" footer for one consolidated output, empty string
/// when it has no references.
pub fn render_xref_footer(map: &CrossReferenceMap, document: &str) -> String {
    let related = map.related(document);
    if related.is_empty() {
        return String::new();
    }

    let mut out = String::from("\n## Related Documents\n\n");
    for name in related {
        out.push_str(&format!("- [{name}]({name})\n"));
    }
    out
}
