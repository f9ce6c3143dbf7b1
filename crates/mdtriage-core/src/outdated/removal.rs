//! Removal candidacy
//!
//! A file is a removal candidate when it has almost no content, when its
//! name marks it as temporary or draft material, when it is an aged test
//! report, or when it duplicates another file in the corpus. The duplicate
//! check deliberately consults the full analyzed corpus; the system this
//! replaces compared against an empty list, which made the check a no-op.

use std::collections::HashSet;

use chrono::{DateTime, Utc};

use super::{age_days, flag, OutdatedReport};
use crate::classify::{AnalyzedFile, ContentType};
use crate::config::RemovalConfig;
use crate::text;

/// Filename tokens that mark temporary or draft material
const TEMP_LEXICON: &[&str] = &[
    "temp", "tmp", "draft", "backup", "copy", "old", "bak", "scratch", "wip",
];

/// Does the filename carry a temporary/draft marker?
///
/// Matching is token-based (the stem split on `_`, `-`, and spaces) so
/// `old_feature.md` matches but `gold_standard.md` does not. `test_` and
/// `_test` markers count too.
pub fn has_temp_marker(filename: &str) -> bool {
    let name = filename.to_lowercase();
    let stem = name.rsplit_once('.').map(|(s, _)| s).unwrap_or(&name);

    let tokens: Vec<&str> = stem
        .split(['_', '-', ' ', '.'])
        .filter(|t| !t.is_empty())
        .collect();

    if tokens.iter().any(|t| TEMP_LEXICON.contains(t)) {
        return true;
    }

    stem.starts_with("test_") || stem.ends_with("_test")
}

pub(super) fn analyze(
    files: &mut [AnalyzedFile],
    config: &RemovalConfig,
    now: DateTime<Utc>,
    report: &mut OutdatedReport,
) {
    // Snapshot what the duplicate check needs before taking mutable borrows
    let profiles: Vec<(String, usize, HashSet<String>)> = files
        .iter()
        .map(|f| {
            (
                f.filename().to_string(),
                f.metadata.word_count,
                f.metadata
                    .key_topics
                    .iter()
                    .map(|t| t.to_lowercase())
                    .collect(),
            )
        })
        .collect();

    for (i, file) in files.iter_mut().enumerate() {
        if file.metadata.word_count < config.min_word_count {
            flag(
                file,
                &mut report.removal_candidates,
                "removal candidate",
                format!(
                    "minimal content ({} words, minimum {})",
                    file.metadata.word_count, config.min_word_count
                ),
            );
            continue;
        }

        if has_temp_marker(file.filename()) {
            flag(
                file,
                &mut report.removal_candidates,
                "removal candidate",
                "filename marks temporary/draft material",
            );
            continue;
        }

        if file.classification.content_type == ContentType::TestReport {
            if let Some(modified) = file.metadata.last_modified {
                let age = age_days(modified, now);
                if age > config.old_test_report_days {
                    flag(
                        file,
                        &mut report.removal_candidates,
                        "removal candidate",
                        format!("test report {age} days old"),
                    );
                    continue;
                }
            }
        }

        if let Some(other) = duplicate_of(i, &profiles, config) {
            flag(
                file,
                &mut report.removal_candidates,
                "removal candidate",
                format!("duplicates content of {other}"),
            );
        }
    }
}

/// Find another file this one duplicates: word-count ratio at or above the
/// configured minimum and topic-set Jaccard above the overlap threshold.
fn duplicate_of(
    index: usize,
    profiles: &[(String, usize, HashSet<String>)],
    config: &RemovalConfig,
) -> Option<String> {
    let (_, words, topics) = &profiles[index];
    if *words == 0 || topics.is_empty() {
        return None;
    }

    for (j, (other_name, other_words, other_topics)) in profiles.iter().enumerate() {
        if j == index || *other_words == 0 {
            continue;
        }

        let ratio =
            (*words.min(other_words)) as f64 / (*words.max(other_words)) as f64;
        if ratio < config.duplicate_word_ratio {
            continue;
        }

        if text::jaccard(topics, other_topics) > config.duplicate_topic_overlap {
            return Some(other_name.clone());
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::super::test_support::{aged_file, now, undated_file};
    use super::*;

    fn run(files: &mut [AnalyzedFile]) -> OutdatedReport {
        let mut report = OutdatedReport::default();
        analyze(files, &RemovalConfig::default(), now(), &mut report);
        report
    }

    #[test]
    fn test_zero_byte_file_is_removal_candidate() {
        let mut files = vec![undated_file("empty.md", "")];
        let report = run(&mut files);
        assert_eq!(report.removal_candidates.len(), 1);
        assert!(report.removal_candidates[0]
            .reason
            .contains("minimal content"));
    }

    #[test]
    fn test_temp_marker_tokens() {
        assert!(has_temp_marker("draft_proposal.md"));
        assert!(has_temp_marker("notes.bak.md"));
        assert!(has_temp_marker("old_feature.md"));
        assert!(has_temp_marker("wip-dashboard.md"));
        assert!(!has_temp_marker("gold_standard.md"));
        assert!(!has_temp_marker("template_guide.md"));
    }

    #[test]
    fn test_old_test_report_flagged() {
        let mut files = vec![aged_file(
            "integration_test_results.md",
            "# Tests\n\nSuite passed with full coverage across services.\n",
            120,
        )];
        let report = run(&mut files);
        assert_eq!(report.removal_candidates.len(), 1);
        assert!(report.removal_candidates[0].reason.contains("test report"));
    }

    #[test]
    fn test_recent_test_report_kept() {
        let mut files = vec![aged_file(
            "integration_test_results.md",
            "# Tests\n\nSuite passed with full coverage across services.\n",
            30,
        )];
        assert!(run(&mut files).removal_candidates.is_empty());
    }

    #[test]
    fn test_duplicate_pair_flagged() {
        let text_a = "# Payment Setup\n\nConfigure payment_gateway and webhook_secret \
                      for the checkout flow integration handling.\n";
        let text_b = "# Payment Setup\n\nConfigure payment_gateway and webhook_secret \
                      for the checkout flow integration processing.\n";
        let mut files = vec![
            aged_file("payment_notes_a.md", text_a, 10),
            aged_file("payment_notes_b.md", text_b, 10),
        ];
        let report = run(&mut files);
        assert!(report
            .removal_candidates
            .iter()
            .any(|f| f.reason.contains("duplicates content of")));
    }

    #[test]
    fn test_distinct_files_not_duplicates() {
        let mut files = vec![
            aged_file(
                "alpha.md",
                "# Alpha Service\n\nalpha_handler routes ingest traffic upstream.\n",
                10,
            ),
            aged_file(
                "beta.md",
                "# Beta Worker\n\nbeta_consumer drains queue partitions downstream.\n",
                10,
            ),
        ];
        assert!(run(&mut files).removal_candidates.is_empty());
    }
}
