//! Archive candidacy
//!
//! A file is an archive candidate when it is an aged completion summary,
//! carries deprecated-content markers in its filename or topics, is an aged
//! setup procedure, or is low-priority and old.

use chrono::{DateTime, Utc};

use super::{age_days, flag, OutdatedReport};
use crate::classify::{AnalyzedFile, ContentType, PreservationPriority};
use crate::config::StalenessConfig;

/// Markers of deprecated content, checked against filename and topics
const DEPRECATED_LEXICON: &[&str] = &[
    "deprecated",
    "obsolete",
    "legacy",
    "old_",
    "archived",
    "removed",
    "discontinued",
    "superseded",
];

/// Does the filename or any topic carry a deprecated-content marker?
pub fn has_deprecated_marker(file: &AnalyzedFile) -> bool {
    let name = file.filename().to_lowercase();
    if DEPRECATED_LEXICON.iter().any(|m| name.contains(m)) {
        return true;
    }
    file.metadata.key_topics.iter().any(|topic| {
        let topic = topic.to_lowercase();
        DEPRECATED_LEXICON.iter().any(|m| topic.contains(m))
    })
}

pub(super) fn analyze(
    files: &mut [AnalyzedFile],
    config: &StalenessConfig,
    now: DateTime<Utc>,
    report: &mut OutdatedReport,
) {
    for file in files.iter_mut() {
        let age = file.metadata.last_modified.map(|m| age_days(m, now));

        if file.classification.content_type == ContentType::CompletionSummary {
            if let Some(age) = age {
                if age > config.completion_summary_days {
                    flag(
                        file,
                        &mut report.archive_candidates,
                        "archive candidate",
                        format!("completion summary {age} days old (>1 year)"),
                    );
                    continue;
                }
            }
        }

        if has_deprecated_marker(file) {
            flag(
                file,
                &mut report.archive_candidates,
                "archive candidate",
                "deprecated-content marker in filename or topics",
            );
            continue;
        }

        if file.classification.content_type == ContentType::SetupProcedure {
            if let Some(age) = age {
                if age > config.setup_archive_days {
                    flag(
                        file,
                        &mut report.archive_candidates,
                        "archive candidate",
                        format!("setup procedure {age} days old"),
                    );
                    continue;
                }
            }
        }

        if file.classification.preservation_priority == PreservationPriority::Low {
            if let Some(age) = age {
                if age > config.low_priority_archive_days {
                    flag(
                        file,
                        &mut report.archive_candidates,
                        "archive candidate",
                        format!("low priority and {age} days old"),
                    );
                }
            }
        }
    }
}
