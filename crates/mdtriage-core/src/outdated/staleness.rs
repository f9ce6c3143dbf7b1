//! Timestamp staleness: per-content-type age thresholds
//!
//! Files with no last-modified timestamp are skipped, not flagged; absence
//! of evidence is not evidence of staleness. Historical docs are exempt.

use chrono::{DateTime, Utc};

use super::{age_days, flag, OutdatedReport};
use crate::classify::{AnalyzedFile, ContentType};
use crate::config::StalenessConfig;

/// Age threshold in days for a content type; `None` means exempt.
pub fn threshold_days(content_type: ContentType, config: &StalenessConfig) -> Option<i64> {
    match content_type {
        ContentType::CompletionSummary => Some(config.completion_summary_days),
        ContentType::FeatureGuide => Some(config.feature_guide_days),
        ContentType::SetupProcedure => Some(config.setup_procedure_days),
        ContentType::TestReport => Some(config.test_report_days),
        ContentType::QuickReference => Some(config.quick_reference_days),
        ContentType::IntegrationGuide => Some(config.integration_guide_days),
        ContentType::HistoricalDoc => None,
        ContentType::GeneralDoc => Some(config.general_doc_days),
    }
}

pub(super) fn analyze(
    files: &mut [AnalyzedFile],
    config: &StalenessConfig,
    now: DateTime<Utc>,
    report: &mut OutdatedReport,
) {
    for file in files.iter_mut() {
        let Some(modified) = file.metadata.last_modified else {
            continue;
        };
        let Some(threshold) = threshold_days(file.classification.content_type, config) else {
            continue;
        };

        let age = age_days(modified, now);
        if age > threshold {
            let content_type = file.classification.content_type;
            flag(
                file,
                &mut report.potentially_outdated,
                "potentially outdated",
                format!("{content_type} not modified in {age} days (threshold {threshold})"),
            );
        }
    }
}
