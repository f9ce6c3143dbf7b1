//! Heuristic classification of documentation files
//!
//! An ordered rule table is evaluated per file; each rule accumulates
//! evidence weight from filename signals (strong) and content keywords
//! (weak), and the first rule whose confidence clears its threshold wins.
//! No rule matching is not an error: the file falls back to
//! `Uncategorized`/`GeneralDoc`/`Medium` at confidence 0.0, which downstream
//! stages must treat as valid, just low-confidence, input.

pub mod rules;

use serde::{Deserialize, Serialize};

use crate::file::FileRecord;
use crate::metadata::ContentMetadata;
use rules::{rule_table, FILENAME_WEIGHT, KEYWORD_WEIGHT};

/// Top-level documentation bucket
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    SetupConfig,
    FeatureDocs,
    ImplementationCompletion,
    TestingValidation,
    QuickReferences,
    IntegrationGuides,
    HistoricalArchive,
    Uncategorized,
}

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::SetupConfig => "setup_config",
            Category::FeatureDocs => "feature_docs",
            Category::ImplementationCompletion => "implementation_completion",
            Category::TestingValidation => "testing_validation",
            Category::QuickReferences => "quick_references",
            Category::IntegrationGuides => "integration_guides",
            Category::HistoricalArchive => "historical_archive",
            Category::Uncategorized => "uncategorized",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Finer-grained purpose label, driving merge-strategy defaults
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentType {
    CompletionSummary,
    FeatureGuide,
    SetupProcedure,
    TestReport,
    QuickReference,
    IntegrationGuide,
    HistoricalDoc,
    GeneralDoc,
}

impl ContentType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentType::CompletionSummary => "completion_summary",
            ContentType::FeatureGuide => "feature_guide",
            ContentType::SetupProcedure => "setup_procedure",
            ContentType::TestReport => "test_report",
            ContentType::QuickReference => "quick_reference",
            ContentType::IntegrationGuide => "integration_guide",
            ContentType::HistoricalDoc => "historical_doc",
            ContentType::GeneralDoc => "general_doc",
        }
    }
}

impl std::fmt::Display for ContentType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How aggressively a file's content is protected during consolidation
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PreservationPriority {
    Critical,
    High,
    Medium,
    Low,
    Archive,
}

impl std::fmt::Display for PreservationPriority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PreservationPriority::Critical => "critical",
            PreservationPriority::High => "high",
            PreservationPriority::Medium => "medium",
            PreservationPriority::Low => "low",
            PreservationPriority::Archive => "archive",
        };
        f.write_str(s)
    }
}

/// Classification of one file, computed once
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Classification {
    pub category: Category,
    pub content_type: ContentType,
    pub preservation_priority: PreservationPriority,
    /// Accumulated evidence weight, clamped to [0, 1]
    pub confidence_score: f64,
    /// Append-only trace of why decisions were made; never drives control flow
    pub processing_notes: Vec<String>,
}

impl Classification {
    /// Fallback when no rule clears its threshold
    pub fn uncategorized() -> Self {
        Self {
            category: Category::Uncategorized,
            content_type: ContentType::GeneralDoc,
            preservation_priority: PreservationPriority::Medium,
            confidence_score: 0.0,
            processing_notes: Vec::new(),
        }
    }

    /// Degenerate classification for an unreadable file
    pub fn unreadable(reason: &str) -> Self {
        let mut classification = Self::uncategorized();
        classification.note(format!("read failed: {reason}"));
        classification
    }

    pub fn note(&mut self, note: impl Into<String>) {
        self.processing_notes.push(note.into());
    }
}

/// One file carried through the pipeline: record, extracted metadata, and
/// classification travel together from here on.
#[derive(Debug, Clone)]
pub struct AnalyzedFile {
    pub record: FileRecord,
    pub metadata: ContentMetadata,
    pub classification: Classification,
}

impl AnalyzedFile {
    pub fn filename(&self) -> &str {
        self.record.filename()
    }
}

/// Classify a file from its name and extracted metadata. Pure.
pub fn classify(filename: &str, metadata: &ContentMetadata, text: &str) -> Classification {
    let name = filename.to_lowercase();
    let haystack = build_keyword_haystack(metadata, text);

    for rule in rule_table() {
        let mut confidence: f64 = 0.0;
        let mut matched_signal = None;

        for signal in rule.filename_signals {
            if signal.matches(&name) {
                confidence += FILENAME_WEIGHT;
                matched_signal = Some(signal);
                break;
            }
        }

        let mut matched_keywords = 0usize;
        for keyword in rule.content_keywords {
            if haystack.contains(keyword) {
                confidence += KEYWORD_WEIGHT;
                matched_keywords += 1;
            }
        }

        let confidence = confidence.clamp(0.0, 1.0);
        if confidence >= rule.threshold {
            let mut classification = Classification {
                category: rule.category,
                content_type: rule.content_type,
                preservation_priority: rule.priority,
                confidence_score: confidence,
                processing_notes: Vec::new(),
            };
            match matched_signal {
                Some(signal) => classification.note(format!(
                    "classified as {} ({} keyword hits, filename signal {})",
                    rule.category, matched_keywords, signal
                )),
                None => classification.note(format!(
                    "classified as {} ({} keyword hits, no filename signal)",
                    rule.category, matched_keywords
                )),
            }
            return classification;
        }
    }

    let mut classification = Classification::uncategorized();
    classification.note("no classification rule met its threshold");
    classification
}

/// Lowercased search space for content-keyword signals: topics, headings,
/// and the raw text itself.
fn build_keyword_haystack(metadata: &ContentMetadata, text: &str) -> String {
    let mut haystack = String::with_capacity(text.len() + 256);
    for topic in &metadata.key_topics {
        haystack.push_str(&topic.to_lowercase());
        haystack.push(' ');
    }
    for heading in &metadata.headings {
        haystack.push_str(&heading.to_lowercase());
        haystack.push(' ');
    }
    haystack.push_str(&text.to_lowercase());
    haystack
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata;

    fn classify_text(filename: &str, text: &str) -> Classification {
        let meta = metadata::extract(text, 20);
        classify(filename, &meta, text)
    }

    #[test]
    fn test_task_complete_is_completion_summary() {
        let classification = classify_text(
            "TASK_1_COMPLETE.md",
            "# Task 1\n\nImplemented JWT tokens with bcrypt.\n",
        );
        assert_eq!(classification.category, Category::ImplementationCompletion);
        assert_eq!(classification.content_type, ContentType::CompletionSummary);
        assert!(classification.confidence_score >= 0.5);
    }

    #[test]
    fn test_setup_guide() {
        let classification = classify_text(
            "SETUP_GUIDE.md",
            "# Setup\n\nInstall dependencies, then configure the environment.\n",
        );
        assert_eq!(classification.category, Category::SetupConfig);
        assert_eq!(classification.content_type, ContentType::SetupProcedure);
        assert_eq!(
            classification.preservation_priority,
            PreservationPriority::Critical
        );
    }

    #[test]
    fn test_test_report() {
        let classification = classify_text(
            "integration_test_results.md",
            "# Test Run\n\nAll 42 tests passed. Coverage at 87%.\n",
        );
        assert_eq!(classification.category, Category::TestingValidation);
        assert_eq!(classification.content_type, ContentType::TestReport);
        assert_eq!(
            classification.preservation_priority,
            PreservationPriority::Low
        );
    }

    #[test]
    fn test_old_feature_is_still_a_feature_guide() {
        // "old_" alone marks age, not historical intent; the archive decision
        // belongs to the outdated detector, not the classifier
        let classification = classify_text(
            "old_feature.md",
            "# Feature Overview\n\nThis feature handles notification routing.\n",
        );
        assert_eq!(classification.content_type, ContentType::FeatureGuide);
    }

    #[test]
    fn test_deprecated_doc_is_historical() {
        let classification = classify_text(
            "DEPRECATED_BILLING_FLOW.md",
            "# Deprecated\n\nReplaced by the new billing pipeline.\n",
        );
        assert_eq!(classification.category, Category::HistoricalArchive);
        assert_eq!(
            classification.preservation_priority,
            PreservationPriority::Archive
        );
    }

    #[test]
    fn test_unmatched_falls_back() {
        let classification = classify_text("zzz.md", "nothing of note\n");
        assert_eq!(classification.category, Category::Uncategorized);
        assert_eq!(classification.content_type, ContentType::GeneralDoc);
        assert_eq!(
            classification.preservation_priority,
            PreservationPriority::Medium
        );
        assert_eq!(classification.confidence_score, 0.0);
    }

    #[test]
    fn test_classification_is_idempotent() {
        let text = "# Payment Integration\n\nWebhook endpoints and API keys.\n";
        let a = classify_text("PAYMENT_INTEGRATION.md", text);
        let b = classify_text("PAYMENT_INTEGRATION.md", text);
        assert_eq!(a.category, b.category);
        assert_eq!(a.content_type, b.content_type);
        assert_eq!(a.preservation_priority, b.preservation_priority);
        assert!((a.confidence_score - b.confidence_score).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zero_byte_file() {
        let classification = classify_text("empty.md", "");
        assert_eq!(classification.category, Category::Uncategorized);
        assert_eq!(classification.confidence_score, 0.0);
    }

    #[test]
    fn test_confidence_clamped() {
        // A filename signal plus many keyword hits must not exceed 1.0
        let text = "# Setup Install Configure\n\nsetup install configure deployment \
                    prerequisites environment\n";
        let classification = classify_text("SETUP_INSTALL_CONFIG.md", text);
        assert!(classification.confidence_score <= 1.0);
    }
}
