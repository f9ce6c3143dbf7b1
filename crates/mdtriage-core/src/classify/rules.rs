//! The ordered classification rule table
//!
//! Rule order is load-bearing: completion summaries outrank test reports so
//! `TASK_3_TESTS_COMPLETE.md` lands with the completions, and historical
//! markers outrank feature wording so deprecated guides are archived.

use self::FilenameSignal::{Contains, ContainsAll, EndsWith, StartsWith};
use super::{Category, ContentType, PreservationPriority};

/// Evidence weight for a filename signal match
pub const FILENAME_WEIGHT: f64 = 0.6;
/// Evidence weight per content keyword hit
pub const KEYWORD_WEIGHT: f64 = 0.15;
/// Default confidence a rule must reach to win
const DEFAULT_THRESHOLD: f64 = 0.5;

/// One filename test; a rule's signals are a disjunction
#[derive(Debug, Clone, Copy)]
pub enum FilenameSignal {
    Contains(&'static str),
    StartsWith(&'static str),
    EndsWith(&'static str),
    /// Conjunction of substring tests, e.g. "test" and ".md"
    ContainsAll(&'static [&'static str]),
}

impl FilenameSignal {
    /// Match against a lowercased filename
    pub fn matches(&self, name: &str) -> bool {
        match self {
            FilenameSignal::Contains(s) => name.contains(s),
            FilenameSignal::StartsWith(s) => name.starts_with(s),
            FilenameSignal::EndsWith(s) => name.ends_with(s),
            FilenameSignal::ContainsAll(parts) => parts.iter().all(|p| name.contains(p)),
        }
    }
}

impl std::fmt::Display for FilenameSignal {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilenameSignal::Contains(s) => write!(f, "contains '{s}'"),
            FilenameSignal::StartsWith(s) => write!(f, "starts with '{s}'"),
            FilenameSignal::EndsWith(s) => write!(f, "ends with '{s}'"),
            FilenameSignal::ContainsAll(parts) => write!(f, "contains all {parts:?}"),
        }
    }
}

/// One entry in the ordered rule table
pub struct ClassificationRule {
    pub category: Category,
    pub content_type: ContentType,
    pub priority: PreservationPriority,
    pub filename_signals: &'static [FilenameSignal],
    pub content_keywords: &'static [&'static str],
    pub threshold: f64,
}

/// The ordered rule table, first confident match wins.
pub fn rule_table() -> &'static [ClassificationRule] {
    RULES
}

static RULES: &[ClassificationRule] = &[
    // Historical markers first: a deprecated guide is archive material
    // no matter what else its name says
    ClassificationRule {
        category: Category::HistoricalArchive,
        content_type: ContentType::HistoricalDoc,
        priority: PreservationPriority::Archive,
        filename_signals: &[
            Contains("deprecated"),
            Contains("obsolete"),
            Contains("legacy"),
            Contains("archived"),
            Contains("historical"),
        ],
        content_keywords: &["deprecated", "obsolete", "no longer used", "superseded"],
        threshold: DEFAULT_THRESHOLD,
    },
    ClassificationRule {
        category: Category::ImplementationCompletion,
        content_type: ContentType::CompletionSummary,
        priority: PreservationPriority::High,
        filename_signals: &[
            Contains("_complete"),
            Contains("complete"),
            StartsWith("task_"),
            StartsWith("phase_"),
            Contains("_done"),
            EndsWith("_summary.md"),
        ],
        content_keywords: &["completed", "implemented", "finished", "delivered"],
        threshold: DEFAULT_THRESHOLD,
    },
    ClassificationRule {
        category: Category::SetupConfig,
        content_type: ContentType::SetupProcedure,
        priority: PreservationPriority::Critical,
        filename_signals: &[
            Contains("setup"),
            Contains("install"),
            Contains("config"),
            Contains("deploy"),
            Contains("environment"),
        ],
        content_keywords: &["install", "configure", "prerequisites", "deployment"],
        threshold: DEFAULT_THRESHOLD,
    },
    ClassificationRule {
        category: Category::TestingValidation,
        content_type: ContentType::TestReport,
        // Test reports age fast and are the first content to archive
        priority: PreservationPriority::Low,
        filename_signals: &[
            ContainsAll(&["test", ".md"]),
            Contains("validation"),
            Contains("_qa"),
            Contains("verify"),
        ],
        content_keywords: &["passed", "failed", "coverage", "test suite"],
        threshold: DEFAULT_THRESHOLD,
    },
    ClassificationRule {
        category: Category::IntegrationGuides,
        content_type: ContentType::IntegrationGuide,
        priority: PreservationPriority::High,
        filename_signals: &[
            Contains("integration"),
            Contains("webhook"),
            StartsWith("api_"),
        ],
        content_keywords: &["integration", "endpoint", "webhook", "api key"],
        threshold: DEFAULT_THRESHOLD,
    },
    ClassificationRule {
        category: Category::QuickReferences,
        content_type: ContentType::QuickReference,
        priority: PreservationPriority::High,
        filename_signals: &[
            Contains("reference"),
            Contains("cheat"),
            Contains("quick"),
            Contains("commands"),
        ],
        content_keywords: &["reference", "usage", "commands", "shortcuts"],
        threshold: DEFAULT_THRESHOLD,
    },
    ClassificationRule {
        category: Category::FeatureDocs,
        content_type: ContentType::FeatureGuide,
        priority: PreservationPriority::High,
        filename_signals: &[
            Contains("feature"),
            Contains("guide"),
            Contains("howto"),
            Contains("how_to"),
        ],
        content_keywords: &["feature", "functionality", "overview", "how to"],
        threshold: DEFAULT_THRESHOLD,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signal_matching() {
        assert!(FilenameSignal::Contains("_complete").matches("task_1_complete.md"));
        assert!(FilenameSignal::StartsWith("task_").matches("task_2_notes.md"));
        assert!(!FilenameSignal::StartsWith("task_").matches("my_task_notes.md"));
        assert!(FilenameSignal::EndsWith(".md").matches("readme.md"));
        assert!(FilenameSignal::ContainsAll(&["test", ".md"]).matches("unit_tests.md"));
        assert!(!FilenameSignal::ContainsAll(&["test", ".md"]).matches("tes.md"));
    }

    #[test]
    fn test_rule_order_puts_historical_first() {
        let rules = rule_table();
        assert_eq!(rules[0].category, Category::HistoricalArchive);
    }

    #[test]
    fn test_filename_signal_alone_clears_default_threshold() {
        assert!(FILENAME_WEIGHT >= DEFAULT_THRESHOLD);
    }
}
