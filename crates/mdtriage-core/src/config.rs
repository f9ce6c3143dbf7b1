//! Configuration for the triage pipeline
//!
//! Every heuristic threshold in the pipeline is an empirically-chosen value,
//! not a load-bearing invariant, so all of them are surfaced here as tunable
//! fields with serde defaults. Config is discovered at `<root>/.mdtriage.toml`
//! first, then the user config dir (`~/.config/mdtriage/config.toml`), then
//! built-in defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, TriageError};

const CONFIG_FILE: &str = ".mdtriage.toml";
const GLOBAL_CONFIG_DIR: &str = "mdtriage";
const GLOBAL_CONFIG_FILE: &str = "config.toml";
const CONFIG_DIR_ENV_VAR: &str = "MDTRIAGE_CONFIG_DIR";

/// Fallback text encoding attempted after strict UTF-8 fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FallbackEncoding {
    /// ISO-8859-1: every byte maps to the code point of the same value
    #[default]
    Latin1,
    /// Skip straight to lossy UTF-8 replacement
    None,
}

/// Top-level pipeline configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriageConfig {
    /// File extensions treated as documentation
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Encoding attempted after strict UTF-8 fails, before lossy decoding
    #[serde(default)]
    pub fallback_encoding: FallbackEncoding,

    /// Directory name (under the root) for consolidated output
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Directory name (under the root) for archived content
    #[serde(default = "default_archive_dir")]
    pub archive_dir: String,

    /// Maximum topics retained per file
    #[serde(default = "default_max_topics")]
    pub max_topics: usize,

    /// Section similarity scoring and grouping
    #[serde(default)]
    pub redundancy: RedundancyConfig,

    /// Staleness age thresholds, in days, per content type
    #[serde(default)]
    pub staleness: StalenessConfig,

    /// Removal / duplicate-content detection
    #[serde(default)]
    pub removal: RemovalConfig,

    /// Cross-reference generation
    #[serde(default)]
    pub xref: XrefConfig,
}

impl Default for TriageConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            fallback_encoding: FallbackEncoding::default(),
            output_dir: default_output_dir(),
            archive_dir: default_archive_dir(),
            max_topics: default_max_topics(),
            redundancy: RedundancyConfig::default(),
            staleness: StalenessConfig::default(),
            removal: RemovalConfig::default(),
            xref: XrefConfig::default(),
        }
    }
}

/// Weights and thresholds for section similarity grouping
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedundancyConfig {
    /// Apply Porter stemming to content word sets before similarity
    /// comparison, so inflected restatements compare as overlapping
    #[serde(default)]
    pub stemming: bool,

    /// Weight of heading word-set similarity in the combined score
    #[serde(default = "default_heading_weight")]
    pub heading_weight: f64,

    /// Weight of content word-set Jaccard in the combined score
    #[serde(default = "default_content_weight")]
    pub content_weight: f64,

    /// Weight of structural-flag agreement in the combined score
    #[serde(default = "default_structure_weight")]
    pub structure_weight: f64,

    /// Base grouping threshold on the combined score
    #[serde(default = "default_group_threshold")]
    pub group_threshold: f64,

    /// Relaxed threshold used when headings alone are already similar
    #[serde(default = "default_relaxed_threshold")]
    pub relaxed_threshold: f64,

    /// Heading similarity above which the relaxed threshold applies
    #[serde(default = "default_heading_gate")]
    pub heading_gate: f64,

    /// Tightened threshold for very short sections
    #[serde(default = "default_short_threshold")]
    pub short_section_threshold: f64,

    /// Word count below which a section counts as very short
    #[serde(default = "default_short_words")]
    pub short_section_words: usize,

    /// Fraction of a line's words that must be new for it to count as unique
    #[serde(default = "default_unique_fraction")]
    pub unique_word_fraction: f64,

    /// Minimum length, in characters, for a unique-addition line
    #[serde(default = "default_min_line_len")]
    pub min_unique_line_len: usize,

    /// Line-level Jaccard above which a line duplicates an existing base line
    #[serde(default = "default_line_dup_threshold")]
    pub line_duplicate_threshold: f64,
}

impl Default for RedundancyConfig {
    fn default() -> Self {
        Self {
            stemming: false,
            heading_weight: default_heading_weight(),
            content_weight: default_content_weight(),
            structure_weight: default_structure_weight(),
            group_threshold: default_group_threshold(),
            relaxed_threshold: default_relaxed_threshold(),
            heading_gate: default_heading_gate(),
            short_section_threshold: default_short_threshold(),
            short_section_words: default_short_words(),
            unique_word_fraction: default_unique_fraction(),
            min_unique_line_len: default_min_line_len(),
            line_duplicate_threshold: default_line_dup_threshold(),
        }
    }
}

/// Per-content-type staleness thresholds in days
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StalenessConfig {
    #[serde(default = "default_completion_days")]
    pub completion_summary_days: i64,
    #[serde(default = "default_feature_days")]
    pub feature_guide_days: i64,
    #[serde(default = "default_setup_days")]
    pub setup_procedure_days: i64,
    #[serde(default = "default_test_report_days")]
    pub test_report_days: i64,
    #[serde(default = "default_quick_reference_days")]
    pub quick_reference_days: i64,
    #[serde(default = "default_integration_days")]
    pub integration_guide_days: i64,
    #[serde(default = "default_general_days")]
    pub general_doc_days: i64,

    /// Setup procedures older than this are archive material
    #[serde(default = "default_setup_archive_days")]
    pub setup_archive_days: i64,

    /// Low-priority files older than this are archive material
    #[serde(default = "default_low_priority_archive_days")]
    pub low_priority_archive_days: i64,
}

impl Default for StalenessConfig {
    fn default() -> Self {
        Self {
            completion_summary_days: default_completion_days(),
            feature_guide_days: default_feature_days(),
            setup_procedure_days: default_setup_days(),
            test_report_days: default_test_report_days(),
            quick_reference_days: default_quick_reference_days(),
            integration_guide_days: default_integration_days(),
            general_doc_days: default_general_days(),
            setup_archive_days: default_setup_archive_days(),
            low_priority_archive_days: default_low_priority_archive_days(),
        }
    }
}

/// Thresholds for removal candidacy and duplicate-content detection
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RemovalConfig {
    /// Files below this word count are minimal-content removal candidates
    #[serde(default = "default_min_words")]
    pub min_word_count: usize,

    /// Test reports older than this many days are removal candidates
    #[serde(default = "default_old_test_days")]
    pub old_test_report_days: i64,

    /// Word-count ratio at or above which two files may be duplicates
    #[serde(default = "default_dup_word_ratio")]
    pub duplicate_word_ratio: f64,

    /// Topic-set Jaccard above which two files are considered duplicates
    #[serde(default = "default_dup_topic_overlap")]
    pub duplicate_topic_overlap: f64,
}

impl Default for RemovalConfig {
    fn default() -> Self {
        Self {
            min_word_count: default_min_words(),
            old_test_report_days: default_old_test_days(),
            duplicate_word_ratio: default_dup_word_ratio(),
            duplicate_topic_overlap: default_dup_topic_overlap(),
        }
    }
}

/// Thresholds for cross-reference generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct XrefConfig {
    /// Topic-set Jaccard above which two documents are related
    #[serde(default = "default_topic_overlap")]
    pub topic_overlap_threshold: f64,

    /// Topic-set Jaccard above which a reference must be bidirectional
    #[serde(default = "default_bidirectional_overlap")]
    pub bidirectional_overlap_threshold: f64,
}

impl Default for XrefConfig {
    fn default() -> Self {
        Self {
            topic_overlap_threshold: default_topic_overlap(),
            bidirectional_overlap_threshold: default_bidirectional_overlap(),
        }
    }
}

fn default_extensions() -> Vec<String> {
    vec!["md".to_string()]
}
fn default_output_dir() -> String {
    "consolidated".to_string()
}
fn default_archive_dir() -> String {
    "archive".to_string()
}
fn default_max_topics() -> usize {
    20
}
fn default_heading_weight() -> f64 {
    0.4
}
fn default_content_weight() -> f64 {
    0.4
}
fn default_structure_weight() -> f64 {
    0.2
}
fn default_group_threshold() -> f64 {
    0.4
}
fn default_relaxed_threshold() -> f64 {
    0.3
}
fn default_heading_gate() -> f64 {
    0.6
}
fn default_short_threshold() -> f64 {
    0.7
}
fn default_short_words() -> usize {
    50
}
fn default_unique_fraction() -> f64 {
    0.2
}
fn default_min_line_len() -> usize {
    15
}
fn default_line_dup_threshold() -> f64 {
    0.6
}
fn default_completion_days() -> i64 {
    365
}
fn default_feature_days() -> i64 {
    180
}
fn default_setup_days() -> i64 {
    90
}
fn default_test_report_days() -> i64 {
    30
}
fn default_quick_reference_days() -> i64 {
    180
}
fn default_integration_days() -> i64 {
    120
}
fn default_general_days() -> i64 {
    365
}
fn default_setup_archive_days() -> i64 {
    180
}
fn default_low_priority_archive_days() -> i64 {
    180
}
fn default_min_words() -> usize {
    10
}
fn default_old_test_days() -> i64 {
    90
}
fn default_dup_word_ratio() -> f64 {
    0.8
}
fn default_dup_topic_overlap() -> f64 {
    0.8
}
fn default_topic_overlap() -> f64 {
    0.2
}
fn default_bidirectional_overlap() -> f64 {
    0.3
}

impl TriageConfig {
    /// Load config for a documentation root: per-root file, then the global
    /// config file, then defaults.
    pub fn load(root: &Path) -> Result<Self> {
        let local = root.join(CONFIG_FILE);
        if local.exists() {
            return Self::load_file(&local);
        }

        if let Some(global) = Self::global_config_path() {
            if global.exists() {
                return Self::load_file(&global);
            }
        }

        Ok(Self::default())
    }

    fn load_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| TriageError::InvalidConfig {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    fn global_config_path() -> Option<PathBuf> {
        // Allow environment variable override for testing
        if let Ok(env_dir) = std::env::var(CONFIG_DIR_ENV_VAR) {
            return Some(PathBuf::from(env_dir).join(GLOBAL_CONFIG_FILE));
        }
        dirs::config_dir().map(|d| d.join(GLOBAL_CONFIG_DIR).join(GLOBAL_CONFIG_FILE))
    }
}
