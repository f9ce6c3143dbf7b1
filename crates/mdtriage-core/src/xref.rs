//! Cross-reference generation between consolidated documents
//!
//! Four independent strategies each propose related documents: topic
//! overlap, explicit mentions, dependency phrases, and workflow adjacency.
//! Candidates are unioned, scored, and relevance-sorted; bidirectionality
//! is then enforced for strong relationships, because a reader following a
//! link expects to be able to navigate back.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::config::XrefConfig;
use crate::metadata;
use crate::text;

/// Relevance weights for the combined candidate score
const TOPIC_WEIGHT: f64 = 40.0;
const MENTION_WEIGHT: f64 = 30.0;
const DEPENDENCY_WEIGHT: f64 = 25.0;
const STAGE_WEIGHT: f64 = 20.0;
const LABEL_WEIGHT: f64 = 15.0;

/// Widened topic cap for cross-referencing
const XREF_TOPIC_CAP: usize = 30;

/// Mapping from output document name to relevance-sorted related documents
#[derive(Debug, Clone, Default, Serialize)]
pub struct CrossReferenceMap {
    pub references: BTreeMap<String, Vec<String>>,
}

impl CrossReferenceMap {
    pub fn related(&self, name: &str) -> &[String] {
        self.references.get(name).map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Coarse workflow stage of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStage {
    Setup,
    Authentication,
    Payment,
    Tournament,
    Testing,
    Deployment,
    Completion,
    General,
}

/// Coarse content label of a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocLabel {
    Guide,
    Reference,
    Setup,
    Testing,
    Completion,
    Documentation,
}

/// Per-document analysis feeding the four strategies
#[derive(Debug)]
struct DocProfile {
    name: String,
    topics: HashSet<String>,
    headings: HashSet<String>,
    mentions: Vec<String>,
    dependencies: Vec<String>,
    stage: WorkflowStage,
    label: DocLabel,
}

/// Generate the cross-reference map for a full document set.
pub fn generate(documents: &BTreeMap<String, String>, config: &XrefConfig) -> CrossReferenceMap {
    let profiles: Vec<DocProfile> = documents
        .iter()
        .map(|(name, content)| profile(name, content))
        .collect();

    let mut map: BTreeMap<String, Vec<String>> = BTreeMap::new();

    for profile in &profiles {
        let mut scored: HashMap<&str, f64> = HashMap::new();

        for other in &profiles {
            if other.name == profile.name {
                continue;
            }

            let mut score = 0.0;
            let overlap = text::jaccard(&profile.topics, &other.topics);
            if overlap > config.topic_overlap_threshold {
                score += overlap * TOPIC_WEIGHT;
            }
            if mentions_document(profile, other) {
                score += MENTION_WEIGHT;
            }
            if depends_on(profile, other) {
                score += DEPENDENCY_WEIGHT;
            }
            if profile.stage == other.stage && profile.stage != WorkflowStage::General {
                score += STAGE_WEIGHT;
            } else if stage_precedes(profile.stage, other.stage) {
                // Adjacency proposes the candidate without the same-stage bonus
                score += STAGE_WEIGHT / 2.0;
            }
            if score > 0.0 && profile.label == other.label {
                score += LABEL_WEIGHT;
            }

            if score > 0.0 {
                scored.insert(&other.name, score);
            }
        }

        let mut candidates: Vec<(&str, f64)> = scored.into_iter().collect();
        candidates.sort_by(|a, b| {
            b.1.partial_cmp(&a.1)
                .unwrap_or(std::cmp::Ordering::Equal)
                .then_with(|| a.0.cmp(b.0))
        });

        map.insert(
            profile.name.clone(),
            candidates.into_iter().map(|(n, _)| n.to_string()).collect(),
        );
    }

    enforce_bidirectionality(&mut map, &profiles, config);

    CrossReferenceMap { references: map }
}

/// If A references B and the relationship is strong, B must reference A
/// even when one-directional scoring didn't surface it.
fn enforce_bidirectionality(
    map: &mut BTreeMap<String, Vec<String>>,
    profiles: &[DocProfile],
    config: &XrefConfig,
) {
    let by_name: HashMap<&str, &DocProfile> =
        profiles.iter().map(|p| (p.name.as_str(), p)).collect();

    let pairs: Vec<(String, String)> = map
        .iter()
        .flat_map(|(a, refs)| refs.iter().map(move |b| (a.clone(), b.clone())))
        .collect();

    for (a, b) in pairs {
        let (Some(pa), Some(pb)) = (by_name.get(a.as_str()), by_name.get(b.as_str())) else {
            continue;
        };

        let strong = text::jaccard(&pa.topics, &pb.topics)
            > config.bidirectional_overlap_threshold
            || (pa.stage == pb.stage && pa.stage != WorkflowStage::General)
            || depends_on(pa, pb)
            || depends_on(pb, pa);

        if strong {
            let back = map.entry(b).or_default();
            if !back.contains(&a) {
                back.push(a);
            }
        }
    }
}

fn profile(name: &str, content: &str) -> DocProfile {
    let headings = metadata::extract_headings(content);
    let topics: HashSet<String> =
        metadata::extract_topics(content, &headings, XREF_TOPIC_CAP)
            .into_iter()
            .map(|t| t.to_lowercase())
            .collect();
    let heading_words: HashSet<String> = headings
        .iter()
        .flat_map(|h| text::word_set(h))
        .collect();

    DocProfile {
        name: name.to_string(),
        topics,
        headings: heading_words,
        mentions: extract_mentions(content),
        dependencies: extract_dependencies(content),
        stage: workflow_stage(name, content),
        label: doc_label(name, content),
    }
}

/// "see X.md" / "refer to X.md" style phrases plus internal markdown links
fn extract_mentions(content: &str) -> Vec<String> {
    static SEE_RE: OnceLock<Regex> = OnceLock::new();
    let see_re = SEE_RE.get_or_init(|| {
        Regex::new(r"(?i)(?:see|refer to|check|consult)\s+([A-Za-z0-9_./-]+\.md)").unwrap()
    });

    let mut mentions: Vec<String> = see_re
        .captures_iter(content)
        .map(|caps| caps[1].to_lowercase())
        .collect();

    let (internal, _) = metadata::extract_links(content);
    mentions.extend(internal.into_iter().map(|l| l.to_lowercase()));
    mentions.sort();
    mentions.dedup();
    mentions
}

/// "requires X" / "depends on X" / "uses X" phrases, kept short
fn extract_dependencies(content: &str) -> Vec<String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"(?i)(?:requires|depends on|uses|built on|needs)\s+(?:the\s+)?([a-zA-Z][a-zA-Z0-9_ -]{2,40})")
            .unwrap()
    });

    re.captures_iter(content)
        .map(|caps| caps[1].trim().to_lowercase())
        .collect()
}

fn mentions_document(profile: &DocProfile, other: &DocProfile) -> bool {
    let other_name = other.name.to_lowercase();
    let other_stem = other_name
        .rsplit_once('.')
        .map(|(s, _)| s.to_string())
        .unwrap_or_else(|| other_name.clone());

    profile.mentions.iter().any(|m| {
        m == &other_name
            || m.ends_with(&format!("/{other_name}"))
            || m.trim_end_matches(".md") == other_stem
            || other.topics.contains(m.trim_end_matches(".md"))
    })
}

/// A dependency phrase matches another document's topics or headings
fn depends_on(profile: &DocProfile, other: &DocProfile) -> bool {
    profile.dependencies.iter().any(|dep| {
        let dep_words = text::word_set(dep);
        dep_words
            .iter()
            .any(|w| w.len() > 3 && (other.topics.contains(w) || other.headings.contains(w)))
    })
}

/// Keyword scan over filename + content choosing the first matching stage
pub fn workflow_stage(name: &str, content: &str) -> WorkflowStage {
    let haystack = format!("{} {}", name.to_lowercase(), content.to_lowercase());

    const STAGES: &[(WorkflowStage, &[&str])] = &[
        (WorkflowStage::Setup, &["setup", "install", "configuration"]),
        (WorkflowStage::Authentication, &["auth", "login", "jwt", "oauth"]),
        (WorkflowStage::Payment, &["payment", "billing", "checkout"]),
        (WorkflowStage::Tournament, &["tournament", "bracket", "leaderboard"]),
        (WorkflowStage::Testing, &["test", "validation", "qa"]),
        (WorkflowStage::Deployment, &["deploy", "release", "production"]),
        (WorkflowStage::Completion, &["complete", "summary", "finished"]),
    ];

    for (stage, keywords) in STAGES {
        if keywords.iter().any(|k| haystack.contains(k)) {
            return *stage;
        }
    }
    WorkflowStage::General
}

/// Fixed adjacency: which stages logically follow which
fn stage_precedes(from: WorkflowStage, to: WorkflowStage) -> bool {
    use WorkflowStage::*;
    match from {
        Setup => matches!(to, Authentication | Payment | Tournament),
        Authentication => matches!(to, Payment | Tournament),
        Payment | Tournament => matches!(to, Testing),
        Testing => matches!(to, Deployment),
        Deployment => matches!(to, Completion),
        // Completion relates back to everything
        Completion => !matches!(to, Completion),
        General => false,
    }
}

fn doc_label(name: &str, content: &str) -> DocLabel {
    let haystack = format!("{} {}", name.to_lowercase(), content.to_lowercase());

    if haystack.contains("reference") || haystack.contains("cheat") {
        DocLabel::Reference
    } else if haystack.contains("setup") || haystack.contains("install") {
        DocLabel::Setup
    } else if haystack.contains("test") || haystack.contains("validation") {
        DocLabel::Testing
    } else if haystack.contains("complete") || haystack.contains("summary") {
        DocLabel::Completion
    } else if haystack.contains("guide") || haystack.contains("how to") {
        DocLabel::Guide
    } else {
        DocLabel::Documentation
    }
}
