//! Consolidation merger
//!
//! Takes one [`ConsolidationGroup`] at a time and dispatches to the merge
//! strategy the group identifier assigned. Per-member read failures skip
//! that member and keep going; only a structurally invalid group (a primary
//! file missing from the analyzed set) is a hard error, because that means
//! grouping produced garbage rather than the input being messy.

pub mod chronological;
pub mod index;
pub mod preserve;
pub mod summaries;
pub mod topical;

use std::collections::HashMap;

use tracing::warn;

use crate::classify::AnalyzedFile;
use crate::config::TriageConfig;
use crate::error::{Result, TriageError};
use crate::grouping::{ConsolidationGroup, ConsolidationStrategy};

/// The markdown produced for one group plus the files that contributed.
/// Empty text means "nothing to write".
#[derive(Debug, Clone)]
pub struct MergeResult {
    pub group_id: String,
    pub output_filename: String,
    pub text: String,
    pub sources: Vec<String>,
    pub warnings: Vec<String>,
}

impl MergeResult {
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

/// Merge one group's members into a single markdown document.
pub fn merge_group(
    group: &ConsolidationGroup,
    files: &[AnalyzedFile],
    config: &TriageConfig,
) -> Result<MergeResult> {
    let by_name: HashMap<&str, &AnalyzedFile> =
        files.iter().map(|f| (f.filename(), f)).collect();

    if !by_name.contains_key(group.primary_file.as_str()) {
        return Err(TriageError::InvalidGroup {
            group_id: group.group_id.clone(),
            primary: group.primary_file.clone(),
        });
    }

    let mut warnings = Vec::new();
    let mut members: Vec<&AnalyzedFile> = Vec::new();
    for name in group.members() {
        match by_name.get(name) {
            Some(file) if file.record.text().is_some() => members.push(*file),
            Some(_) => {
                warn!(group = %group.group_id, file = name, "skipping unreadable member");
                warnings.push(format!("skipped unreadable file: {name}"));
            }
            None => {
                warn!(group = %group.group_id, file = name, "skipping unknown member");
                warnings.push(format!("skipped unknown file: {name}"));
            }
        }
    }

    if members.is_empty() {
        warn!(group = %group.group_id, "no readable members, producing empty output");
        warnings.push(format!("group {} had no readable members", group.group_id));
        return Ok(MergeResult {
            group_id: group.group_id.clone(),
            output_filename: group.output_filename.clone(),
            text: String::new(),
            sources: Vec::new(),
            warnings,
        });
    }

    let text = match group.strategy {
        ConsolidationStrategy::MergeChronological => chronological::merge(&members, group),
        ConsolidationStrategy::MergeTopical => {
            topical::merge(&members, group, &config.redundancy)
        }
        ConsolidationStrategy::CombineSummaries => summaries::merge(&members, group),
        ConsolidationStrategy::CreateIndex => index::merge(&members, group),
        ConsolidationStrategy::ArchivePreserve => preserve::merge(&members, group),
        ConsolidationStrategy::MergeSequential => {
            let ordered = sequential_order(&members);
            concat(&ordered, group)
        }
        ConsolidationStrategy::NoConsolidation => concat(&members, group),
    };

    Ok(MergeResult {
        group_id: group.group_id.clone(),
        output_filename: group.output_filename.clone(),
        text,
        sources: members.iter().map(|f| f.filename().to_string()).collect(),
        warnings,
    })
}

/// Human title for the consolidated document, derived from the group id.
pub(crate) fn group_title(group: &ConsolidationGroup) -> String {
    group
        .group_id
        .split('-')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Per-file section title: first heading if present, else the filename stem.
pub(crate) fn file_title(file: &AnalyzedFile) -> String {
    file.metadata
        .headings
        .first()
        .cloned()
        .unwrap_or_else(|| {
            file.filename()
                .trim_end_matches(".md")
                .replace(['_', '-'], " ")
        })
}

/// Drop the first top-level `# ` heading so member content nests cleanly.
pub(crate) fn strip_top_heading(text: &str) -> String {
    let mut lines = text.lines();
    let mut out: Vec<&str> = Vec::new();
    let mut stripped = false;
    for line in lines.by_ref() {
        if !stripped && line.starts_with("# ") {
            stripped = true;
            continue;
        }
        out.push(line);
    }
    out.join("\n").trim().to_string()
}

/// Plain ordered concatenation under "From:" headings, no deduplication.
fn concat(members: &[&AnalyzedFile], group: &ConsolidationGroup) -> String {
    let mut out = format!("# {}\n", group_title(group));
    for file in members {
        let body = file.record.text().unwrap_or_default();
        out.push_str(&format!("\n## From: {}\n\n{}\n", file.filename(), body.trim()));
    }
    out
}

/// Rank for install -> configure -> deploy ordering of setup files
const SEQUENTIAL_RANKS: &[(&str, u8)] = &[
    ("install", 0),
    ("setup", 1),
    ("config", 2),
    ("environment", 3),
    ("deploy", 4),
];

/// Order setup-type members by workflow keyword, then filename.
fn sequential_order<'a>(members: &[&'a AnalyzedFile]) -> Vec<&'a AnalyzedFile> {
    let rank = |file: &AnalyzedFile| -> u8 {
        let name = file.filename().to_lowercase();
        SEQUENTIAL_RANKS
            .iter()
            .find(|(kw, _)| name.contains(kw))
            .map(|(_, r)| *r)
            .unwrap_or(5)
    };
    let mut ordered = members.to_vec();
    ordered.sort_by(|a, b| rank(a).cmp(&rank(b)).then_with(|| a.filename().cmp(b.filename())));
    ordered
}
