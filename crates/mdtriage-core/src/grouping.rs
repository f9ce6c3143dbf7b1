//! Clustering classified files into consolidation groups
//!
//! Each category has its own grouping policy and default strategy. The
//! disjointness invariant is enforced before returning: no filename appears
//! in more than one group, with first-writer-wins on conflict. Group IDs
//! are deterministic slugs of category plus dominant shared token so output
//! stays stable across runs on unchanged input.

use std::collections::{BTreeMap, HashSet};

use serde::Serialize;
use tracing::debug;

use crate::classify::{AnalyzedFile, Category};

/// The merge algorithm applied to a group's members
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsolidationStrategy {
    MergeChronological,
    MergeTopical,
    MergeSequential,
    CombineSummaries,
    CreateIndex,
    ArchivePreserve,
    NoConsolidation,
}

impl std::fmt::Display for ConsolidationStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ConsolidationStrategy::MergeChronological => "merge_chronological",
            ConsolidationStrategy::MergeTopical => "merge_topical",
            ConsolidationStrategy::MergeSequential => "merge_sequential",
            ConsolidationStrategy::CombineSummaries => "combine_summaries",
            ConsolidationStrategy::CreateIndex => "create_index",
            ConsolidationStrategy::ArchivePreserve => "archive_preserve",
            ConsolidationStrategy::NoConsolidation => "no_consolidation",
        };
        f.write_str(s)
    }
}

/// A cluster of files slated to be merged into one output document
#[derive(Debug, Clone, Serialize)]
pub struct ConsolidationGroup {
    pub group_id: String,
    pub category: Category,
    /// Anchor file; always excluded from `related_files`
    pub primary_file: String,
    pub related_files: Vec<String>,
    pub strategy: ConsolidationStrategy,
    pub output_filename: String,
}

impl ConsolidationGroup {
    pub fn total_files(&self) -> usize {
        1 + self.related_files.len()
    }

    /// Primary followed by related members
    pub fn members(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.primary_file.as_str())
            .chain(self.related_files.iter().map(String::as_str))
    }
}

/// Identify consolidation groups across the classified corpus.
pub fn identify_groups(files: &[AnalyzedFile]) -> Vec<ConsolidationGroup> {
    // BTreeMap keeps category iteration order stable across runs
    let mut by_category: BTreeMap<&'static str, Vec<&AnalyzedFile>> = BTreeMap::new();
    for file in files {
        by_category
            .entry(file.classification.category.as_str())
            .or_default()
            .push(file);
    }

    let mut groups = Vec::new();
    for (_, members) in by_category {
        let category = members[0].classification.category;
        match category {
            Category::ImplementationCompletion => {
                groups.extend(cluster_by_leading_token(
                    category,
                    &members,
                    ConsolidationStrategy::CombineSummaries,
                ));
            }
            Category::FeatureDocs => {
                groups.extend(cluster_by_leading_token(
                    category,
                    &members,
                    ConsolidationStrategy::MergeTopical,
                ));
            }
            Category::SetupConfig => {
                groups.extend(single_cluster(
                    category,
                    &members,
                    ConsolidationStrategy::MergeSequential,
                    "setup",
                ));
            }
            Category::TestingValidation => {
                groups.extend(single_cluster(
                    category,
                    &members,
                    ConsolidationStrategy::CreateIndex,
                    "testing",
                ));
            }
            Category::HistoricalArchive => {
                groups.extend(single_cluster(
                    category,
                    &members,
                    ConsolidationStrategy::ArchivePreserve,
                    "historical",
                ));
            }
            Category::QuickReferences
            | Category::IntegrationGuides
            | Category::Uncategorized => {
                groups.extend(passthrough(category, &members));
            }
        }
    }

    enforce_disjointness(groups)
}

/// Cluster by the leading filename token (`TASK_1_*` and `TASK_2_*` share
/// `task`); singleton clusters fall back to passthrough.
fn cluster_by_leading_token(
    category: Category,
    members: &[&AnalyzedFile],
    strategy: ConsolidationStrategy,
) -> Vec<ConsolidationGroup> {
    let mut clusters: BTreeMap<String, Vec<&AnalyzedFile>> = BTreeMap::new();
    for file in members {
        clusters
            .entry(leading_token(file.filename()))
            .or_default()
            .push(*file);
    }

    let mut groups = Vec::new();
    for (token, cluster) in clusters {
        if cluster.len() < 2 {
            groups.extend(passthrough(category, &cluster));
            continue;
        }
        groups.push(build_group(category, &cluster, strategy, &token));
    }
    groups
}

/// All members of the category form one group.
fn single_cluster(
    category: Category,
    members: &[&AnalyzedFile],
    strategy: ConsolidationStrategy,
    token: &str,
) -> Vec<ConsolidationGroup> {
    if members.is_empty() {
        return Vec::new();
    }
    if members.len() == 1 {
        return passthrough(category, members);
    }
    vec![build_group(category, members, strategy, token)]
}

/// Single-file passthrough groups, one per file.
fn passthrough(category: Category, members: &[&AnalyzedFile]) -> Vec<ConsolidationGroup> {
    members
        .iter()
        .map(|file| {
            let stem = file
                .filename()
                .rsplit_once('.')
                .map(|(s, _)| s)
                .unwrap_or(file.filename());
            let group_id = slug::slugify(format!("{} {}", category.as_str(), stem));
            ConsolidationGroup {
                group_id: group_id.clone(),
                category,
                primary_file: file.filename().to_string(),
                related_files: Vec::new(),
                strategy: ConsolidationStrategy::NoConsolidation,
                output_filename: format!("{group_id}.md"),
            }
        })
        .collect()
}

fn build_group(
    category: Category,
    cluster: &[&AnalyzedFile],
    strategy: ConsolidationStrategy,
    token: &str,
) -> ConsolidationGroup {
    let mut names: Vec<String> = cluster.iter().map(|f| f.filename().to_string()).collect();
    names.sort();
    names.dedup();

    let primary = names[0].clone();
    let related = names[1..].to_vec();
    let group_id = slug::slugify(format!("{} {}", category.as_str(), token));

    ConsolidationGroup {
        group_id: group_id.clone(),
        category,
        primary_file: primary,
        related_files: related,
        strategy,
        output_filename: format!("{group_id}.md"),
    }
}

/// First token of the filename stem, lowercased: `PAYMENT_SETUP.md` yields
/// `payment`.
pub fn leading_token(filename: &str) -> String {
    let stem = filename.rsplit_once('.').map(|(s, _)| s).unwrap_or(filename);
    stem.split(['_', '-', ' '])
        .find(|t| !t.is_empty())
        .unwrap_or(stem)
        .to_lowercase()
}

/// Drop later duplicate memberships so every filename appears in at most
/// one group; groups emptied of their primary are removed entirely.
fn enforce_disjointness(groups: Vec<ConsolidationGroup>) -> Vec<ConsolidationGroup> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut result = Vec::new();

    for mut group in groups {
        if seen.contains(&group.primary_file) {
            debug!(
                group_id = %group.group_id,
                primary = %group.primary_file,
                "dropping group whose primary already belongs elsewhere"
            );
            // Its related files may still be claimed by nobody; let a later
            // run pick them up rather than inventing a new primary here
            continue;
        }

        seen.insert(group.primary_file.clone());
        group.related_files.retain(|name| seen.insert(name.clone()));
        result.push(group);
    }

    result
}
