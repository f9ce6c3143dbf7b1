//! Redundancy elimination across overlapping markdown content
//!
//! Naive text diffing fails on restructured prose, so the approach is:
//! split everything into sections, group near-duplicate sections by a
//! weighted similarity score, keep the best representative of each group,
//! and harvest the genuinely unique lines from the rest so "says mostly the
//! same thing but adds X" never loses X. Merged sections are finally
//! re-ordered by a heading-priority table so the combined document reads
//! front-matter-first rather than in arrival order.

pub mod section;
pub mod similarity;

use std::collections::HashSet;

use section::{split_sections, Section};
use similarity::should_group;

use crate::config::RedundancyConfig;
use crate::text;

/// Labeled buckets for harvested unique lines
const ADDITION_BUCKETS: &[(&str, &[&str])] = &[
    ("Additional Features", &["feature", "support", "capability", "enhancement"]),
    ("Enhanced Implementation", &["implement", "code", "function", "class", "module"]),
    ("Extended Testing", &["test", "coverage", "validation", "verified"]),
];
const DEFAULT_BUCKET: &str = "Additional Information";

/// Heading-keyword priority table for the final global ordering;
/// unlisted headings sit mid-table.
const HEADING_PRIORITIES: &[(&[&str], u8)] = &[
    (&["overview", "introduction", "summary"], 10),
    (&["setup", "install", "installation", "configuration"], 20),
    (&["feature", "features"], 30),
    (&["implementation", "details", "architecture"], 40),
    (&["testing", "tests", "validation"], 60),
    (&["troubleshooting", "faq", "known issues"], 70),
    (&["conclusion", "next steps"], 80),
];
const DEFAULT_HEADING_PRIORITY: u8 = 50;

/// Merge multiple content blobs into one deduplicated markdown text.
pub fn eliminate_redundancy(blobs: &[String], config: &RedundancyConfig) -> String {
    let mut sections: Vec<Section> = Vec::new();
    for blob in blobs {
        sections.extend(split_sections(blob));
    }

    if sections.is_empty() {
        return String::new();
    }

    if config.stemming {
        for section in &mut sections {
            section.words = text::word_set_stemmed(&section.body, true);
        }
    }

    let groups = group_sections(sections, config);

    let mut merged: Vec<Section> = groups
        .into_iter()
        .map(|group| merge_group(group, config))
        .collect();

    merged.sort_by_key(|s| heading_priority(&s.heading));

    merged
        .iter()
        .map(Section::render)
        .collect::<Vec<_>>()
        .join("\n\n")
        + "\n"
}

/// Greedy grouping: each section joins the first existing group whose
/// representative it matches, else starts its own.
fn group_sections(sections: Vec<Section>, config: &RedundancyConfig) -> Vec<Vec<Section>> {
    let mut groups: Vec<Vec<Section>> = Vec::new();

    for section in sections {
        let slot = groups
            .iter()
            .position(|group| should_group(&group[0], &section, config));
        match slot {
            Some(i) => groups[i].push(section),
            None => groups.push(vec![section]),
        }
    }

    groups
}

/// Merge one similarity group: keep the best section, then append unique
/// lines from the others under labeled subheadings.
fn merge_group(mut group: Vec<Section>, config: &RedundancyConfig) -> Section {
    if group.len() == 1 {
        return group.remove(0);
    }

    // Best representative by (word_count, code, links, lists)
    let best_index = group
        .iter()
        .enumerate()
        .max_by_key(|(_, s)| (s.word_count, s.has_code, s.has_links, s.has_lists))
        .map(|(i, _)| i)
        .unwrap_or(0);

    let mut base = group.swap_remove(best_index);
    let base_lines: Vec<String> = base
        .body
        .lines()
        .map(|l| l.trim().to_string())
        .filter(|l| !l.is_empty())
        .collect();

    let mut bucketed: Vec<(&'static str, Vec<String>)> = Vec::new();
    for other in &group {
        for line in unique_lines(other, &base, &base_lines, config) {
            let bucket = bucket_for_line(&line);
            match bucketed.iter_mut().find(|(label, _)| *label == bucket) {
                Some((_, lines)) => {
                    if !lines.contains(&line) {
                        lines.push(line);
                    }
                }
                None => bucketed.push((bucket, vec![line])),
            }
        }
    }

    for (label, lines) in bucketed {
        base.body.push_str(&format!(
            "\n{} {}\n\n",
            "#".repeat((base.level.max(1) + 1).min(6)),
            label
        ));
        for line in lines {
            base.body.push_str(&line);
            base.body.push('\n');
        }
    }

    base
}

/// A line from `other` is a unique addition when enough of its words are
/// new to the base, it is long enough to carry meaning, and it is not a
/// near-duplicate of an existing base line.
fn unique_lines(
    other: &Section,
    base: &Section,
    base_lines: &[String],
    config: &RedundancyConfig,
) -> Vec<String> {
    let mut result = Vec::new();

    for line in other.body.lines() {
        let line = line.trim();
        if line.len() <= config.min_unique_line_len
            || line.starts_with('#')
            || line.starts_with("```")
        {
            continue;
        }

        // Line words go through the same stemming as the base word set
        let line_words: HashSet<String> = text::word_set_stemmed(line, config.stemming);
        if line_words.is_empty() {
            continue;
        }

        let new_words = line_words
            .iter()
            .filter(|w| !base.words.contains(*w))
            .count();
        if (new_words as f64) / (line_words.len() as f64) < config.unique_word_fraction {
            continue;
        }

        let near_duplicate = base_lines
            .iter()
            .any(|b| text::jaccard_str(b, line) >= config.line_duplicate_threshold);
        if near_duplicate {
            continue;
        }

        result.push(line.to_string());
    }

    result
}

/// Route a harvested line to its labeled bucket by keyword.
fn bucket_for_line(line: &str) -> &'static str {
    let lower = line.to_lowercase();
    for (label, keywords) in ADDITION_BUCKETS {
        if keywords.iter().any(|k| lower.contains(k)) {
            return label;
        }
    }
    DEFAULT_BUCKET
}

/// Priority of a heading in the final global ordering.
fn heading_priority(heading: &str) -> u8 {
    let lower = heading.to_lowercase();
    for (keywords, priority) in HEADING_PRIORITIES {
        if keywords.iter().any(|k| lower.contains(k)) {
            return *priority;
        }
    }
    DEFAULT_HEADING_PRIORITY
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_two_restatements_shrink() {
        let a = "# Authentication Setup\n\nThe service issues JWT tokens on login and \
                 stores hashed credentials with bcrypt before any session begins.\n"
            .to_string();
        let b = "# Authentication Setup\n\nThe service issues JWT tokens on login and \
                 stores hashed credentials with bcrypt before any session begins.\n\n\
                 The signing KEYMARKER secret rotates daily via a scheduled job.\n"
            .to_string();

        let merged = eliminate_redundancy(&[a.clone(), b.clone()], &RedundancyConfig::default());

        assert!(merged.len() < a.len() + b.len());
        assert!(merged.contains("KEYMARKER"));
        assert!(merged.contains("JWT"));
    }

    #[test]
    fn test_distinct_markers_from_both_sides_survive() {
        let a = "# Deploy Guide\n\nRun the standard deploy pipeline with the shared \
                 release checklist and the usual config validation pass.\n\n\
                 - ALPHATOKEN rollout gate must clear before paging the release captain\n"
            .to_string();
        let b = "# Deploy Guide\n\nRun the standard deploy pipeline with the shared \
                 release checklist and the usual config validation pass.\n\n\
                 - BETATOKEN approval needs signoff from whoever owns payments oncall\n"
            .to_string();

        let merged = eliminate_redundancy(&[a.clone(), b.clone()], &RedundancyConfig::default());
        assert!(merged.len() < a.len() + b.len());
        assert!(merged.contains("ALPHATOKEN"));
        assert!(merged.contains("BETATOKEN"));
    }

    #[test]
    fn test_stemming_flag_groups_inflected_restatements() {
        // Same vocabulary, singular on one side and plural on the other, so
        // the unstemmed word sets share nothing
        let singular = "process payment refund charge invoice receipt dispute \
                        settlement transfer handler ";
        let plural = "processes payments refunds charges invoices receipts disputes \
                      settlements transfers handlers ";
        let a = format!("# Payment Handling\n\n{}ledger\n", singular.repeat(5));
        let b = format!("# Payments Handled\n\n{}\n", plural.repeat(5));
        let blobs = [a, b];

        let plain = eliminate_redundancy(&blobs, &RedundancyConfig::default());
        assert!(plain.contains("# Payment Handling"));
        assert!(plain.contains("# Payments Handled"));

        let config = RedundancyConfig {
            stemming: true,
            ..RedundancyConfig::default()
        };
        let stemmed = eliminate_redundancy(&blobs, &config);
        assert!(stemmed.contains("# Payment Handling"));
        assert!(!stemmed.contains("# Payments Handled"));
    }

    #[test]
    fn test_dissimilar_sections_kept_apart() {
        let a = "# Billing\n\ninvoices ledger reconciliation accounting entries posted \
                 monthly for the finance team with exported statements and audit trails.\n"
            .to_string();
        let b = "# Scheduler\n\npreemption interrupts context switching threads running \
                 on isolated cores with pinned affinities and deadline budgets.\n"
            .to_string();

        let merged = eliminate_redundancy(&[a, b], &RedundancyConfig::default());
        assert!(merged.contains("# Billing"));
        assert!(merged.contains("# Scheduler"));
        assert!(merged.contains("invoices"));
        assert!(merged.contains("preemption"));
    }

    #[test]
    fn test_sections_reordered_by_priority() {
        let blob = "# Troubleshooting\n\nwhen things break look at the logs first \
                    and restart the affected worker processes cleanly.\n\n\
                    # Overview\n\nthis document covers the ingestion service end to end \
                    including its operational profile and daily care.\n"
            .to_string();

        let merged = eliminate_redundancy(&[blob], &RedundancyConfig::default());
        let overview = merged.find("# Overview").unwrap();
        let troubleshooting = merged.find("# Troubleshooting").unwrap();
        assert!(overview < troubleshooting);
    }

    #[test]
    fn test_additions_land_in_labeled_buckets() {
        let a = "# Payments\n\nThe payments module handles card charges and refunds \
                 through the gateway with idempotent retries on failure paths.\n\n\
                 Refunds settle back to the original card within five business days.\n\n\
                 Disputes are escalated manually by the support rotation when evidence \
                 is missing from the gateway response.\n"
            .to_string();
        let b = "# Payments\n\nThe payments module handles card charges and refunds \
                 through the gateway with idempotent retries on failure paths.\n\n\
                 New test coverage for chargeback validation flows landed in the \
                 QMARKER suite.\n"
            .to_string();

        let merged = eliminate_redundancy(&[a, b], &RedundancyConfig::default());
        assert!(merged.contains("QMARKER"));
        assert!(merged.contains("Extended Testing"));
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(
            eliminate_redundancy(&[], &RedundancyConfig::default()),
            ""
        );
    }
}
