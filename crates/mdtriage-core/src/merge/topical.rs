//! Topical merge: sections matched by heading text across member files,
//! each topic deduplicated through the redundancy eliminator, topics
//! emitted alphabetically.

use std::collections::BTreeMap;

use crate::classify::AnalyzedFile;
use crate::config::RedundancyConfig;
use crate::grouping::ConsolidationGroup;
use crate::redundancy::{self, section::split_sections};

use super::group_title;

pub fn merge(
    members: &[&AnalyzedFile],
    group: &ConsolidationGroup,
    config: &RedundancyConfig,
) -> String {
    // Topic key is the normalized heading; heading-less preamble sections
    // collect under an empty key and surface first.
    let mut topics: BTreeMap<String, Vec<String>> = BTreeMap::new();
    for file in members {
        let text = file.record.text().unwrap_or_default();
        for section in split_sections(text) {
            topics
                .entry(topic_key(&section.heading))
                .or_default()
                .push(section.render());
        }
    }

    let mut out = format!("# {}\n", group_title(group));
    for blobs in topics.values() {
        let merged = if blobs.len() > 1 {
            redundancy::eliminate_redundancy(blobs, config)
        } else {
            blobs[0].clone()
        };
        let merged = merged.trim();
        if merged.is_empty() {
            continue;
        }
        out.push_str(&format!("\n{merged}\n"));
    }
    out
}

fn topic_key(heading: &str) -> String {
    heading.trim().to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Category;
    use crate::grouping::ConsolidationStrategy;
    use crate::outdated::test_support::undated_file;

    fn topical_group() -> ConsolidationGroup {
        ConsolidationGroup {
            group_id: "feature-docs-payment".to_string(),
            category: Category::FeatureDocs,
            primary_file: "PAYMENT_FLOW.md".to_string(),
            related_files: vec!["PAYMENT_WEBHOOKS.md".to_string()],
            strategy: ConsolidationStrategy::MergeTopical,
            output_filename: "feature-docs-payment.md".to_string(),
        }
    }

    #[test]
    fn test_matching_headings_deduplicated() {
        let a = undated_file(
            "PAYMENT_FLOW.md",
            "## Overview\n\nThe payment gateway accepts card charges through the \
             checkout flow and validates the amounts.\n",
        );
        let b = undated_file(
            "PAYMENT_WEBHOOKS.md",
            "## Overview\n\nThe payment gateway accepts card charges through the \
             checkout flow and validates the amounts.\n\n- WEBHOOKMARK retries are delivered with exponential backoff\n",
        );
        let members = vec![&a, &b];
        let text = merge(&members, &topical_group(), &RedundancyConfig::default());

        assert_eq!(text.matches("## Overview").count(), 1);
        assert!(text.contains("WEBHOOKMARK"));
    }

    #[test]
    fn test_distinct_topics_sorted_alphabetically() {
        let a = undated_file(
            "PAYMENT_FLOW.md",
            "## Refunds\n\nRefund handling returns the captured amount to the card.\n",
        );
        let b = undated_file(
            "PAYMENT_WEBHOOKS.md",
            "## Delivery\n\nWebhook delivery signs each payload with the shared secret.\n",
        );
        let members = vec![&a, &b];
        let text = merge(&members, &topical_group(), &RedundancyConfig::default());

        let delivery = text.find("## Delivery").unwrap();
        let refunds = text.find("## Refunds").unwrap();
        assert!(delivery < refunds);
    }
}
