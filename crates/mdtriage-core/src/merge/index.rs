//! Index creation: a directory-style listing of member files grouped by
//! content type. Source text is never inlined; test reports and result
//! sets keep their own files and get linked instead.

use std::collections::BTreeMap;

use crate::classify::AnalyzedFile;
use crate::grouping::ConsolidationGroup;

use super::{file_title, group_title};

const TOP_TOPICS: usize = 5;

pub fn merge(members: &[&AnalyzedFile], group: &ConsolidationGroup) -> String {
    let mut by_type: BTreeMap<&'static str, Vec<&AnalyzedFile>> = BTreeMap::new();
    for file in members {
        by_type
            .entry(file.classification.content_type.as_str())
            .or_default()
            .push(*file);
    }

    let mut out = format!("# {} Index\n", group_title(group));

    for (content_type, files) in &by_type {
        out.push_str(&format!("\n## {}\n\n", type_heading(content_type)));
        for file in files {
            out.push_str(&format!(
                "- [{}](./{}) - {}\n",
                file.filename(),
                file.filename(),
                describe(file),
            ));
            let topics = top_topics(file);
            if !topics.is_empty() {
                out.push_str(&format!("  - Topics: {}\n", topics.join(", ")));
            }
        }
    }

    out
}

fn type_heading(content_type: &str) -> String {
    content_type
        .split('_')
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

/// One-line description: first heading if present, else a word-count note.
fn describe(file: &AnalyzedFile) -> String {
    if file.metadata.headings.is_empty() {
        format!("{} words", file.metadata.word_count)
    } else {
        format!("{} ({} words)", file_title(file), file.metadata.word_count)
    }
}

fn top_topics(file: &AnalyzedFile) -> Vec<String> {
    file.metadata
        .key_topics
        .iter()
        .take(TOP_TOPICS)
        .cloned()
        .collect()
}
