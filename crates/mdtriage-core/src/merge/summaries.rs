//! Summary combination: chronological ordering plus an extracted digest
//! (first substantial paragraph and key points) surfaced above each
//! member's full content.

use std::sync::OnceLock;

use regex::Regex;

use crate::chronology;
use crate::classify::AnalyzedFile;
use crate::grouping::ConsolidationGroup;

use super::{file_title, group_title, strip_top_heading};

/// Verbs that mark a sentence as a completion statement
const COMPLETION_VERBS: &[&str] = &[
    "completed",
    "implemented",
    "fixed",
    "added",
    "resolved",
    "finished",
    "deployed",
];

/// A paragraph must carry at least this many words to serve as a summary
const SUBSTANTIAL_WORDS: usize = 10;

const MAX_KEY_POINTS: usize = 10;

pub fn merge(members: &[&AnalyzedFile], group: &ConsolidationGroup) -> String {
    let ordered = chronology::order(members);

    let mut out = format!("# {}\n\n## Summary\n\n", group_title(group));

    for file in &ordered {
        let text = file.record.text().unwrap_or_default();
        out.push_str(&format!("### {}\n\n", file_title(file)));

        if let Some(paragraph) = first_substantial_paragraph(text) {
            out.push_str(&format!("{paragraph}\n\n"));
        }

        let points = key_points(text);
        if !points.is_empty() {
            out.push_str("Key points:\n\n");
            for point in points {
                out.push_str(&format!("- {point}\n"));
            }
            out.push('\n');
        }
    }

    out.push_str("## Full Content\n\n");
    for file in &ordered {
        let body = strip_top_heading(file.record.text().unwrap_or_default());
        out.push_str(&format!("### {}\n\n{}\n\n", file_title(file), body));
    }

    out.trim_end().to_string() + "\n"
}

/// First paragraph that is prose (not a heading, list, or fence) and long
/// enough to stand as a one-paragraph summary.
pub(crate) fn first_substantial_paragraph(text: &str) -> Option<String> {
    for paragraph in text.split("\n\n") {
        let trimmed = paragraph.trim();
        if trimmed.is_empty()
            || trimmed.starts_with('#')
            || trimmed.starts_with("```")
            || is_list_line(trimmed)
        {
            continue;
        }
        if trimmed.split_whitespace().count() >= SUBSTANTIAL_WORDS {
            return Some(trimmed.replace('\n', " "));
        }
    }
    None
}

/// Bullet and numbered lines, plus sentences containing completion verbs.
pub(crate) fn key_points(text: &str) -> Vec<String> {
    let mut points = Vec::new();

    let mut in_fence = false;
    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("```") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence {
            continue;
        }
        if is_list_line(trimmed) {
            let cleaned = strip_list_marker(trimmed);
            if !cleaned.is_empty() {
                points.push(cleaned.to_string());
            }
        }
    }

    for sentence in sentences(text) {
        let lower = sentence.to_lowercase();
        if COMPLETION_VERBS.iter().any(|v| lower.contains(v))
            && !points.iter().any(|p| p == &sentence)
        {
            points.push(sentence);
        }
    }

    points.truncate(MAX_KEY_POINTS);
    points
}

fn is_list_line(line: &str) -> bool {
    static NUMBERED: OnceLock<Regex> = OnceLock::new();
    let numbered = NUMBERED.get_or_init(|| Regex::new(r"^\d+[.)]\s").unwrap());
    line.starts_with("- ") || line.starts_with("* ") || numbered.is_match(line)
}

fn strip_list_marker(line: &str) -> &str {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    let marker = MARKER.get_or_init(|| Regex::new(r"^(?:[-*]|\d+[.)])\s+").unwrap());
    match marker.find(line) {
        Some(m) => line[m.end()..].trim(),
        None => line.trim(),
    }
}

/// Prose sentences, fences and headings excluded
fn sentences(text: &str) -> Vec<String> {
    let mut prose = String::new();
    let mut in_fence = false;
    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("```") {
            in_fence = !in_fence;
            continue;
        }
        if in_fence || trimmed.starts_with('#') || is_list_line(trimmed) {
            continue;
        }
        prose.push_str(trimmed);
        prose.push(' ');
    }

    prose
        .split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| s.split_whitespace().count() >= 3)
        .map(|s| s.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::Category;
    use crate::grouping::ConsolidationStrategy;
    use crate::outdated::test_support::undated_file;

    fn summary_group() -> ConsolidationGroup {
        ConsolidationGroup {
            group_id: "implementation-completion-task".to_string(),
            category: Category::ImplementationCompletion,
            primary_file: "TASK_1_COMPLETE.md".to_string(),
            related_files: vec!["TASK_2_COMPLETE.md".to_string()],
            strategy: ConsolidationStrategy::CombineSummaries,
            output_filename: "implementation-completion-task.md".to_string(),
        }
    }

    #[test]
    fn test_task_ordering_and_content_retained() {
        let task1 = undated_file(
            "TASK_1_COMPLETE.md",
            "# Task 1\n\nDate: 2024-01-15\n\nImplemented the login path with JWT tokens \
             and bcrypt hashing for credentials.\n\n- JWT tokens issued on login\n",
        );
        let task2 = undated_file(
            "TASK_2_COMPLETE.md",
            "# Task 2\n\nDate: 2024-02-01\n\nCompleted the OAuth handshake and hardened \
             storage with bcrypt and salt.\n\n- OAuth provider wired up\n",
        );
        let members = vec![&task2, &task1];
        let text = merge(&members, &summary_group());

        let first = text.find("Task 1").unwrap();
        let second = text.find("Task 2").unwrap();
        assert!(first < second);
        assert!(text.contains("JWT tokens"));
        assert!(text.contains("OAuth"));
        assert!(text.contains("## Summary"));
        assert!(text.contains("## Full Content"));
    }

    #[test]
    fn test_key_points_collect_bullets_and_completion_sentences() {
        let text = "Intro prose not long enough.\n\n- first bullet point\n\
                    2. numbered step two\n\nWe implemented the retry queue over the weekend.\n";
        let points = key_points(text);
        assert!(points.contains(&"first bullet point".to_string()));
        assert!(points.contains(&"numbered step two".to_string()));
        assert!(points
            .iter()
            .any(|p| p.contains("implemented the retry queue")));
    }

    #[test]
    fn test_first_substantial_paragraph_skips_headings_and_lists() {
        let text = "# Heading\n\n- a list line\n\nThis paragraph has enough words to \
                    count as the substantial opening summary of the file.\n";
        let paragraph = first_substantial_paragraph(text).unwrap();
        assert!(paragraph.starts_with("This paragraph"));
    }

    #[test]
    fn test_no_substantial_paragraph() {
        assert!(first_substantial_paragraph("# Only\n\nshort\n").is_none());
    }
}
