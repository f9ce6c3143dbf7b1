//! Metadata extraction from raw markdown text
//!
//! Pure structural analysis: headings, word counts, links, code fences, and
//! the topic heuristics every later stage leans on. YAML frontmatter is
//! consulted first for author/date; a regex scan of the top of the document
//! covers files without frontmatter. Nothing here fails: unparsable fields
//! stay empty.

use std::collections::HashSet;
use std::sync::OnceLock;

use chrono::{DateTime, NaiveDate, Utc};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::dates::parse_flexible_date;

/// Structural facts extracted from one file's text
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ContentMetadata {
    /// Authored creation date, from frontmatter or a labeled line
    pub creation_date: Option<NaiveDate>,
    /// Last-modified timestamp, from the filesystem (set by the caller)
    pub last_modified: Option<DateTime<Utc>>,
    pub author: Option<String>,
    pub word_count: usize,
    /// Heuristic topics, capped; order carries no meaning
    pub key_topics: Vec<String>,
    pub internal_links: Vec<String>,
    pub external_links: Vec<String>,
    /// Headings in document order, prefix `#` stripped
    pub headings: Vec<String>,
    pub code_blocks: usize,
    pub has_tables: bool,
    pub has_images: bool,
}

/// Loose frontmatter shape: only the fields the extractor cares about,
/// everything else ignored.
#[derive(Debug, Default, Deserialize)]
struct DocFrontmatter {
    #[serde(default)]
    author: Option<String>,
    #[serde(default)]
    created: Option<String>,
    #[serde(default)]
    date: Option<String>,
}

/// Extract metadata from raw markdown text.
pub fn extract(text: &str, max_topics: usize) -> ContentMetadata {
    let (frontmatter, body) = split_frontmatter(text);

    let headings = extract_headings(body);
    let (internal_links, external_links) = extract_links(body);
    let code_blocks = count_code_blocks(body);
    let topics = extract_topics(body, &headings, max_topics);

    let author = frontmatter
        .as_ref()
        .and_then(|fm| fm.author.clone())
        .or_else(|| author_from_text(body));

    let creation_date = frontmatter
        .as_ref()
        .and_then(|fm| fm.created.as_deref().or(fm.date.as_deref()))
        .and_then(parse_flexible_date)
        .or_else(|| labeled_date_from_top(body));

    ContentMetadata {
        creation_date,
        last_modified: None,
        author,
        word_count: text.split_whitespace().count(),
        key_topics: topics,
        internal_links,
        external_links,
        headings,
        code_blocks,
        has_tables: has_tables(body),
        has_images: body.contains("!["),
    }
}

/// Split a leading `---` YAML frontmatter block off the body.
fn split_frontmatter(text: &str) -> (Option<DocFrontmatter>, &str) {
    let rest = match text.strip_prefix("---\n") {
        Some(rest) => rest,
        None => return (None, text),
    };

    let Some(end) = rest.find("\n---") else {
        return (None, text);
    };

    let yaml = &rest[..end];
    let body_start = rest[end + 4..].trim_start_matches('\n');

    // Malformed YAML is not an error; the regex scan covers it
    match serde_yaml::from_str::<DocFrontmatter>(yaml) {
        Ok(fm) => (Some(fm), body_start),
        Err(_) => (None, body_start),
    }
}

/// Every line matching `^#+ text` is a heading, in document order.
pub fn extract_headings(text: &str) -> Vec<String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"(?m)^(#+)\s+(.+)$").unwrap());

    re.captures_iter(text)
        .map(|caps| caps[2].trim().to_string())
        .collect()
}

/// Count fenced code regions (a closing fence completes a region).
pub fn count_code_blocks(text: &str) -> usize {
    let fences = text
        .lines()
        .filter(|line| line.trim_start().starts_with("```"))
        .count();
    fences / 2
}

/// Markdown links split into internal (no scheme) and external (scheme)
pub fn extract_links(text: &str) -> (Vec<String>, Vec<String>) {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"\[([^\]]*)\]\(([^)]+)\)").unwrap());

    static SCHEME: OnceLock<Regex> = OnceLock::new();
    let scheme = SCHEME.get_or_init(|| Regex::new(r"^[a-z][a-z0-9+.-]*:").unwrap());

    let mut internal = Vec::new();
    let mut external = Vec::new();
    for caps in re.captures_iter(text) {
        let target = caps[2].trim().to_string();
        if scheme.is_match(&target) {
            external.push(target);
        } else if !target.starts_with('#') {
            internal.push(target);
        }
    }
    (internal, external)
}

fn has_tables(text: &str) -> bool {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| Regex::new(r"(?m)^\s*\|?[\s:-]*-{3,}[\s|:-]*$").unwrap());

    text.lines().any(|line| line.contains('|')) && re.is_match(text)
}

/// Topic heuristics, unioned in order:
/// heading words longer than 3 chars, capitalized multi-word phrases,
/// identifier-like tokens in prose, identifier-like tokens in code fences.
pub fn extract_topics(text: &str, headings: &[String], max_topics: usize) -> Vec<String> {
    static PHRASE_RE: OnceLock<Regex> = OnceLock::new();
    let phrase_re = PHRASE_RE
        .get_or_init(|| Regex::new(r"\b[A-Z][A-Za-z]+(?:\s+[A-Z][A-Za-z]+)+\b").unwrap());

    static IDENT_RE: OnceLock<Regex> = OnceLock::new();
    let ident_re = IDENT_RE
        .get_or_init(|| Regex::new(r"\b(?:[A-Za-z0-9]+_[A-Za-z0-9_]+|[a-z]+[A-Z]\w+)\b").unwrap());

    let mut topics = Vec::new();
    let mut seen = HashSet::new();
    let mut push = |topic: String, topics: &mut Vec<String>| {
        let key = topic.to_lowercase();
        if !key.is_empty() && seen.insert(key) {
            topics.push(topic);
        }
    };

    for heading in headings {
        for word in heading.split_whitespace() {
            let word: String = word
                .chars()
                .filter(|c| c.is_alphanumeric() || *c == '_')
                .collect();
            if word.len() > 3 {
                push(word.to_lowercase(), &mut topics);
            }
        }
    }

    let (prose, code) = split_code_fences(text);

    for caps in phrase_re.captures_iter(&prose) {
        push(caps[0].to_string(), &mut topics);
    }

    for caps in ident_re.captures_iter(&prose) {
        push(caps[0].to_string(), &mut topics);
    }

    for caps in ident_re.captures_iter(&code) {
        push(caps[0].to_string(), &mut topics);
    }

    topics.truncate(max_topics);
    topics
}

/// Separate fenced-code content from prose so the identifier heuristics can
/// treat them differently.
fn split_code_fences(text: &str) -> (String, String) {
    let mut prose = String::new();
    let mut code = String::new();
    let mut in_fence = false;

    for line in text.lines() {
        if line.trim_start().starts_with("```") {
            in_fence = !in_fence;
            continue;
        }
        let target = if in_fence { &mut code } else { &mut prose };
        target.push_str(line);
        target.push('\n');
    }

    (prose, code)
}

/// `Author:` style lines near the top of the document; first match wins.
fn author_from_text(text: &str) -> Option<String> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"(?mi)^\s*(?:\*\*)?(?:author|by|written by)(?:\*\*)?\s*:\s*(?:\*\*)?(.+?)(?:\*\*)?\s*$")
            .unwrap()
    });

    let top: String = text.lines().take(20).collect::<Vec<_>>().join("\n");
    re.captures(&top).map(|caps| caps[1].trim().to_string())
}

/// `Created:`/`Date:` style lines near the top; unparsable dates are dropped.
fn labeled_date_from_top(text: &str) -> Option<NaiveDate> {
    static RE: OnceLock<Regex> = OnceLock::new();
    let re = RE.get_or_init(|| {
        Regex::new(r"(?mi)^\s*(?:\*\*)?(?:created|date)(?:\*\*)?\s*:\s*(?:\*\*)?([A-Za-z0-9 ,/_-]+)")
            .unwrap()
    });

    let top: String = text.lines().take(20).collect::<Vec<_>>().join("\n");
    re.captures_iter(&top)
        .find_map(|caps| parse_flexible_date(&caps[1]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_headings_in_order() {
        let text = "# Title\n\nprose\n\n## Setup\n\n### Details\n";
        assert_eq!(extract_headings(text), vec!["Title", "Setup", "Details"]);
    }

    #[test]
    fn test_heading_requires_space() {
        assert!(extract_headings("#nospace\n").is_empty());
    }

    #[test]
    fn test_code_block_count() {
        let text = "```rust\nfn x() {}\n```\n\ntext\n\n```\nplain\n```\n";
        assert_eq!(count_code_blocks(text), 2);
    }

    #[test]
    fn test_link_split() {
        let text =
            "[guide](SETUP.md) and [site](https://example.com/docs) and [top](#anchor)";
        let (internal, external) = extract_links(text);
        assert_eq!(internal, vec!["SETUP.md"]);
        assert_eq!(external, vec!["https://example.com/docs"]);
    }

    #[test]
    fn test_topics_from_headings_and_identifiers() {
        let text = "# Payment Service Setup\n\nUses payment_service and OAuth Tokens.\n";
        let headings = extract_headings(text);
        let topics = extract_topics(text, &headings, 20);
        assert!(topics.contains(&"payment".to_string()));
        assert!(topics.contains(&"setup".to_string()));
        assert!(topics.contains(&"payment_service".to_string()));
        assert!(topics.iter().any(|t| t == "OAuth Tokens"));
    }

    #[test]
    fn test_topics_from_code_fences() {
        let text = "# Run\n\n```python\nconfigure_webhooks()\n```\n";
        let topics = extract_topics(text, &extract_headings(text), 20);
        assert!(topics.contains(&"configure_webhooks".to_string()));
    }

    #[test]
    fn test_topic_cap() {
        let mut text = String::from("# Heading\n\n");
        for i in 0..40 {
            text.push_str(&format!("token_{i} "));
        }
        let topics = extract_topics(&text, &extract_headings(&text), 20);
        assert_eq!(topics.len(), 20);
    }

    #[test]
    fn test_frontmatter_author_and_date() {
        let text = "---\nauthor: Dana\ncreated: 2024-05-02\n---\n\n# Doc\n\nbody\n";
        let meta = extract(text, 20);
        assert_eq!(meta.author.as_deref(), Some("Dana"));
        assert_eq!(
            meta.creation_date,
            NaiveDate::from_ymd_opt(2024, 5, 2)
        );
    }

    #[test]
    fn test_labeled_author_and_date() {
        let text = "# Report\n\nAuthor: Sam\nDate: 2023-11-20\n\nContent here.\n";
        let meta = extract(text, 20);
        assert_eq!(meta.author.as_deref(), Some("Sam"));
        assert_eq!(
            meta.creation_date,
            NaiveDate::from_ymd_opt(2023, 11, 20)
        );
    }

    #[test]
    fn test_unparsable_date_stays_empty() {
        let text = "# Report\n\nDate: sometime last spring\n";
        let meta = extract(text, 20);
        assert!(meta.creation_date.is_none());
    }

    #[test]
    fn test_zero_byte_file() {
        let meta = extract("", 20);
        assert_eq!(meta.word_count, 0);
        assert!(meta.headings.is_empty());
        assert!(meta.key_topics.is_empty());
    }

    #[test]
    fn test_tables_and_images() {
        let text = "| a | b |\n|---|---|\n| 1 | 2 |\n\n![diagram](arch.png)\n";
        let meta = extract(text, 20);
        assert!(meta.has_tables);
        assert!(meta.has_images);
    }
}
