//! Splitting markdown into sections at heading boundaries

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::text;

/// One markdown section: a heading (possibly empty, for preamble text) and
/// everything up to the next heading, with the stats the similarity scorer
/// needs precomputed.
#[derive(Debug, Clone)]
pub struct Section {
    pub heading: String,
    /// Heading depth; 0 for preamble
    pub level: usize,
    /// Body text, heading line excluded
    pub body: String,
    pub word_count: usize,
    pub words: HashSet<String>,
    pub has_code: bool,
    pub has_links: bool,
    pub has_lists: bool,
}

impl Section {
    fn new(heading: String, level: usize, body: String) -> Self {
        let word_count = body.split_whitespace().count();
        let words = text::word_set(&body);
        let has_code = body.contains("```");
        let has_links = link_re().is_match(&body);
        let has_lists = body.lines().any(|line| {
            let trimmed = line.trim_start();
            trimmed.starts_with("- ")
                || trimmed.starts_with("* ")
                || numbered_list_re().is_match(trimmed)
        });

        Self {
            heading,
            level,
            body,
            word_count,
            words,
            has_code,
            has_links,
            has_lists,
        }
    }

    /// Reassemble the section as markdown
    pub fn render(&self) -> String {
        if self.heading.is_empty() {
            return self.body.trim_end().to_string();
        }
        format!(
            "{} {}\n\n{}",
            "#".repeat(self.level.max(1)),
            self.heading,
            self.body.trim_start_matches('\n').trim_end()
        )
    }
}

fn link_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\[[^\]]*\]\([^)]+\)").unwrap())
}

fn numbered_list_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+[.)]\s").unwrap())
}

/// Split text into sections at markdown heading boundaries. Heading lines
/// inside code fences do not start new sections. Preamble text before the
/// first heading becomes a heading-less section when non-blank.
pub fn split_sections(content: &str) -> Vec<Section> {
    static HEADING_RE: OnceLock<Regex> = OnceLock::new();
    let heading_re = HEADING_RE.get_or_init(|| Regex::new(r"^(#+)\s+(.+)$").unwrap());

    let mut sections = Vec::new();
    let mut heading = String::new();
    let mut level = 0usize;
    let mut body = String::new();
    let mut in_fence = false;

    let mut push_current =
        |heading: &mut String, level: &mut usize, body: &mut String, sections: &mut Vec<Section>| {
            if !heading.is_empty() || !body.trim().is_empty() {
                sections.push(Section::new(
                    std::mem::take(heading),
                    std::mem::replace(level, 0),
                    std::mem::take(body),
                ));
            } else {
                heading.clear();
                body.clear();
            }
        };

    for line in content.lines() {
        if line.trim_start().starts_with("```") {
            in_fence = !in_fence;
        }

        if !in_fence {
            if let Some(caps) = heading_re.captures(line) {
                push_current(&mut heading, &mut level, &mut body, &mut sections);
                heading = caps[2].trim().to_string();
                level = caps[1].len();
                continue;
            }
        }

        body.push_str(line);
        body.push('\n');
    }

    push_current(&mut heading, &mut level, &mut body, &mut sections);
    sections
}
