//! Weighted section similarity scoring
//!
//! Combined score = 0.4·heading + 0.4·content + 0.2·structure by default.
//! The grouping threshold adapts: strongly matching headings lower it, and
//! very short sections raise it so near-empty sections don't collapse into
//! each other on a couple of shared words.

use super::section::Section;
use crate::config::RedundancyConfig;
use crate::text;

/// Word-set Jaccard of the two headings
pub fn heading_similarity(a: &Section, b: &Section) -> f64 {
    text::jaccard_str(&a.heading, &b.heading)
}

/// Word-set Jaccard of the two bodies
pub fn content_similarity(a: &Section, b: &Section) -> f64 {
    text::jaccard(&a.words, &b.words)
}

/// Fraction of the three structural flags that agree
pub fn structural_similarity(a: &Section, b: &Section) -> f64 {
    let matches = [
        a.has_code == b.has_code,
        a.has_links == b.has_links,
        a.has_lists == b.has_lists,
    ]
    .iter()
    .filter(|&&m| m)
    .count();
    matches as f64 / 3.0
}

/// The combined weighted score
pub fn section_similarity(a: &Section, b: &Section, config: &RedundancyConfig) -> f64 {
    config.heading_weight * heading_similarity(a, b)
        + config.content_weight * content_similarity(a, b)
        + config.structure_weight * structural_similarity(a, b)
}

/// The grouping threshold for this specific pair
pub fn grouping_threshold(a: &Section, b: &Section, config: &RedundancyConfig) -> f64 {
    if heading_similarity(a, b) > config.heading_gate {
        return config.relaxed_threshold;
    }
    if a.word_count < config.short_section_words || b.word_count < config.short_section_words {
        return config.short_section_threshold;
    }
    config.group_threshold
}

/// Should these two sections be merged?
pub fn should_group(a: &Section, b: &Section, config: &RedundancyConfig) -> bool {
    section_similarity(a, b, config) >= grouping_threshold(a, b, config)
}
