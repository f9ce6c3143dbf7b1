//! Text processing utilities shared by the heuristic extractors

use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashSet;
use std::sync::OnceLock;

/// Common English stop words to filter out during tokenization
static STOP_WORDS: OnceLock<HashSet<&'static str>> = OnceLock::new();

/// Porter stemmer for English text
static STEMMER: OnceLock<Stemmer> = OnceLock::new();

fn get_stop_words() -> &'static HashSet<&'static str> {
    STOP_WORDS.get_or_init(|| {
        [
            "a", "an", "and", "are", "as", "at", "be", "but", "by", "for", "if", "in", "into",
            "is", "it", "no", "not", "of", "on", "or", "such", "that", "the", "their", "then",
            "there", "these", "they", "this", "to", "was", "will", "with",
        ]
        .iter()
        .copied()
        .collect()
    })
}

fn get_stemmer() -> &'static Stemmer {
    STEMMER.get_or_init(|| Stemmer::create(Algorithm::English))
}

/// Simple word-based tokenizer splitting on non-alphanumeric characters
/// (underscore retained so identifier-like tokens survive) with stop word removal
pub fn tokenize(text: &str) -> Vec<String> {
    let stop_words = get_stop_words();
    text.to_lowercase()
        .split(|c: char| !c.is_alphanumeric() && c != '_')
        .filter(|s| !s.is_empty())
        .filter(|s| !stop_words.contains(s))
        .map(|s| s.to_string())
        .collect()
}

/// Tokenize text with optional Porter stemming
///
/// When `stem` is true, words like "payment" and "payments" collapse to a
/// shared stem, which tightens similarity matching on prose-heavy corpora.
pub fn tokenize_with_stemming(text: &str, stem: bool) -> Vec<String> {
    let tokens = tokenize(text);
    if !stem {
        return tokens;
    }

    let stemmer = get_stemmer();
    tokens.iter().map(|t| stemmer.stem(t).to_string()).collect()
}

/// Word set with optional Porter stemming, for similarity comparisons that
/// should treat "payment" and "payments" as the same term. The stemmed set
/// is built from the tokenizer, so it is also stop-word filtered.
pub fn word_set_stemmed(text: &str, stem: bool) -> HashSet<String> {
    if !stem {
        return word_set(text);
    }
    tokenize_with_stemming(text, true).into_iter().collect()
}

/// Lowercase word set of a text, for Jaccard-style comparisons
pub fn word_set(text: &str) -> HashSet<String> {
    text.to_lowercase()
        .split_whitespace()
        .map(|w| w.trim_matches(|c: char| !c.is_alphanumeric() && c != '_'))
        .filter(|w| !w.is_empty())
        .map(|w| w.to_string())
        .collect()
}

/// Jaccard index of two word sets: |A ∩ B| / |A ∪ B|
///
/// Two empty sets score 0.0, not 1.0: no shared evidence means no similarity.
pub fn jaccard(a: &HashSet<String>, b: &HashSet<String>) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 0.0;
    }
    let intersection = a.intersection(b).count();
    let union = a.union(b).count();
    if union == 0 {
        0.0
    } else {
        intersection as f64 / union as f64
    }
}

/// Jaccard index of the word sets of two strings
pub fn jaccard_str(a: &str, b: &str) -> f64 {
    jaccard(&word_set(a), &word_set(b))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenize_basic() {
        let text = "Hello world! This is a test.";
        let tokens = tokenize(text);
        // Should filter out "a", "is", "this"
        assert_eq!(tokens, vec!["hello", "world", "test"]);
    }

    #[test]
    fn test_tokenize_keeps_identifiers() {
        let tokens = tokenize("run payment_service now");
        assert_eq!(tokens, vec!["run", "payment_service", "now"]);
    }

    #[test]
    fn test_stemming_collapses_plurals() {
        let stemmed = tokenize_with_stemming("payments payment", true);
        assert_eq!(stemmed[0], stemmed[1]);
    }

    #[test]
    fn test_stemmed_word_sets_overlap_across_inflections() {
        let a = word_set_stemmed("process payment refund", true);
        let b = word_set_stemmed("processes payments refunds", true);
        assert_eq!(a, b);
        // Without stemming the same pair shares nothing
        assert_eq!(
            jaccard(
                &word_set_stemmed("process payment refund", false),
                &word_set_stemmed("processes payments refunds", false),
            ),
            0.0
        );
    }

    #[test]
    fn test_jaccard_identical() {
        let a = word_set("alpha beta gamma");
        assert!((jaccard(&a, &a) - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_jaccard_disjoint() {
        let a = word_set("alpha beta");
        let b = word_set("gamma delta");
        assert_eq!(jaccard(&a, &b), 0.0);
    }

    #[test]
    fn test_jaccard_partial_overlap() {
        let a = word_set("alpha beta gamma");
        let b = word_set("beta gamma delta");
        // 2 shared / 4 total
        assert!((jaccard(&a, &b) - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_jaccard_empty_sets_score_zero() {
        let empty = HashSet::new();
        assert_eq!(jaccard(&empty, &empty), 0.0);
    }

    #[test]
    fn test_word_set_strips_punctuation() {
        let set = word_set("JWT tokens, and bcrypt.");
        assert!(set.contains("jwt"));
        assert!(set.contains("tokens"));
        assert!(set.contains("bcrypt"));
    }
}
