//! Frequency-based keyword extraction.
//!
//! Used to derive the related-article search query from a seed article and
//! as the fallback vocabulary for keyword-overlap summaries.

use crate::nlp::Nlp;
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Return up to `k` of the most frequent non-stopword terms in `text`.
///
/// Terms are lowercased, purely alphabetic, and ordered by descending
/// frequency; equal counts keep the order in which the terms first appear.
#[instrument(level = "debug", skip_all, fields(k))]
pub fn extract_keywords(nlp: &Nlp, text: &str, k: usize) -> Vec<String> {
    if k == 0 {
        return Vec::new();
    }

    // term -> (count, first position)
    let mut freq: HashMap<String, (usize, usize)> = HashMap::new();
    for (pos, word) in nlp
        .words(text)
        .into_iter()
        .filter(|w| w.chars().all(char::is_alphabetic))
        .filter(|w| !nlp.is_stopword(w))
        .enumerate()
    {
        freq.entry(word).or_insert((0, pos)).0 += 1;
    }

    let mut ranked: Vec<(String, usize, usize)> = freq
        .into_iter()
        .map(|(word, (count, first))| (word, count, first))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));

    let keywords: Vec<String> = ranked.into_iter().take(k).map(|(w, _, _)| w).collect();
    debug!(?keywords, "Extracted keywords");
    keywords
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_most_frequent_first() {
        let nlp = Nlp::english();
        let text = "Flood waters rose. The flood closed roads and the flood warning stayed. \
                    Roads remain shut.";
        let keywords = extract_keywords(&nlp, text, 3);
        assert_eq!(keywords, vec!["flood", "roads", "waters"]);
    }

    #[test]
    fn test_ties_keep_first_seen_order() {
        let nlp = Nlp::english();
        let keywords = extract_keywords(&nlp, "zebra apple mango apple zebra mango", 3);
        assert_eq!(keywords, vec!["zebra", "apple", "mango"]);
    }

    #[test]
    fn test_filters_stopwords_numbers_and_case() {
        let nlp = Nlp::english();
        let keywords = extract_keywords(&nlp, "The THE the 2024 Budget budget it's", 10);
        assert_eq!(keywords, vec!["budget"]);
        for word in &keywords {
            assert_eq!(word, &word.to_lowercase());
            assert!(!nlp.is_stopword(word));
        }
    }

    #[test]
    fn test_possessives_count_toward_the_word() {
        let nlp = Nlp::english();
        let text = "Biden's plan stalled. Biden's aides met. Biden spoke. \
                    Congress voted. Congress adjourned.";
        assert_eq!(extract_keywords(&nlp, text, 2), vec!["biden", "congress"]);
    }

    #[test]
    fn test_at_most_k() {
        let nlp = Nlp::english();
        assert!(extract_keywords(&nlp, "one two three four five six", 4).len() <= 4);
        assert!(extract_keywords(&nlp, "anything here", 0).is_empty());
        assert!(extract_keywords(&nlp, "", 5).is_empty());
    }
}
