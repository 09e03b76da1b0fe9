//! Shared language resources: the English stop-word set and tokenizers.
//!
//! The resources are built once per process by [`Nlp::init`] (normally from
//! `main` before the first request) and handed out by reference afterwards.
//! Calling [`Nlp::init`] again returns the same instance.

use once_cell::sync::OnceCell;
use std::collections::HashSet;
use tracing::{debug, info};
use unicode_segmentation::UnicodeSegmentation;

static SHARED: OnceCell<Nlp> = OnceCell::new();

const ENGLISH_STOPWORDS: &[&str] = &[
    "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "you're", "you've",
    "you'll", "you'd", "your", "yours", "yourself", "yourselves", "he", "him", "his", "himself",
    "she", "she's", "her", "hers", "herself", "it", "it's", "its", "itself", "they", "them",
    "their", "theirs", "themselves", "what", "which", "who", "whom", "this", "that", "that'll",
    "these", "those", "am", "is", "are", "was", "were", "be", "been", "being", "have", "has",
    "had", "having", "do", "does", "did", "doing", "a", "an", "the", "and", "but", "if", "or",
    "because", "as", "until", "while", "of", "at", "by", "for", "with", "about", "against",
    "between", "into", "through", "during", "before", "after", "above", "below", "to", "from",
    "up", "down", "in", "out", "on", "off", "over", "under", "again", "further", "then", "once",
    "here", "there", "when", "where", "why", "how", "all", "any", "both", "each", "few", "more",
    "most", "other", "some", "such", "no", "nor", "not", "only", "own", "same", "so", "than",
    "too", "very", "s", "t", "can", "will", "just", "don", "don't", "should", "should've", "now",
    "d", "ll", "m", "o", "re", "ve", "y", "ain", "aren", "aren't", "couldn", "couldn't", "didn",
    "didn't", "doesn", "doesn't", "hadn", "hadn't", "hasn", "hasn't", "haven", "haven't", "isn",
    "isn't", "ma", "mightn", "mightn't", "mustn", "mustn't", "needn", "needn't", "shan",
    "shan't", "shouldn", "shouldn't", "wasn", "wasn't", "weren", "weren't", "won", "won't",
    "wouldn", "wouldn't",
];

/// Abbreviations that end in a period without ending a sentence.
const ABBREVIATIONS: &[&str] = &[
    "mr", "mrs", "ms", "dr", "prof", "sr", "jr", "st", "sen", "rep", "gov", "gen", "lt", "col",
    "capt", "cmdr", "sgt", "maj", "adm", "pres", "supt", "rev", "hon", "vs", "inc", "corp", "ltd",
    "jan", "feb", "mar", "apr", "jun", "jul", "aug", "sep", "sept", "oct", "nov", "dec", "tues",
    "thurs", "ave", "blvd", "mt", "ft", "approx", "dept", "etc", "e.g", "i.e",
];

/// Language resources used by keyword extraction and vectorization.
#[derive(Debug)]
pub struct Nlp {
    stopwords: HashSet<&'static str>,
    abbreviations: HashSet<&'static str>,
}

impl Nlp {
    /// Build the resources on first call; later calls return the same instance.
    pub fn init() -> &'static Nlp {
        SHARED.get_or_init(|| {
            let nlp = Nlp::english();
            info!(stopwords = nlp.stopwords.len(), "Initialized NLP resources");
            nlp
        })
    }

    /// A fresh, unshared instance with the English stop-word list.
    pub fn english() -> Self {
        Self {
            stopwords: ENGLISH_STOPWORDS.iter().copied().collect(),
            abbreviations: ABBREVIATIONS.iter().copied().collect(),
        }
    }

    pub fn is_stopword(&self, word: &str) -> bool {
        self.stopwords.contains(word)
    }

    /// Lowercased word tokens in reading order (Unicode word boundaries).
    ///
    /// Contractions and possessives are split at the apostrophe, so
    /// `"Biden's"` yields `"biden"` and `"s"`.
    pub fn words(&self, text: &str) -> Vec<String> {
        text.unicode_words()
            .flat_map(|word| word.split(['\'', '\u{2019}']))
            .filter(|part| !part.is_empty())
            .map(str::to_lowercase)
            .collect()
    }

    /// Sentences in reading order, trimmed, with blank segments dropped.
    ///
    /// A segment that ends in a known abbreviation ("Sen.", "Jan.") or a
    /// single-letter initial is joined with the segment after it.
    pub fn sentences(&self, text: &str) -> Vec<String> {
        let mut sentences: Vec<String> = Vec::new();
        let mut pending: Option<String> = None;
        for segment in text.unicode_sentences().map(str::trim).filter(|s| !s.is_empty()) {
            let current = match pending.take() {
                Some(head) => format!("{head} {segment}"),
                None => segment.to_string(),
            };
            if self.ends_with_abbreviation(&current) {
                pending = Some(current);
            } else {
                sentences.push(current);
            }
        }
        sentences.extend(pending);
        debug!(count = sentences.len(), "Segmented sentences");
        sentences
    }

    fn ends_with_abbreviation(&self, segment: &str) -> bool {
        let Some(last) = segment.split_whitespace().next_back() else {
            return false;
        };
        let Some(stem) = last.strip_suffix('.') else {
            return false;
        };
        let stem = stem.trim_start_matches(|c: char| !c.is_alphanumeric());
        let mut chars = stem.chars();
        let is_initial = matches!((chars.next(), chars.next()), (Some(c), None) if c.is_uppercase());
        is_initial || self.abbreviations.contains(stem.to_lowercase().as_str())
    }
}
