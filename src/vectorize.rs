//! TF-IDF vector space over the sentences of a corpus.
//!
//! Each sentence is one "document" for IDF purposes. Rows are L2-normalized,
//! so the cosine similarity of two rows is their dot product. The query is
//! projected into the vocabulary fitted on the sentences; unknown query
//! terms carry no weight.

use crate::error::SummaryError;
use crate::models::Corpus;
use crate::nlp::Nlp;
use std::collections::{BTreeMap, HashMap};
use tracing::{debug, instrument, warn};

/// Sparse vector of `(term index, weight)` pairs sorted by index.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SparseVector {
    entries: Vec<(usize, f64)>,
}

impl SparseVector {
    fn from_weights(weights: BTreeMap<usize, f64>) -> Self {
        Self {
            entries: weights.into_iter().filter(|(_, w)| *w != 0.0).collect(),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    pub fn dot(&self, other: &SparseVector) -> f64 {
        let (mut i, mut j, mut sum) = (0, 0, 0.0);
        while i < self.entries.len() && j < other.entries.len() {
            let (a, wa) = self.entries[i];
            let (b, wb) = other.entries[j];
            match a.cmp(&b) {
                std::cmp::Ordering::Less => i += 1,
                std::cmp::Ordering::Greater => j += 1,
                std::cmp::Ordering::Equal => {
                    sum += wa * wb;
                    i += 1;
                    j += 1;
                }
            }
        }
        sum
    }

    pub fn norm(&self) -> f64 {
        self.entries.iter().map(|(_, w)| w * w).sum::<f64>().sqrt()
    }

    fn normalized(mut self) -> Self {
        let norm = self.norm();
        if norm > 0.0 {
            for (_, w) in &mut self.entries {
                *w /= norm;
            }
        }
        self
    }
}

/// Cosine similarity; zero when either vector is zero.
pub fn cosine_similarity(a: &SparseVector, b: &SparseVector) -> f64 {
    let denom = a.norm() * b.norm();
    if denom == 0.0 { 0.0 } else { a.dot(b) / denom }
}

/// Vocabulary and inverse document frequencies fitted on a set of texts.
#[derive(Debug, Clone)]
pub struct TfIdf {
    vocabulary: HashMap<String, usize>,
    idf: Vec<f64>,
}

impl TfIdf {
    /// Fit on `documents`. Fails when no document contributes a term.
    pub fn fit(nlp: &Nlp, documents: &[String]) -> Result<Self, SummaryError> {
        let mut vocabulary: HashMap<String, usize> = HashMap::new();
        let mut df: Vec<usize> = Vec::new();

        for doc in documents {
            let mut seen: Vec<usize> = terms(nlp, doc)
                .map(|term| {
                    let next = vocabulary.len();
                    *vocabulary.entry(term).or_insert(next)
                })
                .collect();
            seen.sort_unstable();
            seen.dedup();
            for idx in seen {
                if idx >= df.len() {
                    df.resize(idx + 1, 0);
                }
                df[idx] += 1;
            }
        }

        if vocabulary.is_empty() {
            return Err(SummaryError::VectorizationFailure(
                "empty vocabulary; every sentence reduced to stop words".to_string(),
            ));
        }

        // Smoothed: ln((1 + n) / (1 + df)) + 1
        let n = documents.len() as f64;
        let idf = df
            .iter()
            .map(|&d| ((1.0 + n) / (1.0 + d as f64)).ln() + 1.0)
            .collect();

        Ok(Self { vocabulary, idf })
    }

    pub fn vocabulary_len(&self) -> usize {
        self.vocabulary.len()
    }

    /// L2-normalized TF-IDF vector of `text`; out-of-vocabulary terms are ignored.
    pub fn transform(&self, nlp: &Nlp, text: &str) -> SparseVector {
        let mut weights: BTreeMap<usize, f64> = BTreeMap::new();
        for term in terms(nlp, text) {
            if let Some(&idx) = self.vocabulary.get(&term) {
                *weights.entry(idx).or_insert(0.0) += 1.0;
            }
        }
        for (idx, w) in weights.iter_mut() {
            *w *= self.idf[*idx];
        }
        SparseVector::from_weights(weights).normalized()
    }
}

/// Vocabulary terms of `text`: lowercase words of two or more alphanumeric
/// characters that are not stop words.
fn terms<'a>(nlp: &'a Nlp, text: &str) -> impl Iterator<Item = String> + 'a {
    nlp.words(text).into_iter().filter(move |w| {
        w.chars().count() >= 2 && w.chars().all(char::is_alphanumeric) && !nlp.is_stopword(w)
    })
}

/// Sentences of a corpus with their vectors and the projected query.
#[derive(Debug, Clone)]
pub struct VectorSpace {
    pub sentences: Vec<String>,
    pub sentence_vectors: Vec<SparseVector>,
    pub query_vector: SparseVector,
}

/// Segment the corpus into sentences without building vectors.
///
/// Fails with [`SummaryError::NoSentences`] when segmentation finds nothing.
pub fn segment(nlp: &Nlp, corpus: &Corpus) -> Result<Vec<String>, SummaryError> {
    let sentences = nlp.sentences(&corpus.joined_text());
    if sentences.is_empty() {
        return Err(SummaryError::NoSentences);
    }
    Ok(sentences)
}

/// Build the sentence vector space for `corpus` and project `query` into it.
///
/// # Arguments
/// * `nlp` - Tokenizers and stop words
/// * `corpus` - Documents, joined with a space before segmentation
/// * `query` - Search query; terms outside the sentence vocabulary are dropped
///
/// # Returns
/// One unit-length TF-IDF vector per sentence plus the query vector, or
/// [`SummaryError::NoSentences`] / [`SummaryError::VectorizationFailure`].
#[instrument(level = "info", skip(nlp, corpus), fields(documents = corpus.len()))]
pub fn build(nlp: &Nlp, corpus: &Corpus, query: &str) -> Result<VectorSpace, SummaryError> {
    let sentences = segment(nlp, corpus)?;

    let model = TfIdf::fit(nlp, &sentences).inspect_err(|e| {
        warn!(error = %e, sentences = sentences.len(), "TF-IDF fit failed");
    })?;
    let sentence_vectors: Vec<SparseVector> =
        sentences.iter().map(|s| model.transform(nlp, s)).collect();
    let query_vector = model.transform(nlp, query);

    debug!(
        sentences = sentences.len(),
        vocabulary = model.vocabulary_len(),
        query_terms = query_vector.nnz(),
        "Built vector space"
    );
    Ok(VectorSpace {
        sentences,
        sentence_vectors,
        query_vector,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn corpus(docs: &[&str]) -> Corpus {
        Corpus {
            documents: docs.iter().map(|d| d.to_string()).collect(),
            sources: vec![],
        }
    }

    #[test]
    fn test_dot_and_cosine() {
        let a = SparseVector::from_weights(BTreeMap::from([(0, 1.0), (2, 2.0)]));
        let b = SparseVector::from_weights(BTreeMap::from([(1, 5.0), (2, 3.0)]));
        assert_eq!(a.dot(&b), 6.0);
        let expected = 6.0 / (5.0f64.sqrt() * 34.0f64.sqrt());
        assert!((cosine_similarity(&a, &b) - expected).abs() < 1e-12);
        assert_eq!(cosine_similarity(&a, &SparseVector::default()), 0.0);
    }

    #[test]
    fn test_rows_are_unit_length() {
        let nlp = Nlp::english();
        let space = build(
            &nlp,
            &corpus(&["Rain fell on the city.", "The city council met about rain."]),
            "rain",
        )
        .unwrap();
        assert_eq!(space.sentences.len(), 2);
        for v in &space.sentence_vectors {
            assert!((v.norm() - 1.0).abs() < 1e-9);
        }
        assert!((space.query_vector.norm() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_documents_joined_before_segmenting() {
        let nlp = Nlp::english();
        let space = build(&nlp, &corpus(&["First doc here.", "Second doc here."]), "doc").unwrap();
        assert_eq!(space.sentences, vec!["First doc here.", "Second doc here."]);
    }

    #[test]
    fn test_rare_terms_weigh_more() {
        let nlp = Nlp::english();
        let docs = vec![
            "market market rally".to_string(),
            "market slump".to_string(),
            "market news".to_string(),
        ];
        let model = TfIdf::fit(&nlp, &docs).unwrap();
        let v = model.transform(&nlp, "market rally");
        let market = model.vocabulary["market"];
        let rally = model.vocabulary["rally"];
        let weight = |idx| v.entries.iter().find(|(i, _)| *i == idx).unwrap().1;
        assert!(weight(rally) > weight(market));
    }

    #[test]
    fn test_out_of_vocabulary_query_is_zero() {
        let nlp = Nlp::english();
        let space = build(&nlp, &corpus(&["Bridges need repair."]), "volcano eruption").unwrap();
        assert!(space.query_vector.is_zero());
    }

    #[test]
    fn test_possessive_sentences_match_query() {
        let nlp = Nlp::english();
        let space = build(
            &nlp,
            &corpus(&["Biden's plan stalled. Biden's aides met. Congress voted."]),
            "biden",
        )
        .unwrap();
        let relevance: Vec<f64> = space
            .sentence_vectors
            .iter()
            .map(|v| cosine_similarity(v, &space.query_vector))
            .collect();
        assert_eq!(relevance.len(), 3);
        assert!(relevance[0] > 0.0);
        assert!(relevance[1] > 0.0);
        assert_eq!(relevance[2], 0.0);
    }

    #[test]
    fn test_no_sentences() {
        let nlp = Nlp::english();
        assert_eq!(build(&nlp, &corpus(&["   "]), "q").unwrap_err(), SummaryError::NoSentences);
    }

    #[test]
    fn test_stopword_only_corpus_fails_vectorization() {
        let nlp = Nlp::english();
        let err = build(&nlp, &corpus(&["It is what it is. And so on."]), "it").unwrap_err();
        assert_eq!(err.kind(), "vectorization_failure");
    }
}
