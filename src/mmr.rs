//! Maximal Marginal Relevance sentence selection.
//!
//! Greedy: the most query-relevant sentence first, then repeatedly the
//! sentence maximizing
//!
//! ```text
//! lambda * relevance(s) - (1 - lambda) * max(similarity(s, t) for t in selected)
//! ```
//!
//! Ties go to the lowest sentence index. The result is returned in reading
//! order.

use crate::vectorize::{SparseVector, cosine_similarity};
use tracing::{debug, instrument};

/// Indices of the selected sentences, ascending.
///
/// # Arguments
/// * `sentence_vectors` - One vector per candidate sentence
/// * `query_vector` - Relevance target
/// * `target_count` - Number of sentences wanted
/// * `lambda` - Relevance weight in `[0, 1]`; `1.0` ignores redundancy
///
/// # Returns
/// At most `min(target_count, sentence_vectors.len())` distinct indices.
#[instrument(level = "debug", skip(sentence_vectors, query_vector))]
pub fn select(
    sentence_vectors: &[SparseVector],
    query_vector: &SparseVector,
    target_count: usize,
    lambda: f64,
) -> Vec<usize> {
    let n = sentence_vectors.len();
    let target = target_count.min(n);
    if target == 0 {
        return Vec::new();
    }

    let relevance: Vec<f64> = sentence_vectors
        .iter()
        .map(|v| cosine_similarity(v, query_vector))
        .collect();

    // Highest similarity of each sentence to anything selected so far.
    let mut redundancy = vec![0.0f64; n];
    let mut remaining: Vec<usize> = (0..n).collect();
    let mut selected: Vec<usize> = Vec::with_capacity(target);

    while selected.len() < target {
        let score = |i: usize| {
            if selected.is_empty() {
                relevance[i]
            } else {
                lambda * relevance[i] - (1.0 - lambda) * redundancy[i]
            }
        };

        // `remaining` is ascending, so a strict `>` keeps the lowest index on ties.
        let mut best_pos = 0;
        let mut best_score = score(remaining[0]);
        for (pos, &i) in remaining.iter().enumerate().skip(1) {
            let s = score(i);
            if s > best_score {
                best_pos = pos;
                best_score = s;
            }
        }

        let pick = remaining.remove(best_pos);
        debug!(pick, score = best_score, "Selected sentence");
        for &i in &remaining {
            let sim = cosine_similarity(&sentence_vectors[i], &sentence_vectors[pick]);
            if sim > redundancy[i] {
                redundancy[i] = sim;
            }
        }
        selected.push(pick);
    }

    selected.sort_unstable();
    selected
}

/// Join the chosen sentences with single spaces.
pub fn join_selected(sentences: &[String], indices: &[usize]) -> String {
    indices
        .iter()
        .map(|&i| sentences[i].as_str())
        .collect::<Vec<_>>()
        .join(" ")
}
