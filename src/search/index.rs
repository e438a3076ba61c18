//! TF-IDF inverted index over search index records.

use crate::index::IndexStore;
use ahash::AHashMap;
use rust_stemmers::{Algorithm, Stemmer};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::tokenize::{hash_term, tokenize_and_stem};

/// Term hash for fast lookup
type TermHash = u64;

/// Weight of title terms relative to body text.
const TITLE_WEIGHT: f32 = 2.0;
const TEXT_WEIGHT: f32 = 1.0;

/// A searchable term index with TF-IDF scoring.
///
/// Document ids are record positions in the [`IndexStore`] the index was built from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TermIndex {
    /// Map from term hash to (record position, tf_idf_score) pairs, sorted by score descending
    terms: HashMap<TermHash, Vec<(u32, f32)>>,
    /// Number of records indexed
    documents: usize,
}

impl TermIndex {
    /// Builds the index over every record's title and text.
    pub fn build(store: &IndexStore) -> Self {
        let mut builder = TermBuilder::new(store.len());
        for (position, record) in store.iter().enumerate() {
            builder.add_terms(&record.title, position, TITLE_WEIGHT);
            builder.add_terms(&record.text, position, TEXT_WEIGHT);
        }
        builder.finalize()
    }

    /// Scores records against the query terms.
    ///
    /// The query is tokenized and stemmed just like indexed text, so "solvers" matches
    /// "solver" and "SkipDEQ" matches both "skip" and "deq". Scores of all query terms
    /// are summed per record. Results are unordered.
    pub fn score(&self, query: &str) -> Vec<(usize, f32)> {
        let stemmer = Stemmer::create(Algorithm::English);
        let tokens = tokenize_and_stem(query, &stemmer);

        let mut combined: AHashMap<usize, f32> = AHashMap::new();
        for token in &tokens {
            if let Some(postings) = self.terms.get(&hash_term(token)) {
                for &(position, score) in postings {
                    *combined.entry(position as usize).or_insert(0.0) += score;
                }
            }
        }

        combined.into_iter().collect()
    }

    /// Get the number of unique terms in the index
    pub fn term_count(&self) -> usize {
        self.terms.len()
    }

    /// Get the number of records in the index
    pub fn document_count(&self) -> usize {
        self.documents
    }
}

/// Accumulates term frequencies before TF-IDF finalization.
struct TermBuilder {
    /// Flat map from (term_hash, position) → raw TF score
    term_docs: AHashMap<(TermHash, usize), f32>,
    /// Total term count per record, for length normalization
    doc_lengths: Vec<usize>,
    stemmer: Stemmer,
}

impl TermBuilder {
    fn new(documents: usize) -> Self {
        Self {
            term_docs: AHashMap::new(),
            doc_lengths: vec![0; documents],
            stemmer: Stemmer::create(Algorithm::English),
        }
    }

    /// TF score = term_count * weight.
    fn add_terms(&mut self, text: &str, position: usize, weight: f32) {
        let words = tokenize_and_stem(text, &self.stemmer);
        self.doc_lengths[position] += words.len();

        for word in words {
            *self
                .term_docs
                .entry((hash_term(&word), position))
                .or_insert(0.0) += weight;
        }
    }

    /// Uses TF-IDF = (1 + ln(tf_normalized)) * ln(1 + total_docs / doc_freq),
    /// where tf_normalized = tf / (doc_length / avg_doc_length).
    fn finalize(self) -> TermIndex {
        let start = std::time::Instant::now();
        let documents = self.doc_lengths.len();
        let total_docs = documents as f32;

        let non_empty = self.doc_lengths.iter().filter(|&&len| len > 0).count();
        let avg_doc_length = if non_empty > 0 {
            self.doc_lengths.iter().sum::<usize>() as f32 / non_empty as f32
        } else {
            1.0
        };

        let mut grouped: AHashMap<TermHash, Vec<(usize, f32)>> = AHashMap::new();
        let pairs = self.term_docs.len();
        for ((term_hash, position), tf) in self.term_docs {
            grouped.entry(term_hash).or_default().push((position, tf));
        }

        let mut terms: HashMap<TermHash, Vec<(u32, f32)>> = HashMap::with_capacity(grouped.len());
        for (term_hash, postings) in grouped {
            let idf = (1.0 + total_docs / postings.len() as f32).ln();

            let mut scored: Vec<(u32, f32)> = postings
                .into_iter()
                .map(|(position, tf)| {
                    let length_norm = self.doc_lengths[position] as f32 / avg_doc_length;
                    // Clamp so very short records are not over-rewarded
                    let tf_normalized = tf / length_norm.max(0.5);
                    let score = (1.0 + tf_normalized.ln()).max(0.1) * idf;
                    (position as u32, score)
                })
                .collect();

            scored.sort_by(|(a_pos, a), (b_pos, b)| b.total_cmp(a).then(a_pos.cmp(b_pos)));
            terms.insert(term_hash, scored);
        }

        let index = TermIndex { terms, documents };
        tracing::debug!(
            "Built term index: {} unique terms, {} records, {} term-record pairs in {:?}",
            index.term_count(),
            index.document_count(),
            pairs,
            start.elapsed()
        );
        index
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::IndexStore;
    use assert2::check;

    fn store() -> IndexStore {
        IndexStore::load(
            r#"{"docs":[
            {"location":"a","page":"Solvers","title":"BroydenSolver","text":"Broyden solver for discrete DEQs.","category":"type"},
            {"location":"b","page":"Solvers","title":"Solvers","text":"","category":"page"},
            {"location":"c","page":"Layers","title":"DeepEquilibriumNetwork","text":"Uses a solver to find the fixed point.","category":"type"}
        ]}"#,
        )
        .unwrap()
    }

    #[test]
    fn test_counts() {
        let index = TermIndex::build(&store());
        check!(index.document_count() == 3);
        check!(index.term_count() > 5);
    }

    #[test]
    fn test_score_matches_stemmed_terms() {
        let index = TermIndex::build(&store());
        let mut positions: Vec<usize> = index
            .score("solvers")
            .into_iter()
            .map(|(position, _)| position)
            .collect();
        positions.sort_unstable();
        check!(positions == vec![0, 1, 2]);
    }

    #[test]
    fn test_terms_resolve_to_their_records() {
        let index = TermIndex::build(&store());
        let scores: AHashMap<usize, f32> = index.score("equilibrium").into_iter().collect();
        check!(scores.len() == 1);
        check!(scores.contains_key(&2));

        let scores: AHashMap<usize, f32> = index.score("broyden").into_iter().collect();
        check!(scores.len() == 1);
        check!(scores.get(&0).copied().unwrap_or_default() > 0.0);
    }

    #[test]
    fn test_stop_word_query_scores_nothing() {
        let index = TermIndex::build(&store());
        check!(index.score("the of a").is_empty());
        check!(index.score("").is_empty());
    }

    #[test]
    fn test_empty_store() {
        let index = TermIndex::build(&IndexStore::default());
        check!(index.document_count() == 0);
        check!(index.score("anything").is_empty());
    }
}
