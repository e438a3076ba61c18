//! Relevance-ranked queries combining TF-IDF scores with title boosts.

use super::index::TermIndex;
use super::scoring::{boost, title_relevance};
use crate::index::{IndexStore, Record};

/// A ranked search hit.
#[derive(Debug, Clone, PartialEq)]
pub struct Hit<'a> {
    /// Position of the record in its store
    pub position: usize,
    pub record: &'a Record,
    pub score: f32,
}

impl Hit<'_> {
    /// Score as a whole percentage of `best`.
    pub fn relevance(&self, best: f32) -> u8 {
        if best <= 0.0 {
            return 0;
        }
        ((self.score / best) * 100.0).round().clamp(0.0, 100.0) as u8
    }
}

/// Ranks records of `store` for `query`, best first, at most `limit` hits.
///
/// `terms` must have been built from `store`. Equal scores keep document order.
pub fn rank<'a>(
    store: &'a IndexStore,
    terms: &TermIndex,
    query: &str,
    limit: usize,
) -> Vec<Hit<'a>> {
    let mut hits: Vec<Hit<'a>> = terms
        .score(query)
        .into_iter()
        .filter_map(|(position, score)| {
            let record = store.get(position)?;
            Some(Hit {
                position,
                record,
                score: score * boost(title_relevance(&record.title, query)),
            })
        })
        .collect();

    hits.sort_by(|a, b| {
        b.score
            .total_cmp(&a.score)
            .then(a.position.cmp(&b.position))
    });
    hits.truncate(limit);

    tracing::trace!("Ranked {} hits for '{}'", hits.len(), query);
    hits
}
