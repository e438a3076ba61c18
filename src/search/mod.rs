//! Relevance-ranked search over a loaded search index.
//!
//! Substring queries live on [`crate::index::IndexStore`]; this module adds TF-IDF
//! ranking with stemming, so "solvers" finds "Solver" and titles outrank body text.

pub(crate) mod index;
pub(crate) mod query;
pub(crate) mod scoring;
pub(crate) mod tokenize;

pub use index::TermIndex;
pub use query::{Hit, rank};
