//! Search handler: substring matching in document order, or TF-IDF ranking.

use super::format::{truncate, write_record, write_remaining};
use super::resolve_index;
use crate::cache::LoadedIndex;
use crate::search::rank;
use crate::state::DocState;
use rmcp::schemars;
use serde::Deserialize;
use std::fmt::Write as _;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SearchRequest {
    /// Text to look for in fragment titles and bodies (case-insensitive). Empty matches everything.
    pub query: String,
    /// Maximum number of results to return
    #[serde(default)]
    pub limit: Option<usize>,
    /// Rank by relevance (TF-IDF with stemming) instead of listing substring matches in page order
    #[serde(default)]
    pub ranked: Option<bool>,
    /// Search index file to query instead of the active one
    #[serde(default)]
    pub index: Option<String>,
}

/// Execute a search against the requested or active index.
pub async fn handle_search(state: &DocState, request: SearchRequest) -> Result<String, String> {
    let index = resolve_index(state, request.index.as_deref()).await?;
    let limit = request.limit.unwrap_or_else(|| state.default_limit());

    if request.ranked.unwrap_or(false) {
        Ok(format_ranked(&index, &request.query, limit))
    } else {
        Ok(format_matches(&index, &request.query, limit))
    }
}

/// Substring matches in document order.
pub fn format_matches(index: &LoadedIndex, query: &str, limit: usize) -> String {
    let matches = index.store.search(query);
    let total = matches.clone().count();

    if total == 0 {
        return no_results(query, index);
    }

    let mut output = if query.is_empty() {
        format!(
            "All {} fragments in {}:\n\n",
            total,
            index.path.display()
        )
    } else {
        format!(
            "Found {} fragments containing '{}' in {}:\n\n",
            total,
            query,
            index.path.display()
        )
    };

    let mut shown = 0;
    for (n, record) in matches.take(limit).enumerate() {
        write_record(&mut output, n + 1, record);
        shown += 1;
    }
    write_remaining(&mut output, total, shown);

    output
}

/// Relevance-ranked results.
pub fn format_ranked(index: &LoadedIndex, query: &str, limit: usize) -> String {
    let hits = rank(&index.store, &index.terms, query, limit);
    if hits.is_empty() {
        return no_results(query, index);
    }

    let mut output = format!(
        "Ranked results for '{}' in {}:\n\n",
        query,
        index.path.display()
    );

    let best = hits.first().map_or(1.0, |hit| hit.score);
    for (n, hit) in hits.iter().enumerate() {
        let record = hit.record;
        let _ = writeln!(
            output,
            "{}. `{}` ({}) - relevance: {}%",
            n + 1,
            record.title,
            record.category,
            hit.relevance(best)
        );
        let _ = writeln!(output, "   {} › {}", record.page, record.location);
        if let Some(summary) = record.summary() {
            let _ = writeln!(output, "   {}", truncate(summary, 160));
        }
    }

    output
}

fn no_results(query: &str, index: &LoadedIndex) -> String {
    let mut msg = format!(
        "No results found for '{}' in {}.\n\n",
        query,
        index.path.display()
    );

    msg.push_str("Search tips:\n");
    msg.push_str("• Try a shorter or more general term\n");
    msg.push_str("• Use ranked search to match word stems: 'solvers' finds 'Solver'\n");
    msg.push_str("• Use list_pages to see what the documentation covers\n");
    msg
}
