//! Category handler: fragments of one category in document order.

use super::format::{write_record, write_remaining};
use super::resolve_index;
use crate::cache::LoadedIndex;
use crate::state::DocState;
use rmcp::schemars;
use serde::Deserialize;
use std::fmt::Write as _;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct FilterCategoryRequest {
    /// Category to list, matched exactly: "page", "section", "type", or any other tag the index uses
    pub category: String,
    /// Maximum number of results to return
    #[serde(default)]
    pub limit: Option<usize>,
    /// Search index file to query instead of the active one
    #[serde(default)]
    pub index: Option<String>,
}

pub async fn handle_filter_category(
    state: &DocState,
    request: FilterCategoryRequest,
) -> Result<String, String> {
    let index = resolve_index(state, request.index.as_deref()).await?;
    let limit = request.limit.unwrap_or_else(|| state.default_limit());
    Ok(format_category(&index, &request.category, limit))
}

pub fn format_category(index: &LoadedIndex, category: &str, limit: usize) -> String {
    let matches = index.store.by_category(category);
    let total = matches.clone().count();

    if total == 0 {
        let mut output = format!("No fragments with category '{}'.", category);
        let known: Vec<String> = index
            .store
            .categories()
            .into_iter()
            .map(|(category, count)| format!("{} ({})", category, count))
            .collect();
        if !known.is_empty() {
            let _ = write!(output, " Categories in this index: {}", known.join(", "));
        }
        output.push('\n');
        return output;
    }

    let mut output = format!("{} fragments with category '{}':\n\n", total, category);
    let mut shown = 0;
    for (n, record) in matches.take(limit).enumerate() {
        write_record(&mut output, n + 1, record);
        shown += 1;
    }
    write_remaining(&mut output, total, shown);

    output
}
