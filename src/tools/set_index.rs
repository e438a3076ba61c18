//! Selecting the search index that queries run against.

use crate::cache::LoadedIndex;
use crate::config::expand_tilde;
use crate::state::DocState;
use rmcp::schemars;
use serde::Deserialize;
use std::fmt::Write as _;
use std::path::{Path, PathBuf};

/// File name the documentation generator writes its index to.
pub const INDEX_FILE_NAME: &str = "search_index.js";

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct SetIndexRequest {
    /// Path to a search_index.js file, or to the build directory containing one
    pub path: String,
}

/// Resolve a user-supplied path to an index file.
///
/// Tildes are expanded, and a directory stands for the `search_index.js` inside it.
pub fn resolve_index_path(path: &str) -> PathBuf {
    let expanded = expand_tilde(Path::new(path)).into_owned();
    if expanded.is_dir() {
        expanded.join(INDEX_FILE_NAME)
    } else {
        expanded
    }
}

/// Load an index and make it the one queries run against.
pub async fn handle_set_index(
    state: &DocState,
    request: SetIndexRequest,
) -> Result<String, String> {
    let previous = state.active_path().await;
    let path = resolve_index_path(&request.path);

    let index = state
        .select(&path)
        .await
        .map_err(|e| format!("Failed to set index: {:#}", e))?;

    let changed = previous.as_deref() != Some(index.path.as_path());
    Ok(format_response(&index, previous.as_deref(), changed))
}

/// Summary of a freshly selected index.
pub fn format_response(index: &LoadedIndex, previous: Option<&Path>, changed: bool) -> String {
    let mut response = match (previous, changed) {
        (Some(old), true) => format!(
            "Search index changed: {} → {}\n\n",
            old.display(),
            index.path.display()
        ),
        (_, false) => format!("Search index unchanged: {}\n\n", index.path.display()),
        (None, true) => format!("Search index set: {}\n\n", index.path.display()),
    };

    let pages = index.store.pages();
    let _ = writeln!(
        response,
        "{} fragments across {} pages",
        index.store.len(),
        pages.len()
    );

    let categories: Vec<String> = index
        .store
        .categories()
        .into_iter()
        .map(|(category, count)| format!("{} {}", count, category))
        .collect();
    if !categories.is_empty() {
        let _ = writeln!(response, "Categories: {}", categories.join(", "));
    }

    response.push_str("\nUse list_pages for an overview or search to query the index.\n");
    response
}
