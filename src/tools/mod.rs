//! MCP tool handlers, shared with the command-line interface.

pub mod category;
pub mod find_indexes;
pub(crate) mod format;
pub mod pages;
pub mod search;
pub mod set_index;

pub use category::*;
pub use find_indexes::*;
pub use pages::*;
pub use search::*;
pub use set_index::*;

use crate::cache::LoadedIndex;
use crate::state::DocState;
use std::sync::Arc;

/// The index a query runs against: the one named in the request, or the active one.
pub(crate) async fn resolve_index(
    state: &DocState,
    index: Option<&str>,
) -> Result<Arc<LoadedIndex>, String> {
    let loaded = match index {
        Some(path) => state.get(&resolve_index_path(path)).await,
        None => state.active().await,
    };
    loaded.map_err(|e| format!("{:#}", e))
}
