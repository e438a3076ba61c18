//! Page-level handlers: listing pages and inspecting one page's fragments.

use super::format::{write_record, write_remaining};
use super::resolve_index;
use crate::cache::LoadedIndex;
use crate::state::DocState;
use rmcp::schemars;
use serde::Deserialize;
use std::fmt::Write as _;

/// Suggestions below this similarity are not worth showing.
const SUGGESTION_THRESHOLD: f64 = 0.7;

#[derive(Debug, Default, Deserialize, schemars::JsonSchema)]
pub struct ListPagesRequest {
    /// Search index file to query instead of the active one
    #[serde(default)]
    pub index: Option<String>,
}

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct InspectPageRequest {
    /// Exact page name as shown by list_pages
    pub page: String,
    /// Search index file to query instead of the active one
    #[serde(default)]
    pub index: Option<String>,
}

pub async fn handle_list_pages(
    state: &DocState,
    request: ListPagesRequest,
) -> Result<String, String> {
    let index = resolve_index(state, request.index.as_deref()).await?;
    Ok(format_pages(&index))
}

pub async fn handle_inspect_page(
    state: &DocState,
    request: InspectPageRequest,
) -> Result<String, String> {
    let index = resolve_index(state, request.index.as_deref()).await?;
    Ok(format_page(&index, &request.page, usize::MAX))
}

/// Pages in document order with fragment counts, followed by category totals.
pub fn format_pages(index: &LoadedIndex) -> String {
    let pages = index.store.pages();
    if pages.is_empty() {
        return format!("{} contains no fragments.\n", index.path.display());
    }

    let mut output = format!(
        "{} pages, {} fragments in {}:\n\n",
        pages.len(),
        index.store.len(),
        index.path.display()
    );

    for page in &pages {
        let _ = writeln!(
            output,
            "• {} ({}) - {} fragments",
            page.name, page.path, page.fragments
        );
    }

    output.push_str("\nCategories: ");
    let categories: Vec<String> = index
        .store
        .categories()
        .into_iter()
        .map(|(category, count)| format!("{} {}", count, category))
        .collect();
    output.push_str(&categories.join(", "));
    output.push('\n');

    output
}

/// All fragments of one page, or fuzzy suggestions when no page has that name.
pub fn format_page(index: &LoadedIndex, page: &str, limit: usize) -> String {
    let fragments = index.store.by_page(page);
    let total = fragments.clone().count();

    if total == 0 {
        let mut output = format!("Page '{}' not found in {}.", page, index.path.display());
        let suggestions: Vec<_> = index
            .store
            .suggest_pages(page, 5)
            .into_iter()
            .filter(|s| s.score > SUGGESTION_THRESHOLD)
            .collect();

        if suggestions.is_empty() {
            output.push_str(" Use list_pages to see available pages.\n");
        } else {
            output.push_str(" Did you mean one of these?\n\n");
            for suggestion in suggestions {
                let _ = writeln!(output, "• `{}`", suggestion.page);
            }
        }
        return output;
    }

    let mut output = format!("Page '{}' ({} fragments):\n\n", page, total);
    let mut shown = 0;
    for (n, record) in fragments.take(limit).enumerate() {
        write_record(&mut output, n + 1, record);
        shown += 1;
    }
    write_remaining(&mut output, total, shown);

    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::IndexStore;
    use crate::search::TermIndex;
    use assert2::check;
    use std::path::PathBuf;

    fn loaded(source: &str) -> LoadedIndex {
        let store = IndexStore::load(source).unwrap();
        let terms = TermIndex::build(&store);
        LoadedIndex {
            path: PathBuf::from("/docs/search_index.js"),
            digest: 0,
            modified: None,
            store,
            terms,
        }
    }

    const SOURCE: &str = r#"{"docs":[
        {"location":"manual/deqs/#Standard-Models","page":"DEQ Layers","title":"Standard Models","text":"","category":"section"},
        {"location":"manual/deqs/","page":"DEQ Layers","title":"DEQ Layers","text":"DeepEquilibriumNetwork","category":"page"},
        {"location":"references/","page":"References","title":"References","text":"","category":"page"}
    ]}"#;

    #[test]
    fn test_format_pages() {
        let output = format_pages(&loaded(SOURCE));
        check!(output.starts_with("2 pages, 3 fragments"));
        check!(output.contains("• DEQ Layers (manual/deqs/) - 2 fragments"));
        check!(output.contains("• References (references/) - 1 fragments"));
        check!(output.contains("Categories: 1 section, 2 page"));
    }

    #[test]
    fn test_format_pages_empty() {
        let output = format_pages(&loaded(r#"{"docs":[]}"#));
        check!(output.contains("no fragments"));
    }

    #[test]
    fn test_format_page() {
        let output = format_page(&loaded(SOURCE), "DEQ Layers", usize::MAX);
        check!(output.starts_with("Page 'DEQ Layers' (2 fragments)"));
        let first = output.find("`Standard Models`").unwrap();
        let second = output.find("`DEQ Layers`").unwrap();
        check!(first < second);
    }

    #[test]
    fn test_format_page_suggestions() {
        let output = format_page(&loaded(SOURCE), "DEQ Layer", usize::MAX);
        check!(output.contains("Did you mean"));
        check!(output.contains("`DEQ Layers`"));

        let output = format_page(&loaded(SOURCE), "zzzz", usize::MAX);
        check!(output.contains("Use list_pages"));
    }
}
