//! Title relevance boosts applied on top of TF-IDF scores.

/// Calculate simple text relevance score.
///
/// Returns a score based on how well the query matches the text:
/// - 100: Exact match
/// - 50: Text starts with query
/// - 10: Text contains query
/// - None: No match
pub(crate) fn calculate_relevance(text: &str, query: &str) -> Option<u32> {
    if text == query {
        Some(100)
    } else if text.starts_with(query) {
        Some(50)
    } else if text.contains(query) {
        Some(10)
    } else {
        None
    }
}

/// Relevance of a record title for a query, both compared case-insensitively.
///
/// Qualified symbol titles like `DeepEquilibriumNetworks.BroydenSolver` are also
/// matched by their final segment, so `BroydenSolver` counts as an exact hit.
pub(crate) fn title_relevance(title: &str, query: &str) -> Option<u32> {
    let query = query.trim().to_lowercase();
    if query.is_empty() {
        return None;
    }

    let title = title.to_lowercase();
    let short_name = title.rsplit('.').next().unwrap_or(&title);

    [
        calculate_relevance(&title, &query),
        calculate_relevance(short_name, &query),
    ]
    .into_iter()
    .flatten()
    .max()
}

/// Multiplier applied to a TF-IDF score for a given title relevance.
pub(crate) fn boost(relevance: Option<u32>) -> f32 {
    1.0 + relevance.unwrap_or(0) as f32 / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::check;
    use rstest::rstest;

    #[rstest]
    #[case("broydensolver", "broydensolver", Some(100))]
    #[case("broydensolver", "broyden", Some(50))]
    #[case("limitedmemorybroydensolver", "broyden", Some(10))]
    #[case("broydensolver", "newton", None)]
    fn test_calculate_relevance(
        #[case] text: &str,
        #[case] query: &str,
        #[case] expected: Option<u32>,
    ) {
        check!(calculate_relevance(text, query) == expected);
    }

    #[rstest]
    #[case("DeepEquilibriumNetworks.BroydenSolver", "BroydenSolver", Some(100))]
    #[case("DeepEquilibriumNetworks.BroydenSolver", "broyden", Some(50))]
    #[case("DeepEquilibriumNetworks.BroydenSolver", "deepequilibrium", Some(50))]
    #[case("Standard Models", "models", Some(10))]
    #[case("Standard Models", "  ", None)]
    #[case("Standard Models", "solver", None)]
    fn test_title_relevance(
        #[case] title: &str,
        #[case] query: &str,
        #[case] expected: Option<u32>,
    ) {
        check!(title_relevance(title, query) == expected);
    }

    #[test]
    fn test_boost() {
        check!(boost(None) == 1.0);
        check!(boost(Some(100)) == 2.0);
        check!(boost(Some(10)) > boost(None));
    }
}
