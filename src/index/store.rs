//! The immutable, ordered record collection and its query operations.

use super::record::{Category, Record};
use super::source::json_payload;
use crate::error::{LoadError, ParseError};
use ahash::AHashMap;
use rapidfuzz::distance::jaro_winkler;
use serde_json::Value;
use std::iter::FusedIterator;
use std::path::Path;

/// Lowercased copies of the searchable fields, aligned with `records`.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Folded {
    title: String,
    text: String,
}

impl Folded {
    fn of(record: &Record) -> Self {
        Self {
            title: record.title.to_lowercase(),
            text: record.text.to_lowercase(),
        }
    }
}

/// Holds a search index's records in document order.
///
/// The store is built once by [`IndexStore::load`] and never mutated afterwards, so it
/// can be shared across threads behind an `Arc` and queried without coordination.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IndexStore {
    records: Vec<Record>,
    folded: Vec<Folded>,
}

/// A page of the documentation site and how many fragments it contributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageSummary<'a> {
    pub name: &'a str,
    /// Document path of the page (location without anchor)
    pub path: &'a str,
    pub fragments: usize,
}

/// A fuzzy page-name suggestion with similarity score (0.0 to 1.0, higher is better).
#[derive(Debug, Clone, PartialEq)]
pub struct PageSuggestion<'a> {
    pub page: &'a str,
    pub score: f64,
}

impl IndexStore {
    /// Parses search index source text: the generator's script form or plain JSON.
    pub fn load(source: &str) -> Result<Self, ParseError> {
        let (payload, format) = json_payload(source)?;
        let value: Value = serde_json::from_str(payload).map_err(ParseError::Json)?;
        let store = Self::from_value(value)?;
        tracing::debug!(
            "Parsed {} search index records from {:?} source",
            store.len(),
            format
        );
        Ok(store)
    }

    /// Reads and parses a search index file.
    pub fn load_file<P: AsRef<Path>>(path: P) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path).map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::load(&source).map_err(|source| LoadError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Decodes the structural form `{ "docs": [Record, ...] }`.
    ///
    /// Records are decoded one by one so errors can name the offending position.
    pub fn from_value(value: Value) -> Result<Self, ParseError> {
        let mut object = match value {
            Value::Object(object) => object,
            other => {
                return Err(ParseError::Shape {
                    found: describe(&other),
                });
            }
        };

        let docs = match object.remove("docs") {
            Some(Value::Array(docs)) => docs,
            Some(other) => {
                return Err(ParseError::Shape {
                    found: describe(&other),
                });
            }
            None => {
                return Err(ParseError::Shape {
                    found: "an object without \"docs\"",
                });
            }
        };

        let records = docs
            .into_iter()
            .enumerate()
            .map(|(index, doc)| {
                serde_json::from_value(doc).map_err(|source| ParseError::Record { index, source })
            })
            .collect::<Result<Vec<Record>, _>>()?;

        Ok(Self::from_records(records))
    }

    /// Builds a store from already decoded records, keeping their order.
    pub fn from_records(records: Vec<Record>) -> Self {
        let folded = records.iter().map(Folded::of).collect();
        Self { records, folded }
    }

    /// Serializes back to the structural form.
    pub fn to_value(&self) -> Value {
        serde_json::json!({ "docs": self.records })
    }

    /// Serializes to compact JSON in the structural form.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.to_value())
    }

    /// Serializes to the generator's script form.
    pub fn to_script(&self) -> serde_json::Result<String> {
        let docs = serde_json::to_string(&self.records)?;
        Ok(format!("var documenterSearchIndex = {{\"docs\":\n{}\n}}\n", docs))
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn get(&self, position: usize) -> Option<&Record> {
        self.records.get(position)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records whose title or text contains `query`, ignoring case, in document order.
    ///
    /// An empty query matches every record.
    pub fn search(&self, query: &str) -> Matches<'_> {
        let filter = if query.is_empty() {
            Filter::All
        } else {
            Filter::Text(query.to_lowercase())
        };
        Matches::new(self, filter)
    }

    /// Records with exactly this category, in document order.
    pub fn by_category(&self, category: &str) -> Matches<'_> {
        Matches::new(self, Filter::Category(category.to_string()))
    }

    /// Records belonging to exactly this page, in document order.
    pub fn by_page(&self, page: &str) -> Matches<'_> {
        Matches::new(self, Filter::Page(page.to_string()))
    }

    /// Distinct pages in order of first appearance.
    ///
    /// The page path comes from its `page` marker record when there is one, since
    /// section records may precede it with anchored locations.
    pub fn pages(&self) -> Vec<PageSummary<'_>> {
        let mut pages: Vec<PageSummary<'_>> = Vec::new();
        let mut positions: AHashMap<&str, usize> = AHashMap::new();

        for record in &self.records {
            let slot = *positions.entry(record.page.as_str()).or_insert_with(|| {
                pages.push(PageSummary {
                    name: &record.page,
                    path: record.path(),
                    fragments: 0,
                });
                pages.len() - 1
            });

            let summary = &mut pages[slot];
            summary.fragments += 1;
            if record.category == Category::Page {
                summary.path = record.path();
            }
        }

        pages
    }

    /// Distinct categories with their record counts, in order of first appearance.
    pub fn categories(&self) -> Vec<(&Category, usize)> {
        let mut counts: Vec<(&Category, usize)> = Vec::new();
        for record in &self.records {
            match counts.iter_mut().find(|(category, _)| **category == record.category) {
                Some((_, count)) => *count += 1,
                None => counts.push((&record.category, 1)),
            }
        }
        counts
    }

    /// Suggests page names similar to `name`, best first.
    pub fn suggest_pages(&self, name: &str, limit: usize) -> Vec<PageSuggestion<'_>> {
        let wanted = name.to_lowercase();
        let mut suggestions: Vec<PageSuggestion<'_>> = self
            .pages()
            .into_iter()
            .map(|page| PageSuggestion {
                page: page.name,
                score: jaro_winkler::similarity(
                    wanted.chars(),
                    page.name.to_lowercase().chars(),
                ),
            })
            .collect();

        suggestions.sort_by(|a, b| b.score.total_cmp(&a.score));
        suggestions.truncate(limit);
        suggestions
    }
}

impl<'a> IntoIterator for &'a IndexStore {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[derive(Debug, Clone)]
enum Filter {
    All,
    /// Lowercased needle
    Text(String),
    Category(String),
    Page(String),
}

/// Lazy scan over an [`IndexStore`] yielding matching records in document order.
///
/// The scan is finite and restartable: clone it before consuming to replay it, or
/// call [`Matches::restart`].
#[derive(Debug, Clone)]
pub struct Matches<'a> {
    store: &'a IndexStore,
    filter: Filter,
    position: usize,
}

impl<'a> Matches<'a> {
    fn new(store: &'a IndexStore, filter: Filter) -> Self {
        Self {
            store,
            filter,
            position: 0,
        }
    }

    /// A fresh scan with the same filter from the first record.
    pub fn restart(&self) -> Self {
        Self::new(self.store, self.filter.clone())
    }

    fn accepts(&self, position: usize) -> bool {
        let record = &self.store.records[position];
        match &self.filter {
            Filter::All => true,
            Filter::Text(needle) => {
                let folded = &self.store.folded[position];
                folded.title.contains(needle.as_str()) || folded.text.contains(needle.as_str())
            }
            Filter::Category(category) => record.category.as_str() == category,
            Filter::Page(page) => record.page == *page,
        }
    }

    /// Pairs each remaining match with its position in the store.
    pub fn with_positions(self) -> impl Iterator<Item = (usize, &'a Record)> {
        let store = self.store;
        let start = self.position;
        (start..store.len()).filter_map(move |position| {
            self.accepts(position)
                .then(|| (position, &store.records[position]))
        })
    }
}

impl<'a> Iterator for Matches<'a> {
    type Item = &'a Record;

    fn next(&mut self) -> Option<Self::Item> {
        while self.position < self.store.records.len() {
            let position = self.position;
            self.position += 1;
            if self.accepts(position) {
                return Some(&self.store.records[position]);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.store.records.len() - self.position;
        match self.filter {
            Filter::All => (remaining, Some(remaining)),
            _ => (0, Some(remaining)),
        }
    }
}

impl FusedIterator for Matches<'_> {}
