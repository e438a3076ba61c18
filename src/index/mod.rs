//! Search index records and the in-memory store that answers queries over them.

mod record;
mod source;
mod store;

pub use record::{Category, Record};
pub use source::SourceFormat;
pub use store::{IndexStore, Matches, PageSuggestion, PageSummary};
