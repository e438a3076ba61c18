//! Load and query the search index a static documentation generator emits.
//!
//! [`IndexStore`] holds the fragments of one index and answers substring, page and
//! category queries in document order. [`TermIndex`] adds TF-IDF ranking on top.
//! The rest of the crate serves both over MCP and from the command line.

pub mod cache;
pub mod cli;
pub mod config;
pub mod error;
pub mod index;
pub mod search;
pub mod server;
pub mod state;
pub mod tools;
pub mod tracing;

pub use cache::{IndexCache, LoadedIndex};
pub use config::Config;
pub use error::{LoadError, ParseError, Result};
pub use index::{Category, IndexStore, Matches, Record};
pub use search::{Hit, TermIndex, rank};
pub use server::SearchServer;
pub use state::DocState;
