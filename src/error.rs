//! Error handling types and utilities.

use std::path::{Path, PathBuf};

/// A specialized Result type for docsearch-mcp plumbing.
///
/// This is an alias for `anyhow::Result` with context added via `.context()` and
/// `.with_context()` methods throughout the codebase.
pub type Result<T> = anyhow::Result<T>;

/// Error returned when search index source text cannot be decoded into records.
///
/// A failed parse never produces a partially populated store.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The payload is not syntactically valid JSON.
    #[error("invalid JSON: {0}")]
    Json(#[source] serde_json::Error),
    /// The top level is not an object holding a `docs` array.
    #[error("expected an object with a \"docs\" array, found {found}")]
    Shape { found: &'static str },
    /// A single record is missing a required field or has a mistyped one.
    #[error("record {index}: {source}")]
    Record {
        index: usize,
        #[source]
        source: serde_json::Error,
    },
    /// The input is neither JSON nor a recognizable script assignment.
    #[error("unrecognized search index script: {0}")]
    Script(String),
}

/// Error returned when loading a search index file fails.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("failed to read search index at {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The file was read but its contents did not parse.
    #[error("failed to parse search index at {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: ParseError,
    },
}

impl LoadError {
    /// The path of the index file that failed to load.
    pub fn path(&self) -> &Path {
        match self {
            Self::Io { path, .. } | Self::Parse { path, .. } => path,
        }
    }
}
