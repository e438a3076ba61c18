//! Shared test fixtures and utilities for integration tests.
//!
//! # Test Isolation Strategy
//!
//! Each test gets its own temporary directory holding a copy of the fixture index
//! and an empty disk cache, plus a fresh `DocState` with an empty in-memory LRU.
//! Nothing is shared between tests, so cache hits in one test never leak into another.
//!
//! # Available Fixtures
//!
//! - `fixture_store`: the fixture index parsed into an `IndexStore`
//! - `isolated_index`: a temp directory with the fixture at `docs/build/search_index.js`,
//!   a disk cache, and a `DocState` with that index selected

use docsearch_mcp::{DocState, IndexCache, IndexStore};
use rstest::fixture;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;

/// Fragments in the fixture index.
#[allow(dead_code)]
pub const FIXTURE_FRAGMENTS: usize = 46;

/// Distinct pages in the fixture index.
#[allow(dead_code)]
pub const FIXTURE_PAGES: usize = 7;

/// Path of the search index shipped with the tests.
pub fn fixture_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/search_index.js")
}

/// A temporary directory that is removed when dropped.
#[allow(dead_code)] // Methods used across different integration test crates
pub struct TempWorkspace {
    _temp: TempDir,
    root: PathBuf,
}

#[allow(dead_code)] // Methods used across different integration test crates
impl TempWorkspace {
    pub fn new() -> Self {
        let temp = TempDir::new().expect("Failed to create temp directory");
        let root = temp.path().to_path_buf();
        Self { _temp: temp, root }
    }

    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Creates a file with the given content, creating parent directories as needed.
    ///
    /// # Panics
    /// Panics if file creation fails.
    pub fn create_file(&self, path: &str, content: &str) -> PathBuf {
        let full_path = self.root.join(path);
        if let Some(parent) = full_path.parent() {
            std::fs::create_dir_all(parent).unwrap_or_else(|e| {
                panic!("Failed to create parent directory for '{}': {}", path, e)
            });
        }
        std::fs::write(&full_path, content)
            .unwrap_or_else(|e| panic!("Failed to write file '{}': {}", path, e));
        full_path
    }

    /// Copies a file from the real filesystem into this workspace.
    ///
    /// # Panics
    /// Panics if copying fails.
    pub fn copy_file(&self, source: &Path, dest_relative: &str) -> PathBuf {
        let dest = self.root.join(dest_relative);
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent).unwrap_or_else(|e| {
                panic!(
                    "Failed to create parent directory for '{}': {}",
                    dest_relative, e
                )
            });
        }
        std::fs::copy(source, &dest).unwrap_or_else(|e| {
            panic!(
                "Failed to copy '{}' to '{}': {}",
                source.display(),
                dest_relative,
                e
            )
        });
        dest
    }
}

impl Default for TempWorkspace {
    fn default() -> Self {
        Self::new()
    }
}

/// A fixture index in its own directory, with a private disk cache.
#[allow(dead_code)] // Fields used across different integration test crates
pub struct IsolatedIndex {
    pub workspace: TempWorkspace,
    /// Absolute path of the copied index file
    pub index_path: PathBuf,
    pub cache: IndexCache,
    pub state: Arc<DocState>,
}

#[allow(dead_code)] // Methods used across different integration test crates
impl IsolatedIndex {
    /// Copies the fixture and selects it. Panics if it fails to load.
    pub async fn new() -> Self {
        let workspace = TempWorkspace::new();
        let index_path = workspace.copy_file(&fixture_path(), "docs/build/search_index.js");
        let cache = IndexCache::new(workspace.path().join("cache"));
        let state = Arc::new(DocState::new(
            NonZeroUsize::new(4).expect("non-zero"),
            Some(cache.clone()),
        ));

        state
            .select(&index_path)
            .await
            .expect("Failed to load fixture index");

        Self {
            workspace,
            index_path,
            cache,
            state,
        }
    }

    /// Index path as a tool request would pass it.
    pub fn index_arg(&self) -> String {
        self.index_path.to_string_lossy().into_owned()
    }
}

#[fixture]
pub fn fixture_store() -> IndexStore {
    IndexStore::load_file(fixture_path()).expect("Failed to load fixture index")
}

#[fixture]
pub async fn isolated_index() -> IsolatedIndex {
    docsearch_mcp::tracing::init(false);
    IsolatedIndex::new().await
}
