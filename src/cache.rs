//! Loading search index files, with an on-disk cache of parsed indexes.
//!
//! Cache entries are keyed by an xxh3 digest of the source bytes, so a rebuilt
//! documentation site produces a new entry and stale entries are simply never hit.

use crate::error::{LoadError, Result};
use crate::index::{IndexStore, Record};
use crate::search::TermIndex;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use xxhash_rust::xxh3::xxh3_64;

/// Bumped whenever the layout of [`CachedIndex`] or [`TermIndex`] changes.
const CACHE_FORMAT_VERSION: u32 = 1;

/// A parsed search index together with its ranked-search terms.
#[derive(Debug)]
pub struct LoadedIndex {
    pub path: PathBuf,
    /// xxh3 digest of the source file contents
    pub digest: u64,
    /// Modification time of the source file when it was read
    pub modified: Option<SystemTime>,
    pub store: IndexStore,
    pub terms: TermIndex,
}

impl LoadedIndex {
    /// Reads and parses a search index file without touching any cache.
    pub async fn load(path: &Path) -> Result<Self> {
        let (bytes, modified) = read_source(path).await?;
        parse(path.to_path_buf(), bytes, modified).await
    }
}

#[derive(Serialize)]
struct CachedIndexRef<'a> {
    version: u32,
    records: &'a [Record],
    terms: &'a TermIndex,
}

#[derive(Deserialize)]
struct CachedIndex {
    version: u32,
    records: Vec<Record>,
    terms: TermIndex,
}

/// On-disk cache of parsed search indexes.
#[derive(Debug, Clone)]
pub struct IndexCache {
    dir: PathBuf,
}

impl IndexCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the cache entry for a given source digest.
    pub fn entry_path(&self, digest: u64) -> PathBuf {
        self.dir.join(format!("{:016x}.index", digest))
    }

    /// Loads a search index file, serving the parsed form from cache when the
    /// source bytes are unchanged.
    ///
    /// Cache failures are logged and never surface; only reading or parsing the
    /// source itself can fail.
    pub async fn load_or_parse(&self, path: &Path) -> Result<LoadedIndex> {
        let (bytes, modified) = read_source(path).await?;
        let digest = xxh3_64(&bytes);
        let entry = self.entry_path(digest);

        if let Some(cached) = read_entry(&entry).await {
            tracing::debug!(
                "Loaded cached search index for {} ({} records, {} terms)",
                path.display(),
                cached.records.len(),
                cached.terms.term_count()
            );
            return Ok(LoadedIndex {
                path: path.to_path_buf(),
                digest,
                modified,
                store: IndexStore::from_records(cached.records),
                terms: cached.terms,
            });
        }

        let loaded = parse(path.to_path_buf(), bytes, modified).await?;
        self.store(&loaded).await;
        Ok(loaded)
    }

    /// Writes a cache entry. Writes go through a temp file so readers never see a
    /// partial entry.
    async fn store(&self, loaded: &LoadedIndex) {
        let entry = self.entry_path(loaded.digest);
        let cached = CachedIndexRef {
            version: CACHE_FORMAT_VERSION,
            records: loaded.store.records(),
            terms: &loaded.terms,
        };

        let bytes = match postcard::to_stdvec(&cached) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!("Failed to serialize search index cache: {}", e);
                return;
            }
        };

        if let Err(e) = tokio::fs::create_dir_all(&self.dir).await {
            tracing::warn!(
                "Failed to create cache directory {}: {}",
                self.dir.display(),
                e
            );
            return;
        }

        let temp = entry.with_extension(format!("tmp{}", std::process::id()));
        let result = match tokio::fs::write(&temp, &bytes).await {
            Ok(()) => tokio::fs::rename(&temp, &entry).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(()) => tracing::debug!("Cached search index to {}", entry.display()),
            Err(e) => {
                tracing::warn!("Failed to write cache entry {}: {}", entry.display(), e);
                let _ = tokio::fs::remove_file(&temp).await;
            }
        }
    }
}

async fn read_source(path: &Path) -> Result<(Vec<u8>, Option<SystemTime>)> {
    let bytes = tokio::fs::read(path)
        .await
        .map_err(|source| LoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
    let modified = tokio::fs::metadata(path)
        .await
        .ok()
        .and_then(|m| m.modified().ok());
    Ok((bytes, modified))
}

/// Parses source bytes and builds the term index off the async runtime.
async fn parse(
    path: PathBuf,
    bytes: Vec<u8>,
    modified: Option<SystemTime>,
) -> Result<LoadedIndex> {
    let digest = xxh3_64(&bytes);
    let display = path.display().to_string();

    tokio::task::spawn_blocking(move || -> Result<LoadedIndex> {
        let start = std::time::Instant::now();
        let source = String::from_utf8(bytes).map_err(|e| LoadError::Io {
            path: path.clone(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
        })?;

        let store = IndexStore::load(&source).map_err(|source| LoadError::Parse {
            path: path.clone(),
            source,
        })?;
        let terms = TermIndex::build(&store);

        tracing::info!(
            "Loaded search index {} ({} records, {} terms) in {:?}",
            path.display(),
            store.len(),
            terms.term_count(),
            start.elapsed()
        );

        Ok(LoadedIndex {
            path,
            digest,
            modified,
            store,
            terms,
        })
    })
    .await
    .with_context(|| format!("Search index parsing task for {} panicked", display))?
}

/// Reads a cache entry; corrupt or outdated entries are deleted.
async fn read_entry(entry: &Path) -> Option<CachedIndex> {
    let bytes = tokio::fs::read(entry).await.ok()?;
    let entry = entry.to_path_buf();

    // Deserialize in spawn_blocking since it's CPU intensive
    tokio::task::spawn_blocking(move || {
        match postcard::from_bytes::<CachedIndex>(&bytes) {
            Ok(cached) if cached.version == CACHE_FORMAT_VERSION => Some(cached),
            Ok(cached) => {
                tracing::info!(
                    "Discarding cache entry {} with format version {}",
                    entry.display(),
                    cached.version
                );
                let _ = std::fs::remove_file(&entry);
                None
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to deserialize cache entry {}: {}",
                    entry.display(),
                    e
                );
                let _ = std::fs::remove_file(&entry);
                None
            }
        }
    })
    .await
    .ok()?
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{check, let_assert};
    use tempfile::TempDir;

    const SOURCE: &str = r#"var documenterSearchIndex = {"docs":
[{"location":"manual/deqs/","page":"DEQ Layers","title":"DEQ Layers","text":"DeepEquilibriumNetwork","category":"page"},
{"location":"manual/solvers/#DeepEquilibriumNetworks.BroydenSolver","page":"Non Linear Solvers","title":"DeepEquilibriumNetworks.BroydenSolver","text":"Broyden Solver","category":"type"}]
}
"#;

    fn write_source(dir: &TempDir, contents: &str) -> PathBuf {
        let path = dir.path().join("search_index.js");
        std::fs::write(&path, contents).unwrap();
        path
    }

    #[tokio::test]
    async fn test_second_load_hits_cache() {
        let source_dir = TempDir::new().unwrap();
        let cache_dir = TempDir::new().unwrap();
        let path = write_source(&source_dir, SOURCE);
        let cache = IndexCache::new(cache_dir.path());

        let first = cache.load_or_parse(&path).await.unwrap();
        let entry = cache.entry_path(first.digest);
        check!(entry.exists());

        let second = cache.load_or_parse(&path).await.unwrap();
        check!(second.store == first.store);
        check!(second.terms == first.terms);
        check!(second.digest == first.digest);
    }

    #[tokio::test]
    async fn test_changed_source_gets_new_entry() {
        let source_dir = TempDir::new().unwrap();
        let cache_dir = TempDir::new().unwrap();
        let path = write_source(&source_dir, SOURCE);
        let cache = IndexCache::new(cache_dir.path());

        let first = cache.load_or_parse(&path).await.unwrap();
        write_source(&source_dir, r#"{"docs":[]}"#);
        let second = cache.load_or_parse(&path).await.unwrap();

        check!(first.digest != second.digest);
        check!(second.store.is_empty());
    }

    #[tokio::test]
    async fn test_corrupt_entry_is_rebuilt() {
        let source_dir = TempDir::new().unwrap();
        let cache_dir = TempDir::new().unwrap();
        let path = write_source(&source_dir, SOURCE);
        let cache = IndexCache::new(cache_dir.path());

        let digest = xxh3_64(SOURCE.as_bytes());
        std::fs::write(cache.entry_path(digest), b"\xff\xff\xff").unwrap();

        let loaded = cache.load_or_parse(&path).await.unwrap();
        check!(loaded.store.len() == 2);

        // The rebuilt entry is valid again
        let bytes = std::fs::read(cache.entry_path(digest)).unwrap();
        let_assert!(Ok(cached) = postcard::from_bytes::<CachedIndex>(&bytes));
        check!(cached.records.len() == 2);
    }

    #[tokio::test]
    async fn test_parse_error_is_not_cached() {
        let source_dir = TempDir::new().unwrap();
        let cache_dir = TempDir::new().unwrap();
        let bad = r#"{"docs":[{"page":"P","category":"page"}]}"#;
        let path = write_source(&source_dir, bad);
        let cache = IndexCache::new(cache_dir.path());

        let_assert!(Err(err) = cache.load_or_parse(&path).await);
        let_assert!(Some(LoadError::Parse { .. }) = err.downcast_ref::<LoadError>());
        check!(!cache.entry_path(xxh3_64(bad.as_bytes())).exists());
    }

    #[tokio::test]
    async fn test_missing_file() {
        let dir = TempDir::new().unwrap();
        let_assert!(Err(err) = LoadedIndex::load(&dir.path().join("absent.js")).await);
        let_assert!(Some(LoadError::Io { .. }) = err.downcast_ref::<LoadError>());
    }
}
