//! Shared server state: loaded search indexes and the currently selected one.

use crate::cache::{IndexCache, LoadedIndex};
use crate::config::Config;
use crate::error::Result;
use anyhow::Context;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Number of loaded indexes kept in memory when unconfigured.
const DEFAULT_LRU_SIZE: NonZeroUsize = NonZeroUsize::new(16).unwrap();

/// Results per query when unconfigured.
const DEFAULT_LIMIT: usize = 10;

/// Central coordination point for tool handlers.
///
/// Parsed indexes are immutable and handed out as `Arc<LoadedIndex>`, so queries run
/// without holding any lock.
pub struct DocState {
    /// LRU cache of loaded indexes, keyed by canonical path
    loaded: RwLock<LruCache<PathBuf, Arc<LoadedIndex>>>,

    /// Index that queries run against when none is named
    active: RwLock<Option<PathBuf>>,

    /// On-disk cache of parsed indexes (if enabled)
    disk: Option<IndexCache>,

    /// Result limit for queries that do not give one
    default_limit: usize,
}

impl std::fmt::Debug for DocState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DocState")
            .field("loaded", &self.loaded.try_read().map(|cache| cache.len()).ok())
            .field("active", &self.active.try_read().map(|a| a.clone()).ok())
            .field("disk", &self.disk)
            .field("default_limit", &self.default_limit)
            .finish()
    }
}

impl Default for DocState {
    fn default() -> Self {
        Self::new(DEFAULT_LRU_SIZE, None)
    }
}

impl DocState {
    pub fn new(capacity: NonZeroUsize, disk: Option<IndexCache>) -> Self {
        Self {
            loaded: RwLock::new(LruCache::new(capacity)),
            active: RwLock::new(None),
            disk,
            default_limit: DEFAULT_LIMIT,
        }
    }

    /// State sized and cached the way `config` asks.
    pub fn from_config(config: &Config) -> Self {
        let capacity = NonZeroUsize::new(config.lru_size).unwrap_or(DEFAULT_LRU_SIZE);
        Self::new(capacity, config.disk_cache()).with_default_limit(config.limit)
    }

    /// Sets the result limit used when a query does not give one.
    pub fn with_default_limit(mut self, limit: usize) -> Self {
        self.default_limit = limit.max(1);
        self
    }

    pub fn default_limit(&self) -> usize {
        self.default_limit
    }

    /// Get an index by path, loading it if needed.
    ///
    /// A cached entry is reused only while the file's modification time is unchanged,
    /// so rebuilding the documentation site is picked up on the next query.
    pub async fn get(&self, path: &Path) -> Result<Arc<LoadedIndex>> {
        let canonical = tokio::fs::canonicalize(path)
            .await
            .with_context(|| format!("Search index not found at {}", path.display()))?;

        let modified = tokio::fs::metadata(&canonical)
            .await
            .ok()
            .and_then(|m| m.modified().ok());

        {
            let mut loaded = self.loaded.write().await;
            if let Some(index) = loaded.get(&canonical) {
                if index.modified == modified {
                    tracing::debug!("Cache hit for {}", canonical.display());
                    return Ok(index.clone());
                }
                tracing::info!("{} changed on disk, reloading", canonical.display());
            }
        }

        let index = match &self.disk {
            Some(disk) => disk.load_or_parse(&canonical).await?,
            None => LoadedIndex::load(&canonical).await?,
        };
        let index = Arc::new(index);

        self.loaded.write().await.put(canonical, index.clone());
        Ok(index)
    }

    /// Load an index and make it the active one.
    pub async fn select(&self, path: &Path) -> Result<Arc<LoadedIndex>> {
        let index = self.get(path).await?;
        *self.active.write().await = Some(index.path.clone());
        tracing::info!("Active search index is now {}", index.path.display());
        Ok(index)
    }

    /// Path of the active index, if one was selected.
    pub async fn active_path(&self) -> Option<PathBuf> {
        self.active.read().await.clone()
    }

    /// The active index, reloaded if it changed on disk.
    pub async fn active(&self) -> Result<Arc<LoadedIndex>> {
        let Some(path) = self.active_path().await else {
            anyhow::bail!(
                "No search index selected. Use set_index with the path to a search_index.js file."
            );
        };
        self.get(&path).await
    }

    /// Drop all loaded indexes (the active selection is kept).
    pub async fn clear(&self) {
        self.loaded.write().await.clear();
    }

    /// Number of indexes currently held in memory.
    pub async fn loaded_count(&self) -> usize {
        self.loaded.read().await.len()
    }
}
