//! Configuration from an optional TOML file, environment variables, and CLI flags.
//!
//! Precedence, lowest to highest: built-in defaults, the config file, `DOCSEARCH_*`
//! environment variables, command-line flags (applied by the caller).

use crate::cache::IndexCache;
use crate::error::Result;
use anyhow::Context;
use serde::Deserialize;
use std::borrow::Cow;
use std::path::{Path, PathBuf};

pub const ENV_INDEX: &str = "DOCSEARCH_INDEX";
pub const ENV_CACHE_DIR: &str = "DOCSEARCH_CACHE_DIR";
pub const ENV_LIMIT: &str = "DOCSEARCH_LIMIT";
pub const ENV_NO_CACHE: &str = "DOCSEARCH_NO_CACHE";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Search index loaded at startup
    pub index: Option<PathBuf>,
    /// Where parsed indexes are cached; defaults to the platform cache directory
    pub cache_dir: Option<PathBuf>,
    /// Whether to use the on-disk cache at all
    pub cache: bool,
    /// Default maximum number of results per query
    pub limit: usize,
    /// Number of loaded indexes kept in memory
    pub lru_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            index: None,
            cache_dir: None,
            cache: true,
            limit: 10,
            lru_size: 16,
        }
    }
}

impl Config {
    /// Loads configuration from `explicit` (which must exist) or from the default
    /// location (which may not), then applies environment overrides.
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut config = match explicit {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path() {
                Some(path) if path.is_file() => Self::from_file(&path)?,
                _ => Self::default(),
            },
        };

        config.apply_env(|name| std::env::var(name).ok())?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_toml(&content)
            .with_context(|| format!("Failed to parse config file {}", path.display()))?;
        tracing::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content)?;
        config.index = config.index.map(|path| expand_tilde(&path).into_owned());
        config.cache_dir = config.cache_dir.map(|path| expand_tilde(&path).into_owned());
        Ok(config)
    }

    /// Applies `DOCSEARCH_*` overrides read through `var`.
    pub fn apply_env<F>(&mut self, var: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(index) = var(ENV_INDEX).filter(|v| !v.is_empty()) {
            self.index = Some(expand_tilde(Path::new(&index)).into_owned());
        }
        if let Some(dir) = var(ENV_CACHE_DIR).filter(|v| !v.is_empty()) {
            self.cache_dir = Some(expand_tilde(Path::new(&dir)).into_owned());
        }
        if let Some(limit) = var(ENV_LIMIT).filter(|v| !v.is_empty()) {
            self.limit = limit.trim().parse().with_context(|| {
                format!(
                    "{} must be a positive integer, got '{}'",
                    ENV_LIMIT, limit
                )
            })?;
        }
        if let Some(flag) = var(ENV_NO_CACHE) {
            let flag = flag.trim().to_ascii_lowercase();
            if !matches!(flag.as_str(), "" | "0" | "false" | "no") {
                self.cache = false;
            }
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.limit == 0 {
            anyhow::bail!("limit must be at least 1");
        }
        if self.lru_size == 0 {
            anyhow::bail!("lru_size must be at least 1");
        }
        Ok(())
    }

    /// `<config dir>/docsearch-mcp/config.toml`
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("docsearch-mcp").join("config.toml"))
    }

    /// The configured cache directory, or `<cache dir>/docsearch-mcp`.
    pub fn cache_dir(&self) -> Option<PathBuf> {
        self.cache_dir
            .clone()
            .or_else(|| dirs::cache_dir().map(|dir| dir.join("docsearch-mcp")))
    }

    /// The on-disk cache, unless caching is disabled or no directory is known.
    pub fn disk_cache(&self) -> Option<IndexCache> {
        if !self.cache {
            return None;
        }
        self.cache_dir().map(IndexCache::new)
    }
}

/// Expands a leading tilde (`~`) to the user's home directory.
///
/// - `~/docs/search_index.js` becomes `/home/user/docs/search_index.js`
/// - `~` becomes `/home/user`
/// - Other paths are returned unchanged
pub fn expand_tilde(path: &Path) -> Cow<'_, Path> {
    if let Ok(stripped) = path.strip_prefix("~")
        && let Some(home) = dirs::home_dir()
    {
        return Cow::Owned(home.join(stripped));
    }
    Cow::Borrowed(path)
}
