//! Locating generated search index files below a directory.

use super::set_index::INDEX_FILE_NAME;
use crate::config::expand_tilde;
use anyhow::Context;
use ignore::WalkBuilder;
use rmcp::schemars;
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Generated sites live a few levels down (`docs/build/`), never much deeper.
const DEFAULT_MAX_DEPTH: usize = 6;

#[derive(Debug, Deserialize, schemars::JsonSchema)]
pub struct FindIndexesRequest {
    /// Directory to search, typically a package root
    pub path: String,
    /// How many directory levels to descend (default 6)
    #[serde(default)]
    pub max_depth: Option<usize>,
}

/// Walk `root` for generated search index files, sorted by path.
///
/// Ignore files are not honored since build output is usually git-ignored;
/// hidden directories are still skipped.
pub fn find_indexes(root: &Path, max_depth: Option<usize>) -> Vec<PathBuf> {
    let mut found: Vec<PathBuf> = WalkBuilder::new(root)
        .max_depth(Some(max_depth.unwrap_or(DEFAULT_MAX_DEPTH)))
        .git_ignore(false)
        .git_global(false)
        .git_exclude(false)
        .ignore(false)
        .build()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_some_and(|t| t.is_file()))
        .filter(|entry| entry.file_name() == INDEX_FILE_NAME)
        .map(|entry| entry.into_path())
        .collect();

    found.sort();
    found
}

pub async fn handle_find_indexes(request: FindIndexesRequest) -> Result<String, String> {
    let root = expand_tilde(Path::new(&request.path)).into_owned();
    if !root.is_dir() {
        return Err(format!("Not a directory: {}", root.display()));
    }

    let found = walk(root.clone(), request.max_depth)
        .await
        .map_err(|e| e.to_string())?;
    Ok(format_found(&root, &found))
}

async fn walk(root: PathBuf, max_depth: Option<usize>) -> crate::error::Result<Vec<PathBuf>> {
    tokio::task::spawn_blocking(move || find_indexes(&root, max_depth))
        .await
        .context("Task panicked")
}

pub fn format_found(root: &Path, found: &[PathBuf]) -> String {
    if found.is_empty() {
        return format!(
            "No {} files found under {}. Build the documentation first.\n",
            INDEX_FILE_NAME,
            root.display()
        );
    }

    let mut output = format!("Found {} search indexes under {}:\n\n", found.len(), root.display());
    for path in found {
        output.push_str(&format!("• {}\n", path.display()));
    }
    output.push_str("\nUse set_index with one of these paths to query it.\n");
    output
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert2::{check, let_assert};
    use tempfile::TempDir;

    fn touch(dir: &TempDir, relative: &str) -> PathBuf {
        let path = dir.path().join(relative);
        std::fs::create_dir_all(path.parent().unwrap()).unwrap();
        std::fs::write(&path, "var documenterSearchIndex = {\"docs\":[]}").unwrap();
        path
    }

    #[test]
    fn test_finds_ignored_build_output() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(".gitignore"), "docs/build/\n").unwrap();
        let built = touch(&dir, "docs/build/search_index.js");
        let preview = touch(&dir, "previews/PR58/search_index.js");
        touch(&dir, ".cache/search_index.js");
        touch(&dir, "docs/build/other.js");

        check!(find_indexes(dir.path(), None) == vec![built, preview]);
    }

    #[test]
    fn test_max_depth() {
        let dir = TempDir::new().unwrap();
        touch(&dir, "a/b/c/search_index.js");
        check!(find_indexes(dir.path(), Some(2)).is_empty());
        check!(find_indexes(dir.path(), Some(4)).len() == 1);
    }

    #[tokio::test]
    async fn test_handle_find_indexes() {
        let dir = TempDir::new().unwrap();
        let request = FindIndexesRequest {
            path: dir.path().to_string_lossy().into_owned(),
            max_depth: None,
        };
        let_assert!(Ok(output) = handle_find_indexes(request).await);
        check!(output.starts_with("No search_index.js files found"));

        touch(&dir, "docs/build/search_index.js");
        let request = FindIndexesRequest {
            path: dir.path().to_string_lossy().into_owned(),
            max_depth: None,
        };
        let_assert!(Ok(output) = handle_find_indexes(request).await);
        check!(output.starts_with("Found 1 search indexes"));
        check!(output.contains("docs/build/search_index.js"));
    }

    #[tokio::test]
    async fn test_not_a_directory() {
        let request = FindIndexesRequest {
            path: "/definitely/not/here".into(),
            max_depth: None,
        };
        let_assert!(Err(message) = handle_find_indexes(request).await);
        check!(message.starts_with("Not a directory"));
    }
}
