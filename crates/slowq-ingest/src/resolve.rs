//! Input specifier resolution

use crate::error::SourceError;
use slowq_core::DiscoveryConfig;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Resolve a file, directory or glob pattern into sorted, de-duplicated source paths.
///
/// A pattern matching nothing yields an empty list, not an error.
pub fn resolve(input: &str, discovery: &DiscoveryConfig) -> Result<Vec<PathBuf>, SourceError> {
    let path = Path::new(input);

    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    if path.is_dir() {
        return Ok(discover_dir(path, discovery));
    }

    expand_glob(input)
}

fn discover_dir(root: &Path, discovery: &DiscoveryConfig) -> Vec<PathBuf> {
    let files = WalkDir::new(root)
        .follow_links(true)
        .into_iter()
        .filter_map(|entry| match entry {
            Ok(e) => Some(e),
            Err(err) => {
                tracing::debug!(error = %err, "skipping unreadable directory entry");
                None
            }
        })
        .filter(|e| e.file_type().is_file())
        .filter(|e| {
            e.file_name()
                .to_str()
                .is_some_and(|name| discovery.is_candidate(name))
        })
        .map(|e| e.into_path());

    sorted_unique(files)
}

fn expand_glob(pattern: &str) -> Result<Vec<PathBuf>, SourceError> {
    let files = glob::glob(pattern)
        .map_err(|source| SourceError::InvalidPattern {
            pattern: pattern.to_string(),
            source,
        })?
        .filter_map(Result::ok)
        .filter(|p| p.is_file());

    Ok(sorted_unique(files))
}

/// De-duplicate and order by the path's string form, so `a.log` sorts before `a/b.log`
fn sorted_unique(paths: impl Iterator<Item = PathBuf>) -> Vec<PathBuf> {
    let by_text: BTreeMap<String, PathBuf> = paths
        .map(|p| (p.to_string_lossy().into_owned(), p))
        .collect();
    by_text.into_values().collect()
}
