use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SourceError {
    // Resolution
    #[error("no files found matching '{input}'")]
    NoSourcesFound { input: String },

    #[error("none of the {count} file(s) matching '{input}' could be read")]
    NoReadableSources { input: String, count: usize },

    #[error("glob pattern error: {pattern}: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },

    // Per-source, skipped by the pipeline
    #[error("failed to read {path}: {source}")]
    Unreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("no {prefix}*.log member found in archive {path}")]
    NoMatchingMember { path: PathBuf, prefix: String },
}

impl SourceError {
    pub fn unreadable(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Unreadable {
            path: path.into(),
            source,
        }
    }
}
