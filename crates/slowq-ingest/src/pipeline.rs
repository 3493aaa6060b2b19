//! Drains resolved sources into a shared aggregator

use crate::error::SourceError;
use crate::reader;
use crate::resolve::resolve;
use slowq_core::{extract, AggregateReport, Aggregator, Config, DiscoveryConfig};
use std::path::{Path, PathBuf};

/// A source that was resolved but could not contribute
#[derive(Debug)]
pub struct SkippedSource {
    pub path: PathBuf,
    pub error: SourceError,
}

/// Outcome of one analysis run
#[derive(Debug)]
pub struct Analysis {
    /// Every resolved source, in processing order
    pub sources: Vec<PathBuf>,
    pub report: AggregateReport,
    pub skipped: Vec<SkippedSource>,
}

/// Read one source and fold its events; returns the number of events found
pub fn ingest_source(
    path: &Path,
    discovery: &DiscoveryConfig,
    aggregator: &mut Aggregator,
) -> Result<u64, SourceError> {
    let content = reader::open(path, discovery)?;
    let label = path.display().to_string();

    aggregator.register_source(&label, content.byte_size);
    let found = aggregator.fold_all(&label, extract(&content.text));

    tracing::info!(
        source = %label,
        member = content.member.as_deref().unwrap_or("-"),
        events = found,
        bytes = content.byte_size,
        "read source"
    );
    Ok(found)
}

/// Ingest sources one at a time; per-source failures are collected, not raised
pub fn ingest_all(
    sources: &[PathBuf],
    discovery: &DiscoveryConfig,
    aggregator: &mut Aggregator,
) -> Vec<SkippedSource> {
    let mut skipped = Vec::new();

    for path in sources {
        if let Err(error) = ingest_source(path, discovery, aggregator) {
            tracing::warn!(source = %path.display(), %error, "skipping source");
            skipped.push(SkippedSource {
                path: path.clone(),
                error,
            });
        }
    }

    skipped
}

/// Resolve `input`, ingest every source and finalize the report
pub fn analyze(input: &str, config: &Config) -> Result<Analysis, SourceError> {
    let sources = resolve(input, &config.discovery)?;
    if sources.is_empty() {
        return Err(SourceError::NoSourcesFound {
            input: input.to_string(),
        });
    }

    let mut aggregator = Aggregator::new();
    let skipped = ingest_all(&sources, &config.discovery, &mut aggregator);

    if skipped.len() == sources.len() {
        return Err(SourceError::NoReadableSources {
            input: input.to_string(),
            count: sources.len(),
        });
    }

    Ok(Analysis {
        sources,
        report: aggregator.finalize(),
        skipped,
    })
}
