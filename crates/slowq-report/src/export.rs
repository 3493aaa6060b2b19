//! CSV and JSON serializations of a ranked report

use crate::error::ExportError;
use crate::rank::{rank, Criterion, RankedEntry};
use serde::{Deserialize, Serialize};
use slowq_core::AggregateReport;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

const CSV_HEADER: [&str; 8] = [
    "rank",
    "query_type",
    "hits",
    "total_time",
    "avg_time",
    "max_time",
    "min_time",
    "sample",
];

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceFileRow {
    pub event_count: u64,
    pub byte_size: u64,
}

/// `statistics` object shared by every structured output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsView {
    pub total_slow_queries: u64,
    pub unique_query_types: usize,
    pub files_processed: usize,
    pub total_execution_time_ms: u64,
    pub average_execution_time_ms: f64,
    pub max_execution_time_ms: u64,
    pub min_execution_time_ms: u64,
    pub source_files: BTreeMap<String, SourceFileRow>,
}

impl StatisticsView {
    pub fn new(report: &AggregateReport) -> Self {
        let totals = report.totals();
        Self {
            total_slow_queries: totals.total_events,
            unique_query_types: totals.unique_signatures,
            files_processed: totals.files_processed,
            total_execution_time_ms: totals.total_millis,
            average_execution_time_ms: totals.average_millis,
            max_execution_time_ms: totals.max_millis,
            min_execution_time_ms: totals.min_millis,
            source_files: report
                .sources()
                .iter()
                .map(|(path, s)| {
                    (
                        path.clone(),
                        SourceFileRow {
                            event_count: s.event_count,
                            byte_size: s.byte_size,
                        },
                    )
                })
                .collect(),
        }
    }
}

/// One `data[]` entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataRow {
    pub query_type: String,
    pub hits: u64,
    pub total_time: u64,
    pub avg_time: f64,
    pub max_time: u64,
    pub min_time: u64,
    pub sample: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
}

impl From<&RankedEntry<'_>> for DataRow {
    fn from(e: &RankedEntry<'_>) -> Self {
        Self {
            query_type: e.signature.to_string(),
            hits: e.stats.hit_count,
            total_time: e.stats.total_millis,
            avg_time: e.stats.average_millis(),
            max_time: e.stats.max_millis,
            min_time: e.stats.min_millis,
            sample: e.sample().to_string(),
            timestamp: e
                .timestamp()
                .map(|t| t.format(TIMESTAMP_FORMAT).to_string()),
        }
    }
}

fn data_rows(entries: &[RankedEntry<'_>]) -> Vec<DataRow> {
    entries.iter().map(DataRow::from).collect()
}

/// Single-criterion structured output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuredReport {
    pub statistics: StatisticsView,
    pub data: Vec<DataRow>,
    pub sort_by: String,
    pub top_k: i64,
}

impl StructuredReport {
    pub fn new(
        report: &AggregateReport,
        entries: &[RankedEntry<'_>],
        criterion: Criterion,
        top_k: i64,
    ) -> Self {
        Self {
            statistics: StatisticsView::new(report),
            data: data_rows(entries),
            sort_by: criterion.as_str().to_string(),
            top_k,
        }
    }
}

/// Statistics plus one ranking per criterion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FullReport {
    pub statistics: StatisticsView,
    pub top_by_hits: Vec<DataRow>,
    pub top_by_individual_time: Vec<DataRow>,
    pub top_by_total_time: Vec<DataRow>,
}

impl FullReport {
    pub fn new(report: &AggregateReport, top_k: i64) -> Self {
        Self {
            statistics: StatisticsView::new(report),
            top_by_hits: data_rows(&rank(report, Criterion::Hits, top_k)),
            top_by_individual_time: data_rows(&rank(report, Criterion::Time, top_k)),
            top_by_total_time: data_rows(&rank(report, Criterion::TotalTime, top_k)),
        }
    }
}

#[derive(Serialize)]
struct CsvRow<'a> {
    rank: usize,
    query_type: String,
    hits: u64,
    total_time: u64,
    avg_time: u64,
    max_time: u64,
    min_time: u64,
    sample: &'a str,
}

/// Write ranked entries as CSV; the header row is written even when `entries` is empty
pub fn write_csv<W: Write>(writer: W, entries: &[RankedEntry<'_>]) -> csv::Result<()> {
    let mut out = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(writer);
    out.write_record(CSV_HEADER)?;

    for e in entries {
        out.serialize(CsvRow {
            rank: e.rank,
            query_type: e.signature.to_string(),
            hits: e.stats.hit_count,
            total_time: e.stats.total_millis,
            avg_time: e.stats.average_millis().round_ties_even() as u64,
            max_time: e.stats.max_millis,
            min_time: e.stats.min_millis,
            sample: e.sample(),
        })?;
    }

    out.flush()?;
    Ok(())
}

pub fn export_csv(path: &Path, entries: &[RankedEntry<'_>]) -> Result<(), ExportError> {
    let file = File::create(path).map_err(|e| ExportError::io(path, e))?;
    write_csv(BufWriter::new(file), entries).map_err(|source| ExportError::Csv {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), rows = entries.len(), "wrote csv export");
    Ok(())
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ExportError> {
    let file = File::create(path).map_err(|e| ExportError::io(path, e))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, value).map_err(|source| ExportError::Json {
        path: path.to_path_buf(),
        source,
    })?;
    writer.flush().map_err(|e| ExportError::io(path, e))?;
    Ok(())
}

pub fn export_json(path: &Path, report: &StructuredReport) -> Result<(), ExportError> {
    write_json(path, report)?;
    tracing::info!(path = %path.display(), rows = report.data.len(), "wrote json export");
    Ok(())
}

/// Write statistics plus top-`top_k` by every criterion
pub fn export_full(path: &Path, report: &AggregateReport, top_k: i64) -> Result<(), ExportError> {
    write_json(path, &FullReport::new(report, top_k))?;
    tracing::info!(path = %path.display(), "wrote full report");
    Ok(())
}
