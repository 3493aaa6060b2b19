//! Text and structured renderings of ranked entries

use crate::export::StructuredReport;
use crate::rank::{Criterion, RankedEntry};
use chrono::NaiveDateTime;
use slowq_core::AggregateReport;

const TIMESTAMP_DISPLAY: &str = "%Y-%m-%d %H:%M:%S%.3f";
const RULE_WIDTH: usize = 75;

/// Heading for a ranked section, e.g. `TOP 10 QUERIES BY TOTAL EXECUTION TIME`
pub fn title(criterion: Criterion, top_k: i64) -> String {
    let scope = if top_k > 0 {
        format!("TOP {}", top_k)
    } else {
        "ALL".to_string()
    };
    match criterion {
        Criterion::Hits => format!("{} QUERIES BY FREQUENCY (MOST HITS)", scope),
        Criterion::TotalTime => format!("{} QUERIES BY TOTAL EXECUTION TIME", scope),
        Criterion::Time => format!("{} SLOWEST INDIVIDUAL QUERIES", scope),
    }
}

/// First `width` characters of `text`, with `...` appended when cut
pub fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let mut out: String = text.chars().take(width).collect();
    out.push_str("...");
    out
}

fn heading(text: &str) -> String {
    format!("{}\n{}", text, "=".repeat(text.chars().count()))
}

fn format_timestamp(ts: Option<NaiveDateTime>) -> String {
    ts.map(|t| t.format(TIMESTAMP_DISPLAY).to_string())
        .unwrap_or_else(|| "-".to_string())
}

/// Overall totals and per-source counters
pub fn render_statistics(report: &AggregateReport) -> String {
    let totals = report.totals();
    let mut lines = vec![
        heading("STATISTICS"),
        format!("Total Slow Queries: {}", totals.total_events),
        format!("Unique Query Types: {}", totals.unique_signatures),
        format!("Files Processed: {}", totals.files_processed),
        format!("Total Execution Time: {}ms", totals.total_millis),
        format!("Average Execution Time: {:.1}ms", totals.average_millis),
        format!("Max Execution Time: {}ms", totals.max_millis),
        format!("Min Execution Time: {}ms", totals.min_millis),
    ];

    if !report.sources().is_empty() {
        lines.push("Source Files:".to_string());
        for source in report.sources().values() {
            lines.push(format!(
                "  {}: {} queries ({} bytes)",
                source.path, source.event_count, source.byte_size
            ));
        }
    }

    lines.join("\n")
}

/// Duration and hour-of-day histograms
pub fn render_distribution(report: &AggregateReport) -> String {
    let dist = report.distribution();
    let mut lines = vec![heading("TIME DISTRIBUTION"), "By duration:".to_string()];

    for (label, count) in dist.duration_buckets() {
        lines.push(format!("  {:<12} {}", label, count));
    }

    lines.push("By hour of day:".to_string());
    for (hour, count) in dist.by_hour.iter().enumerate() {
        if *count > 0 {
            lines.push(format!("  {:02}:00  {}", hour, count));
        }
    }
    if dist.untimed > 0 {
        lines.push(format!("  untimed {}", dist.untimed));
    }

    lines.join("\n")
}

/// Fixed-width table. The `time` criterion adds an indented statement preview under each row.
pub fn render_table(
    entries: &[RankedEntry<'_>],
    criterion: Criterion,
    title: &str,
    preview_width: usize,
) -> String {
    let mut lines = vec![heading(title)];

    if entries.is_empty() {
        lines.push("No slow queries found.".to_string());
        return lines.join("\n");
    }

    match criterion {
        Criterion::Time => {
            lines.push(format!(
                "{:<5} {:<8} {:<25} {:<10} {:<23}",
                "Rank", "Operation", "Table", "Time (ms)", "Timestamp"
            ));
            lines.push("-".repeat(RULE_WIDTH));
            for e in entries {
                lines.push(format!(
                    "{:<5} {:<8} {:<25} {:<10} {:<23}",
                    e.rank,
                    e.signature.operation.as_str(),
                    e.signature.entity,
                    e.stats.slowest.duration_millis,
                    format_timestamp(e.timestamp())
                ));
                lines.push(format!("      {}", truncate(e.sample(), preview_width)));
            }
        }
        Criterion::Hits | Criterion::TotalTime => {
            lines.push(format!(
                "{:<5} {:<35} {:<6} {:<10} {:<8} {:<8}",
                "Rank", "Query Type", "Hits", "Total(ms)", "Avg(ms)", "Max(ms)"
            ));
            lines.push("-".repeat(RULE_WIDTH));
            for e in entries {
                lines.push(format!(
                    "{:<5} {:<35} {:<6} {:<10} {:<8.0} {:<8}",
                    e.rank,
                    e.signature.to_string(),
                    e.stats.hit_count,
                    e.stats.total_millis,
                    e.stats.average_millis(),
                    e.stats.max_millis
                ));
            }
        }
    }

    lines.join("\n")
}

/// One paragraph per entry with a truncated sample statement
pub fn render_detailed(
    entries: &[RankedEntry<'_>],
    criterion: Criterion,
    title: &str,
    sample_width: usize,
) -> String {
    let mut blocks = vec![heading(title)];

    if entries.is_empty() {
        blocks.push("No slow queries found.".to_string());
        return blocks.join("\n");
    }

    for e in entries {
        let block = match criterion {
            Criterion::Time => format!(
                "{}. {} - {}ms\n   Timestamp: {}\n   Query: {}",
                e.rank,
                e.signature,
                e.stats.slowest.duration_millis,
                format_timestamp(e.timestamp()),
                truncate(e.sample(), sample_width)
            ),
            Criterion::Hits | Criterion::TotalTime => {
                let mut block = format!(
                    "{}. {}\n   Hits: {}, Total: {}ms, Avg: {:.0}ms\n   Range: {}ms - {}ms",
                    e.rank,
                    e.signature,
                    e.stats.hit_count,
                    e.stats.total_millis,
                    e.stats.average_millis(),
                    e.stats.min_millis,
                    e.stats.max_millis
                );
                if let (Some(first), Some(last)) = (e.stats.first_seen, e.stats.last_seen) {
                    block.push_str(&format!(
                        "\n   Seen: {} .. {}",
                        format_timestamp(Some(first)),
                        format_timestamp(Some(last))
                    ));
                }
                block.push_str(&format!("\n   Sample: {}", truncate(e.sample(), sample_width)));
                block
            }
        };
        blocks.push(format!("\n{}", block));
    }

    blocks.join("\n")
}

/// Pretty-printed JSON with statistics, ranked data, criterion and limit
pub fn render_structured(
    report: &AggregateReport,
    entries: &[RankedEntry<'_>],
    criterion: Criterion,
    top_k: i64,
) -> serde_json::Result<String> {
    serde_json::to_string_pretty(&StructuredReport::new(report, entries, criterion, top_k))
}
