//! Multi-criteria ranking of signatures

use chrono::NaiveDateTime;
use slowq_core::{AggregateReport, Signature, SignatureStats};

/// Ranking criterion
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Criterion {
    /// Hit count, descending
    Hits,
    /// Summed duration, descending
    TotalTime,
    /// Slowest single event per signature, descending
    Time,
}

impl Criterion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Criterion::Hits => "hits",
            Criterion::TotalTime => "total-time",
            Criterion::Time => "time",
        }
    }

    fn key(&self, stats: &SignatureStats) -> u64 {
        match self {
            Criterion::Hits => stats.hit_count,
            Criterion::TotalTime => stats.total_millis,
            Criterion::Time => stats.slowest.duration_millis,
        }
    }
}

/// One ranked signature, borrowed from the report
#[derive(Debug, Clone, Copy)]
pub struct RankedEntry<'a> {
    pub rank: usize,
    pub criterion: Criterion,
    pub signature: &'a Signature,
    pub stats: &'a SignatureStats,
}

impl<'a> RankedEntry<'a> {
    /// Statement shown for this entry: the slowest event's for `time`, else the first seen
    pub fn sample(&self) -> &'a str {
        match self.criterion {
            Criterion::Time => &self.stats.slowest.statement,
            _ => &self.stats.sample_statement,
        }
    }

    /// Timestamp of the slowest event, only meaningful for `time`
    pub fn timestamp(&self) -> Option<NaiveDateTime> {
        match self.criterion {
            Criterion::Time => self.stats.slowest.timestamp,
            _ => None,
        }
    }
}

/// Order signatures by `criterion`, ties broken by signature ascending.
///
/// `top_k <= 0` returns every entry.
pub fn rank(report: &AggregateReport, criterion: Criterion, top_k: i64) -> Vec<RankedEntry<'_>> {
    let mut entries: Vec<(&Signature, &SignatureStats)> = report.signatures().iter().collect();

    entries.sort_by(|(sig_a, a), (sig_b, b)| {
        criterion
            .key(b)
            .cmp(&criterion.key(a))
            .then_with(|| sig_a.cmp(sig_b))
    });

    if top_k > 0 {
        entries.truncate(usize::try_from(top_k).unwrap_or(usize::MAX));
    }

    entries
        .into_iter()
        .enumerate()
        .map(|(i, (signature, stats))| RankedEntry {
            rank: i + 1,
            criterion,
            signature,
            stats,
        })
        .collect()
}
