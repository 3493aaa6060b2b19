//! Core types for slow query aggregation

use chrono::{NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;

/// Entity name used when no table can be derived
pub const UNKNOWN_ENTITY: &str = "UNKNOWN";

/// Upper bounds (exclusive) of the duration histogram buckets, in milliseconds
const DURATION_BOUNDS: [u64; 7] = [100, 250, 500, 1000, 2500, 5000, 10000];

/// Display labels for the duration histogram buckets
pub const DURATION_BUCKET_LABELS: [&str; 8] = [
    "<100ms",
    "100-249ms",
    "250-499ms",
    "500-999ms",
    "1000-2499ms",
    "2500-4999ms",
    "5000-9999ms",
    ">=10000ms",
];

/// One matched slow-query line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawEvent {
    /// Absent when the leading timestamp could not be parsed
    pub timestamp: Option<NaiveDateTime>,
    pub duration_millis: u64,
    pub statement: String,
}

/// Statement verb
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    Select,
    Insert,
    Update,
    Delete,
    Unknown,
}

impl Operation {
    pub fn from_token(token: &str) -> Self {
        match token.to_ascii_uppercase().as_str() {
            "SELECT" => Operation::Select,
            "INSERT" => Operation::Insert,
            "UPDATE" => Operation::Update,
            "DELETE" => Operation::Delete,
            _ => Operation::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Operation::Select => "SELECT",
            Operation::Insert => "INSERT",
            Operation::Update => "UPDATE",
            Operation::Delete => "DELETE",
            Operation::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Aggregation key: (operation, entity)
///
/// Ordered by display form so map iteration and ranking tie-breaks agree.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    pub operation: Operation,
    pub entity: String,
}

impl Signature {
    pub fn new(operation: Operation, entity: impl Into<String>) -> Self {
        Self {
            operation,
            entity: entity.into(),
        }
    }

    pub fn unknown() -> Self {
        Self::new(Operation::Unknown, UNKNOWN_ENTITY)
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.operation, self.entity)
    }
}

impl Ord for Signature {
    fn cmp(&self, other: &Self) -> Ordering {
        // No operation name is a prefix of another, so this matches comparing display strings
        self.operation
            .as_str()
            .cmp(other.operation.as_str())
            .then_with(|| self.entity.cmp(&other.entity))
    }
}

impl PartialOrd for Signature {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// The single slowest event observed for a signature
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SlowestEvent {
    pub duration_millis: u64,
    pub timestamp: Option<NaiveDateTime>,
    pub statement: String,
}

/// Running statistics for one signature
#[derive(Debug, Clone, PartialEq)]
pub struct SignatureStats {
    pub hit_count: u64,
    pub total_millis: u64,
    pub min_millis: u64,
    pub max_millis: u64,
    /// First statement seen; never overwritten
    pub sample_statement: String,
    pub slowest: SlowestEvent,
    pub first_seen: Option<NaiveDateTime>,
    pub last_seen: Option<NaiveDateTime>,
}

impl SignatureStats {
    pub fn from_event(event: RawEvent) -> Self {
        Self {
            hit_count: 1,
            total_millis: event.duration_millis,
            min_millis: event.duration_millis,
            max_millis: event.duration_millis,
            sample_statement: event.statement.clone(),
            first_seen: event.timestamp,
            last_seen: event.timestamp,
            slowest: SlowestEvent {
                duration_millis: event.duration_millis,
                timestamp: event.timestamp,
                statement: event.statement,
            },
        }
    }

    pub fn record(&mut self, event: RawEvent) {
        // Sums saturate at u64::MAX; aggregation never fails
        self.hit_count = self.hit_count.saturating_add(1);
        self.total_millis = self.total_millis.saturating_add(event.duration_millis);
        self.min_millis = self.min_millis.min(event.duration_millis);
        self.max_millis = self.max_millis.max(event.duration_millis);

        if let Some(ts) = event.timestamp {
            self.first_seen = Some(self.first_seen.map_or(ts, |seen| seen.min(ts)));
            self.last_seen = Some(self.last_seen.map_or(ts, |seen| seen.max(ts)));
        }

        // Strictly greater: the earliest of equally slow events stays
        if event.duration_millis > self.slowest.duration_millis {
            self.slowest = SlowestEvent {
                duration_millis: event.duration_millis,
                timestamp: event.timestamp,
                statement: event.statement,
            };
        }
    }

    pub fn average_millis(&self) -> f64 {
        if self.hit_count == 0 {
            return 0.0;
        }
        self.total_millis as f64 / self.hit_count as f64
    }
}

/// Per-source counters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceStats {
    pub path: String,
    pub event_count: u64,
    pub byte_size: u64,
}

/// Bounded histograms of event durations and hour of day
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeDistribution {
    pub by_duration: [u64; 8],
    pub by_hour: [u64; 24],
    pub untimed: u64,
}

impl TimeDistribution {
    pub fn record(&mut self, event: &RawEvent) {
        let bucket = DURATION_BOUNDS
            .iter()
            .position(|&bound| event.duration_millis < bound)
            .unwrap_or(DURATION_BOUNDS.len());
        self.by_duration[bucket] += 1;

        match event.timestamp {
            Some(ts) => self.by_hour[ts.hour() as usize] += 1,
            None => self.untimed += 1,
        }
    }

    /// (label, count) pairs for the duration histogram
    pub fn duration_buckets(&self) -> impl Iterator<Item = (&'static str, u64)> + '_ {
        DURATION_BUCKET_LABELS
            .iter()
            .copied()
            .zip(self.by_duration.iter().copied())
    }
}

/// Scalar totals across all signatures
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ReportTotals {
    pub total_events: u64,
    pub unique_signatures: usize,
    pub files_processed: usize,
    pub total_millis: u64,
    pub average_millis: f64,
    pub max_millis: u64,
    pub min_millis: u64,
}

/// Read-only snapshot produced by [`crate::Aggregator::finalize`]
#[derive(Debug, Clone)]
pub struct AggregateReport {
    signatures: BTreeMap<Signature, SignatureStats>,
    sources: BTreeMap<String, SourceStats>,
    distribution: TimeDistribution,
    totals: ReportTotals,
}

impl AggregateReport {
    pub(crate) fn new(
        signatures: BTreeMap<Signature, SignatureStats>,
        sources: BTreeMap<String, SourceStats>,
        distribution: TimeDistribution,
    ) -> Self {
        let total_events = signatures
            .values()
            .fold(0u64, |acc, s| acc.saturating_add(s.hit_count));
        let total_millis = signatures
            .values()
            .fold(0u64, |acc, s| acc.saturating_add(s.total_millis));
        let average_millis = if total_events > 0 {
            total_millis as f64 / total_events as f64
        } else {
            0.0
        };

        let totals = ReportTotals {
            total_events,
            unique_signatures: signatures.len(),
            files_processed: sources.len(),
            total_millis,
            average_millis,
            max_millis: signatures.values().map(|s| s.max_millis).max().unwrap_or(0),
            min_millis: signatures.values().map(|s| s.min_millis).min().unwrap_or(0),
        };

        Self {
            signatures,
            sources,
            distribution,
            totals,
        }
    }

    pub fn signatures(&self) -> &BTreeMap<Signature, SignatureStats> {
        &self.signatures
    }

    pub fn sources(&self) -> &BTreeMap<String, SourceStats> {
        &self.sources
    }

    pub fn distribution(&self) -> &TimeDistribution {
        &self.distribution
    }

    pub fn totals(&self) -> &ReportTotals {
        &self.totals
    }

    pub fn is_empty(&self) -> bool {
        self.signatures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(ms: u64, ts: Option<&str>, sql: &str) -> RawEvent {
        RawEvent {
            timestamp: ts.map(|t| {
                NaiveDateTime::parse_from_str(t, "%Y-%m-%d %H:%M:%S").unwrap()
            }),
            duration_millis: ms,
            statement: sql.to_string(),
        }
    }

    #[test]
    fn test_operation_from_token() {
        assert_eq!(Operation::from_token("select"), Operation::Select);
        assert_eq!(Operation::from_token("DeLeTe"), Operation::Delete);
        assert_eq!(Operation::from_token("merge"), Operation::Unknown);
    }

    #[test]
    fn test_signature_display() {
        let sig = Signature::new(Operation::Insert, "assetchangelog");
        assert_eq!(sig.to_string(), "INSERT assetchangelog");
        assert_eq!(Signature::unknown().to_string(), "UNKNOWN UNKNOWN");
    }

    #[test]
    fn test_signature_order_matches_display() {
        let mut sigs = vec![
            Signature::new(Operation::Update, "a"),
            Signature::new(Operation::Select, "b"),
            Signature::new(Operation::Unknown, "UNKNOWN"),
            Signature::new(Operation::Select, "a"),
            Signature::new(Operation::Delete, "z"),
        ];
        let mut by_display: Vec<String> = sigs.iter().map(|s| s.to_string()).collect();
        by_display.sort();
        sigs.sort();
        let sorted: Vec<String> = sigs.iter().map(|s| s.to_string()).collect();
        assert_eq!(sorted, by_display);
    }

    #[test]
    fn test_stats_record_keeps_first_sample() {
        let mut stats = SignatureStats::from_event(event(130, None, "insert into a values (1)"));
        stats.record(event(2648, None, "insert into a values (2)"));

        assert_eq!(stats.hit_count, 2);
        assert_eq!(stats.total_millis, 2778);
        assert_eq!(stats.min_millis, 130);
        assert_eq!(stats.max_millis, 2648);
        assert_eq!(stats.sample_statement, "insert into a values (1)");
        assert_eq!(stats.slowest.statement, "insert into a values (2)");
        assert_eq!(stats.average_millis(), 1389.0);
    }

    #[test]
    fn test_stats_slowest_tie_keeps_earliest() {
        let mut stats = SignatureStats::from_event(event(500, None, "first"));
        stats.record(event(500, None, "second"));
        assert_eq!(stats.slowest.statement, "first");
    }

    #[test]
    fn test_stats_seen_range() {
        let mut stats = SignatureStats::from_event(event(1, Some("2024-03-01 10:00:00"), "q"));
        stats.record(event(1, None, "q"));
        stats.record(event(1, Some("2024-02-28 09:00:00"), "q"));
        stats.record(event(1, Some("2024-03-02 11:00:00"), "q"));

        assert_eq!(
            stats.first_seen.unwrap().to_string(),
            "2024-02-28 09:00:00"
        );
        assert_eq!(stats.last_seen.unwrap().to_string(), "2024-03-02 11:00:00");
    }

    #[test]
    fn test_time_distribution_buckets() {
        let mut dist = TimeDistribution::default();
        dist.record(&event(99, Some("2024-01-01 03:15:00"), "q"));
        dist.record(&event(100, Some("2024-01-01 03:59:59"), "q"));
        dist.record(&event(10000, None, "q"));

        let buckets: Vec<_> = dist.duration_buckets().collect();
        assert_eq!(buckets[0], ("<100ms", 1));
        assert_eq!(buckets[1], ("100-249ms", 1));
        assert_eq!(buckets[7], (">=10000ms", 1));
        assert_eq!(dist.by_hour[3], 2);
        assert_eq!(dist.untimed, 1);
    }

    #[test]
    fn test_source_stats_roundtrip() {
        let stats = SourceStats {
            path: "logs/repository.log".to_string(),
            event_count: 30,
            byte_size: 4096,
        };
        let json = serde_json::to_string(&stats).unwrap();
        let parsed: SourceStats = serde_json::from_str(&json).unwrap();
        assert_eq!(stats, parsed);
    }

    #[test]
    fn test_stats_total_saturates() {
        let huge = 10_000_000_000_000_000_000;
        let mut stats = SignatureStats::from_event(event(huge, None, "select * from A"));
        stats.record(event(huge, None, "select * from A"));
        assert_eq!(stats.hit_count, 2);
        assert_eq!(stats.total_millis, u64::MAX);
        assert_eq!(stats.max_millis, huge);
    }

    #[test]
    fn test_report_totals_saturate_across_signatures() {
        let mut signatures = BTreeMap::new();
        for entity in ["a", "b"] {
            signatures.insert(
                Signature::new(Operation::Select, entity),
                SignatureStats::from_event(event(u64::MAX - 1, None, "select * from t")),
            );
        }
        let report =
            AggregateReport::new(signatures, BTreeMap::new(), TimeDistribution::default());
        assert_eq!(report.totals().total_events, 2);
        assert_eq!(report.totals().total_millis, u64::MAX);
        assert_eq!(report.totals().max_millis, u64::MAX - 1);
    }
}
