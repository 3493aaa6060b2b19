//! Streaming aggregation of slow-query events

use crate::signature::derive;
use crate::types::{AggregateReport, RawEvent, SignatureStats, SourceStats, TimeDistribution};
use crate::Signature;
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

/// Owns per-signature and per-source state for one run.
///
/// Events are folded and dropped; memory grows with distinct signatures
/// and sources only.
#[derive(Debug, Default)]
pub struct Aggregator {
    signatures: BTreeMap<Signature, SignatureStats>,
    sources: BTreeMap<String, SourceStats>,
    distribution: TimeDistribution,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a source that was read successfully, before its events are folded
    pub fn register_source(&mut self, source_path: &str, byte_size: u64) {
        let stats = self.source_entry(source_path);
        stats.byte_size = byte_size;
    }

    /// Fold one event into the signature and source statistics
    pub fn fold(&mut self, source_path: &str, event: RawEvent) {
        self.distribution.record(&event);
        let source = self.source_entry(source_path);
        source.event_count = source.event_count.saturating_add(1);

        let signature = derive(&event.statement);
        match self.signatures.entry(signature) {
            Entry::Occupied(mut entry) => entry.get_mut().record(event),
            Entry::Vacant(entry) => {
                tracing::debug!(signature = %entry.key(), "new signature");
                entry.insert(SignatureStats::from_event(event));
            }
        }
    }

    /// Fold every event from an iterator, returning how many were folded
    pub fn fold_all<I>(&mut self, source_path: &str, events: I) -> u64
    where
        I: IntoIterator<Item = RawEvent>,
    {
        let mut folded = 0;
        for event in events {
            self.fold(source_path, event);
            folded += 1;
        }
        folded
    }

    pub fn signature_count(&self) -> usize {
        self.signatures.len()
    }

    pub fn source_count(&self) -> usize {
        self.sources.len()
    }

    /// Consume the aggregator and compute scalar totals
    pub fn finalize(self) -> AggregateReport {
        AggregateReport::new(self.signatures, self.sources, self.distribution)
    }

    fn source_entry(&mut self, source_path: &str) -> &mut SourceStats {
        self.sources
            .entry(source_path.to_string())
            .or_insert_with(|| SourceStats {
                path: source_path.to_string(),
                event_count: 0,
                byte_size: 0,
            })
    }
}
