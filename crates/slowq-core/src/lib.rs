//! Slow query extraction, signature derivation and aggregation

mod aggregate;
mod config;
mod extract;
mod signature;
mod types;

pub use aggregate::Aggregator;
pub use config::{Config, DiscoveryConfig, MemberMatch};
pub use extract::{extract, extract_with, LineGrammar, SlowQueryGrammar};
pub use signature::derive;
pub use types::{
    AggregateReport, Operation, RawEvent, ReportTotals, Signature, SignatureStats, SlowestEvent,
    SourceStats, TimeDistribution, DURATION_BUCKET_LABELS, UNKNOWN_ENTITY,
};
