//! Source discovery, decoding and per-source ingestion

mod error;
mod pipeline;
mod reader;
mod resolve;

pub use error::SourceError;
pub use pipeline::{analyze, ingest_all, ingest_source, Analysis, SkippedSource};
pub use reader::{open, SourceContent, SourceKind};
pub use resolve::resolve;
