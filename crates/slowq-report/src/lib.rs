//! Ranking, rendering and export of aggregate reports

mod error;
mod export;
mod rank;
mod render;

pub use error::ExportError;
pub use export::{
    export_csv, export_full, export_json, write_csv, DataRow, FullReport, SourceFileRow,
    StatisticsView, StructuredReport,
};
pub use rank::{rank, Criterion, RankedEntry};
pub use render::{
    render_detailed, render_distribution, render_statistics, render_structured, render_table,
    title, truncate,
};
