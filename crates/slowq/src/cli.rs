use clap::{Parser, Subcommand, ValueEnum};
use slowq_report::Criterion;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "slowq")]
#[command(version)]
#[command(about = "Slow query log analyzer")]
pub struct Cli {
    /// Log per-source progress to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Rank slow queries found in log files, archives or directories
    Analyze {
        /// File, directory or glob pattern
        input: String,

        /// Number of entries to show (0 or negative shows all)
        #[arg(short = 'k', long, allow_negative_numbers = true)]
        top_k: Option<i64>,

        /// Ranking criterion
        #[arg(short, long, value_enum, default_value_t = SortBy::Hits)]
        sort_by: SortBy,

        /// Output format
        #[arg(short, long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,

        /// Shorthand for --format detailed
        #[arg(long)]
        detailed: bool,

        /// Write the ranked entries as CSV
        #[arg(long, value_name = "FILE")]
        export_csv: Option<PathBuf>,

        /// Write statistics and ranked entries as JSON
        #[arg(long, value_name = "FILE")]
        export_json: Option<PathBuf>,

        /// Write statistics and rankings by every criterion as JSON
        #[arg(long, value_name = "FILE")]
        export_full: Option<PathBuf>,

        /// Base name prefix for discovery and archive members
        #[arg(long)]
        prefix: Option<String>,
    },

    /// Show statistics only
    Stats {
        /// File, directory or glob pattern
        input: String,

        #[arg(long)]
        prefix: Option<String>,
    },

    /// List the files that would be processed
    List {
        /// File, directory or glob pattern
        input: String,

        #[arg(long)]
        prefix: Option<String>,
    },

    /// Print version information
    Version,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SortBy {
    Hits,
    Time,
    TotalTime,
}

impl From<SortBy> for Criterion {
    fn from(value: SortBy) -> Self {
        match value {
            SortBy::Hits => Criterion::Hits,
            SortBy::Time => Criterion::Time,
            SortBy::TotalTime => Criterion::TotalTime,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Table,
    Detailed,
    Json,
}
