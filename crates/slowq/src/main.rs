mod cli;
mod commands;

use clap::Parser;
use cli::{Cli, Commands, OutputFormat};
use commands::analyze::AnalyzeOptions;
use tracing::Level;
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // stdout carries reports, so logs go to stderr
    let level = if cli.verbose { Level::INFO } else { Level::WARN };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(level.into()));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Analyze {
            input,
            top_k,
            sort_by,
            format,
            detailed,
            export_csv,
            export_json,
            export_full,
            prefix,
        } => commands::analyze::run(&AnalyzeOptions {
            input,
            top_k,
            criterion: sort_by.into(),
            format: if detailed {
                OutputFormat::Detailed
            } else {
                format
            },
            export_csv,
            export_json,
            export_full,
            prefix,
        }),
        Commands::Stats { input, prefix } => commands::stats::run(&input, prefix.as_deref()),
        Commands::List { input, prefix } => commands::list::run(&input, prefix.as_deref()),
        Commands::Version => commands::version::run(),
    }
}
