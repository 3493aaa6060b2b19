use super::{config_with, render_skipped};
use crate::cli::OutputFormat;
use slowq_core::Config;
use slowq_ingest::{analyze, Analysis};
use slowq_report::{
    export_csv, export_full, export_json, rank, render_detailed, render_statistics,
    render_structured, render_table, title, Criterion, StructuredReport,
};
use std::path::PathBuf;

pub struct AnalyzeOptions {
    pub input: String,
    pub top_k: Option<i64>,
    pub criterion: Criterion,
    pub format: OutputFormat,
    pub export_csv: Option<PathBuf>,
    pub export_json: Option<PathBuf>,
    pub export_full: Option<PathBuf>,
    pub prefix: Option<String>,
}

pub fn run(opts: &AnalyzeOptions) -> anyhow::Result<()> {
    let config = config_with(opts.prefix.as_deref(), opts.top_k);
    let analysis = analyze(&opts.input, &config)?;

    println!("{}", build_output(&analysis, opts.criterion, opts.format, &config)?);
    write_exports(&analysis, opts, &config)?;
    Ok(())
}

fn build_output(
    analysis: &Analysis,
    criterion: Criterion,
    format: OutputFormat,
    config: &Config,
) -> anyhow::Result<String> {
    let report = &analysis.report;
    let top_k = config.default_top_k;
    let entries = rank(report, criterion, top_k);

    if format == OutputFormat::Json {
        return Ok(render_structured(report, &entries, criterion, top_k)?);
    }

    let mut sections = vec![render_statistics(report)];
    if let Some(skipped) = render_skipped(&analysis.skipped) {
        sections.push(skipped);
    }

    let heading = title(criterion, top_k);
    sections.push(match format {
        OutputFormat::Detailed => render_detailed(&entries, criterion, &heading, config.sample_width),
        _ => render_table(&entries, criterion, &heading, config.preview_width),
    });

    Ok(sections.join("\n\n"))
}

fn write_exports(analysis: &Analysis, opts: &AnalyzeOptions, config: &Config) -> anyhow::Result<()> {
    let report = &analysis.report;
    let top_k = config.default_top_k;
    let entries = rank(report, opts.criterion, top_k);

    if let Some(path) = &opts.export_csv {
        export_csv(path, &entries)?;
        eprintln!("Exported CSV to {}", path.display());
    }
    if let Some(path) = &opts.export_json {
        export_json(path, &StructuredReport::new(report, &entries, opts.criterion, top_k))?;
        eprintln!("Exported JSON to {}", path.display());
    }
    if let Some(path) = &opts.export_full {
        export_full(path, report, top_k)?;
        eprintln!("Exported full report to {}", path.display());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn line(ms: u64, sql: &str) -> String {
        format!(
            "2024-05-14 09:12:44.318 WARN SlowQuery: {} milliseconds. SQL: 'HikariProxyPreparedStatement@7 wrapping {}'\n",
            ms, sql
        )
    }

    fn write_log(temp: &TempDir) -> String {
        let path = temp.path().join("repository.log");
        let text = [
            line(524, "select * from SoftwareComponent where refId=2938"),
            line(130, "insert into AssetChangeLog values (?)"),
            line(2648, "insert into AssetChangeLog values (?)"),
        ]
        .concat();
        std::fs::write(&path, text).unwrap();
        path.display().to_string()
    }

    fn options(input: String) -> AnalyzeOptions {
        AnalyzeOptions {
            input,
            top_k: None,
            criterion: Criterion::Hits,
            format: OutputFormat::Table,
            export_csv: None,
            export_json: None,
            export_full: None,
            prefix: None,
        }
    }

    #[test]
    fn test_build_output_table() {
        let temp = TempDir::new().unwrap();
        let input = write_log(&temp);
        let config = Config::new();
        let analysis = analyze(&input, &config).unwrap();

        let out = build_output(&analysis, Criterion::Hits, OutputFormat::Table, &config).unwrap();
        assert!(out.contains("STATISTICS"));
        assert!(out.contains("Total Slow Queries: 3"));
        assert!(out.contains("TOP 10 QUERIES BY FREQUENCY (MOST HITS)"));
        assert!(out.contains("INSERT assetchangelog"));
        assert!(!out.contains("Skipped Sources"));
    }

    #[test]
    fn test_build_output_json_is_pure_json() {
        let temp = TempDir::new().unwrap();
        let input = write_log(&temp);
        let config = Config::new();
        let analysis = analyze(&input, &config).unwrap();

        let out = build_output(&analysis, Criterion::Time, OutputFormat::Json, &config).unwrap();
        let value: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(value["sort_by"], "time");
        assert_eq!(value["top_k"], 10);
        assert_eq!(value["data"][0]["max_time"], 2648);
        assert_eq!(value["data"][0]["timestamp"], "2024-05-14 09:12:44.318");
    }

    #[test]
    fn test_build_output_detailed() {
        let temp = TempDir::new().unwrap();
        let input = write_log(&temp);
        let config = Config::new();
        let analysis = analyze(&input, &config).unwrap();

        let out =
            build_output(&analysis, Criterion::TotalTime, OutputFormat::Detailed, &config).unwrap();
        assert!(out.contains("1. INSERT assetchangelog"));
        assert!(out.contains("Hits: 2, Total: 2778ms"));
    }

    #[test]
    fn test_run_writes_exports() {
        let temp = TempDir::new().unwrap();
        let input = write_log(&temp);
        let mut opts = options(input);
        opts.export_csv = Some(temp.path().join("out.csv"));
        opts.export_json = Some(temp.path().join("out.json"));
        opts.export_full = Some(temp.path().join("full.json"));

        run(&opts).unwrap();

        let csv = std::fs::read_to_string(temp.path().join("out.csv")).unwrap();
        assert_eq!(csv.lines().count(), 3);
        assert!(temp.path().join("out.json").exists());
        assert!(temp.path().join("full.json").exists());
    }

    #[test]
    fn test_run_fails_without_sources() {
        let temp = TempDir::new().unwrap();
        let opts = options(format!("{}/*.log", temp.path().display()));
        assert!(run(&opts).is_err());
    }
}
