use super::{config_with, render_skipped};
use slowq_ingest::{analyze, Analysis};
use slowq_report::{render_distribution, render_statistics};

pub fn run(input: &str, prefix: Option<&str>) -> anyhow::Result<()> {
    let config = config_with(prefix, None);
    let analysis = analyze(input, &config)?;
    println!("{}", build_stats(&analysis));
    Ok(())
}

fn build_stats(analysis: &Analysis) -> String {
    let mut sections = vec![render_statistics(&analysis.report)];
    if let Some(skipped) = render_skipped(&analysis.skipped) {
        sections.push(skipped);
    }
    if analysis.report.is_empty() {
        sections.push("No slow queries found.".to_string());
    } else {
        sections.push(render_distribution(&analysis.report));
    }
    sections.join("\n\n")
}
