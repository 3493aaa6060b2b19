use super::config_with;
use slowq_ingest::{resolve, SourceError};
use std::path::PathBuf;

pub fn run(input: &str, prefix: Option<&str>) -> anyhow::Result<()> {
    let config = config_with(prefix, None);
    let files = resolve(input, &config.discovery)?;
    if files.is_empty() {
        return Err(SourceError::NoSourcesFound {
            input: input.to_string(),
        }
        .into());
    }
    println!("{}", build_listing(&files));
    Ok(())
}

fn build_listing(files: &[PathBuf]) -> String {
    let mut lines = vec![format!("Found {} file(s) to process:", files.len())];
    for (i, path) in files.iter().enumerate() {
        let size = match std::fs::metadata(path) {
            Ok(meta) => format!("{} bytes", meta.len()),
            Err(_) => "size unknown".to_string(),
        };
        lines.push(format!("  {:>3}. {} ({})", i + 1, path.display(), size));
    }
    lines.join("\n")
}
