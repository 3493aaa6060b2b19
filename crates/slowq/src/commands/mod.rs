pub mod analyze;
pub mod list;
pub mod stats;
pub mod version;

use slowq_core::{Config, DiscoveryConfig};
use slowq_ingest::SkippedSource;

/// Default config with CLI overrides applied
pub fn config_with(prefix: Option<&str>, top_k: Option<i64>) -> Config {
    let mut config = Config::new();
    if let Some(prefix) = prefix {
        config.discovery = DiscoveryConfig::with_prefix(prefix);
    }
    if let Some(top_k) = top_k {
        config.default_top_k = top_k;
    }
    config
}

/// Section listing sources that were resolved but not read; empty when none
pub fn render_skipped(skipped: &[SkippedSource]) -> Option<String> {
    if skipped.is_empty() {
        return None;
    }
    let mut lines = vec![format!("Skipped Sources ({}):", skipped.len())];
    for s in skipped {
        lines.push(format!("  {}: {}", s.path.display(), s.error));
    }
    Some(lines.join("\n"))
}
