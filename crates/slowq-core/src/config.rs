//! Configuration for discovery and rendering

/// How a log member name relates to the discovery prefix
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum MemberMatch {
    /// `<prefix>.log`
    Exact,
    /// `<prefix>*.log`
    Prefix,
}

/// File naming convention shared by the resolver and archive member selection
#[derive(Debug, Clone)]
pub struct DiscoveryConfig {
    pub name_prefix: String,
    pub extensions: Vec<String>,
}

impl DiscoveryConfig {
    pub fn new() -> Self {
        Self {
            name_prefix: "repository".to_string(),
            extensions: [".log", ".gz", ".tar.gz", ".tgz"]
                .iter()
                .map(|e| e.to_string())
                .collect(),
        }
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            name_prefix: prefix.into(),
            ..Self::new()
        }
    }

    /// Whether a base file name is a discovery candidate inside a directory
    pub fn is_candidate(&self, base_name: &str) -> bool {
        base_name.starts_with(&self.name_prefix)
            && self.extensions.iter().any(|ext| base_name.ends_with(ext))
    }

    /// Classify an archive member's base name; `None` when it is not a log member
    pub fn member_match(&self, base_name: &str) -> Option<MemberMatch> {
        if !base_name.ends_with(".log") || !base_name.starts_with(&self.name_prefix) {
            return None;
        }
        if base_name.len() == self.name_prefix.len() + ".log".len() {
            Some(MemberMatch::Exact)
        } else {
            Some(MemberMatch::Prefix)
        }
    }
}

impl Default for DiscoveryConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Analyzer configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub discovery: DiscoveryConfig,

    /// Characters of the sample statement shown in detailed output
    pub sample_width: usize,

    /// Characters of the statement preview under each row of the time table
    pub preview_width: usize,

    /// Result limit when none is given (<= 0 means unlimited)
    pub default_top_k: i64,
}

impl Config {
    pub fn new() -> Self {
        Self {
            discovery: DiscoveryConfig::new(),
            sample_width: 80,
            preview_width: 200,
            default_top_k: 10,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
