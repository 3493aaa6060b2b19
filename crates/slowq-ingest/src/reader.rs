//! Source decoding: plain text, gzip streams and tar.gz archives

use crate::error::SourceError;
use flate2::read::MultiGzDecoder;
use slowq_core::{DiscoveryConfig, MemberMatch};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::{Component, Path, PathBuf};

/// How a source's bytes are decoded, chosen by file name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Archive,
    Gzip,
    Plain,
}

impl SourceKind {
    pub fn detect(path: &Path) -> Self {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();

        if name.ends_with(".tar.gz") || name.ends_with(".tgz") {
            SourceKind::Archive
        } else if name.ends_with(".gz") {
            SourceKind::Gzip
        } else {
            SourceKind::Plain
        }
    }
}

/// Decoded text of one source
#[derive(Debug, Clone)]
pub struct SourceContent {
    pub text: String,
    /// Length of the decoded text in bytes
    pub byte_size: u64,
    /// Archive member the text came from, if any
    pub member: Option<String>,
}

impl SourceContent {
    fn decode(bytes: Vec<u8>, member: Option<String>) -> Self {
        // Invalid sequences become U+FFFD instead of failing the whole source
        let text = String::from_utf8(bytes)
            .unwrap_or_else(|err| String::from_utf8_lossy(err.as_bytes()).into_owned());
        Self {
            byte_size: text.len() as u64,
            text,
            member,
        }
    }
}

/// Read and decode one source fully in memory
pub fn open(path: &Path, discovery: &DiscoveryConfig) -> Result<SourceContent, SourceError> {
    match SourceKind::detect(path) {
        SourceKind::Plain => {
            let bytes = std::fs::read(path).map_err(|e| SourceError::unreadable(path, e))?;
            Ok(SourceContent::decode(bytes, None))
        }
        SourceKind::Gzip => {
            let file = File::open(path).map_err(|e| SourceError::unreadable(path, e))?;
            let mut decoder = MultiGzDecoder::new(BufReader::new(file));
            let mut bytes = Vec::new();
            decoder
                .read_to_end(&mut bytes)
                .map_err(|e| SourceError::unreadable(path, e))?;
            Ok(SourceContent::decode(bytes, None))
        }
        SourceKind::Archive => read_archive(path, discovery),
    }
}

/// Ordering key for archive members: exact name, then shallower, then path
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
struct MemberRank {
    matched: MemberMatch,
    depth: usize,
    name: String,
}

fn read_archive(path: &Path, discovery: &DiscoveryConfig) -> Result<SourceContent, SourceError> {
    let unreadable = |e| SourceError::unreadable(path, e);

    let file = File::open(path).map_err(unreadable)?;
    let mut archive = tar::Archive::new(MultiGzDecoder::new(BufReader::new(file)));

    let mut best: Option<(MemberRank, Vec<u8>)> = None;
    let mut candidates = 0usize;

    for entry in archive.entries().map_err(unreadable)? {
        let mut entry = entry.map_err(unreadable)?;
        if !entry.header().entry_type().is_file() {
            continue;
        }

        let member_path: PathBuf = entry.path().map_err(unreadable)?.into_owned();
        let Some(base_name) = member_path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        let Some(matched) = discovery.member_match(base_name) else {
            continue;
        };

        let rank = MemberRank {
            matched,
            depth: member_path
                .components()
                .filter(|c| matches!(c, Component::Normal(_)))
                .count(),
            name: member_path.to_string_lossy().into_owned(),
        };
        candidates += 1;
        tracing::debug!(archive = %path.display(), member = %rank.name, "archive member matches");

        if best.as_ref().is_some_and(|(current, _)| *current <= rank) {
            continue;
        }

        let mut bytes = Vec::new();
        entry.read_to_end(&mut bytes).map_err(unreadable)?;
        best = Some((rank, bytes));
    }

    let Some((rank, bytes)) = best else {
        return Err(SourceError::NoMatchingMember {
            path: path.to_path_buf(),
            prefix: discovery.name_prefix.clone(),
        });
    };

    if candidates > 1 {
        tracing::info!(
            archive = %path.display(),
            candidates,
            member = %rank.name,
            "multiple log members in archive, using best match"
        );
    }

    Ok(SourceContent::decode(bytes, Some(rank.name)))
}
