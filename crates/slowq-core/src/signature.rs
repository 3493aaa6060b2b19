//! Signature derivation from statement text

use crate::types::{Operation, Signature, UNKNOWN_ENTITY};
use regex::Regex;
use std::sync::OnceLock;

static FROM_RE: OnceLock<Regex> = OnceLock::new();
static INTO_RE: OnceLock<Regex> = OnceLock::new();
static UPDATE_RE: OnceLock<Regex> = OnceLock::new();

/// Map a statement to its (operation, entity) signature. Never fails.
pub fn derive(statement: &str) -> Signature {
    let operation = statement
        .split_whitespace()
        .next()
        .map(Operation::from_token)
        .unwrap_or(Operation::Unknown);

    let keyword = match operation {
        Operation::Select | Operation::Delete => {
            FROM_RE.get_or_init(|| Regex::new(r"(?i)\bfrom\b").unwrap())
        }
        Operation::Insert => INTO_RE.get_or_init(|| Regex::new(r"(?i)\binto\b").unwrap()),
        Operation::Update => UPDATE_RE.get_or_init(|| Regex::new(r"(?i)\bupdate\b").unwrap()),
        Operation::Unknown => return Signature::unknown(),
    };

    let entity = keyword
        .find(statement)
        .and_then(|m| identifier_after(&statement[m.end()..]))
        .unwrap_or_else(|| UNKNOWN_ENTITY.to_string());

    Signature::new(operation, entity)
}

/// Lower-cased identifier at the start of `rest`, without quoting or trailing punctuation
fn identifier_after(rest: &str) -> Option<String> {
    let rest = rest.trim_start();
    let rest = rest.strip_prefix(['`', '"', '[']).unwrap_or(rest);

    let ident: String = rest
        .chars()
        .take_while(|c| c.is_alphanumeric() || matches!(c, '_' | '.' | '$'))
        .collect();
    let ident = ident.trim_end_matches('.');

    if ident.is_empty() {
        None
    } else {
        Some(ident.to_lowercase())
    }
}
