//! Slow-query line extraction

use crate::types::RawEvent;
use chrono::NaiveDateTime;
use regex::Regex;
use std::sync::OnceLock;

static SLOW_QUERY_RE: OnceLock<Regex> = OnceLock::new();

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";
const WRAPPING_MARKER: &str = "wrapping";

/// A line-oriented grammar turning one log line into at most one event
pub trait LineGrammar {
    fn parse_line(&self, line: &str) -> Option<RawEvent>;
}

/// `<timestamp> ... SlowQuery: <n> milliseconds. SQL: '<payload>'`
#[derive(Debug, Clone, Copy, Default)]
pub struct SlowQueryGrammar;

impl LineGrammar for SlowQueryGrammar {
    fn parse_line(&self, line: &str) -> Option<RawEvent> {
        let re = SLOW_QUERY_RE.get_or_init(|| {
            Regex::new(
                r"^\s*(?P<ts>\d{4}-\d{2}-\d{2} \d{2}:\d{2}:\d{2}(?:\.\d+)?).*?SlowQuery:\s*(?P<ms>\d+) milliseconds\.\s*SQL:\s*'(?P<payload>.*)'",
            )
            .unwrap()
        });

        let caps = re.captures(line)?;
        // Durations that overflow u64 are treated like any other malformed line
        let duration_millis = caps["ms"].parse::<u64>().ok()?;
        let timestamp = NaiveDateTime::parse_from_str(&caps["ts"], TIMESTAMP_FORMAT).ok();

        Some(RawEvent {
            timestamp,
            duration_millis,
            statement: strip_wrapping(&caps["payload"]).to_string(),
        })
    }
}

/// Extract events from decoded log text; non-matching lines are skipped
pub fn extract(text: &str) -> impl Iterator<Item = RawEvent> + '_ {
    extract_with(&SlowQueryGrammar, text)
}

pub fn extract_with<'a, G: LineGrammar>(
    grammar: &'a G,
    text: &'a str,
) -> impl Iterator<Item = RawEvent> + 'a {
    text.lines().filter_map(move |line| grammar.parse_line(line))
}

/// Drop a connection-proxy prefix such as `HikariProxyPreparedStatement@1 wrapping `
fn strip_wrapping(payload: &str) -> &str {
    payload
        .match_indices(WRAPPING_MARKER)
        .find(|(idx, _)| is_token_at(payload, *idx))
        .map_or(payload, |(idx, _)| &payload[idx + WRAPPING_MARKER.len()..])
        .trim()
}

fn is_token_at(haystack: &str, idx: usize) -> bool {
    let before_ok = haystack[..idx]
        .chars()
        .next_back()
        .map_or(true, char::is_whitespace);
    let after_ok = haystack[idx + WRAPPING_MARKER.len()..]
        .chars()
        .next()
        .map_or(true, char::is_whitespace);
    before_ok && after_ok
}
