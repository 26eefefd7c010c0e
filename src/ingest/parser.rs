//! Tolerant delimited parsing.
//!
//! Export files arrive as comma- or tab-separated text with a header row.
//! Fields may be double-quoted (with `""` escapes) and may contain the
//! delimiter inside quotes. No row-level validation happens here; type
//! coercion is deferred to the event extractors.

use super::sanitize::sanitize;
use crate::core::{RawRecord, Value};

/// Pick the field delimiter by comparing tab vs comma counts on the first
/// line. Ties go to comma.
pub fn detect_delimiter(first_line: &str) -> char {
    let tabs = first_line.matches('\t').count();
    let commas = first_line.matches(',').count();
    if tabs > commas {
        '\t'
    } else {
        ','
    }
}

/// Parse file text into sanitized records. The first non-empty line is the
/// header row; empty lines are skipped; missing trailing cells become null;
/// surplus cells are ignored.
pub fn parse_delimited(text: &str, delimiter: Option<char>) -> Vec<RawRecord> {
    let mut lines = text.lines().filter(|l| !l.trim().is_empty());
    let header_line = match lines.next() {
        Some(line) => line,
        None => return Vec::new(),
    };
    let delimiter = delimiter.unwrap_or_else(|| detect_delimiter(header_line));
    let headers: Vec<String> = split_line(header_line, delimiter)
        .into_iter()
        .map(|h| h.trim().to_string())
        .collect();

    lines
        .map(|line| {
            let cells = split_line(line, delimiter);
            let record: RawRecord = headers
                .iter()
                .enumerate()
                .filter(|(_, h)| !h.is_empty())
                .map(|(i, h)| {
                    let value = cells
                        .get(i)
                        .map(|c| Value::from_cell(c))
                        .unwrap_or(Value::Null);
                    (h.clone(), value)
                })
                .collect();
            sanitize(record)
        })
        .collect()
}

/// Quote-aware field splitter: double quotes wrap a field, `""` inside a
/// quoted field is a literal quote, and the delimiter is ordinary text
/// inside quotes.
fn split_line(line: &str, delimiter: char) -> Vec<String> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(c);
            }
        } else if c == '"' && current.is_empty() {
            in_quotes = true;
        } else if c == delimiter {
            fields.push(std::mem::take(&mut current));
        } else {
            current.push(c);
        }
    }
    fields.push(current);
    fields
}
