//! Per-source-kind event extraction.
//!
//! One pure transform per source kind, mapping wide-table rows into
//! canonical timeline events. Rows without a usable order identifier or
//! timestamp are dropped silently (debug-logged), not treated as errors.

pub mod cancellations;
pub mod orders;
pub mod shipments;
pub mod transactions;

use crate::core::{SourceKind, TimelineEvent, Value, WideTable};
use crate::ingest::normalize_column;
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use regex::Regex;

/// Dispatch a bucket's table to its extractor. Purchases has a table but no
/// extractor; unknown buckets are rerouted before extraction ever runs.
pub fn extract_events(kind: SourceKind, table: &WideTable) -> Vec<TimelineEvent> {
    match kind {
        SourceKind::MarketplaceOrders => orders::extract(table),
        SourceKind::MarketplaceTransactions => transactions::extract(table),
        SourceKind::InternationalShipment | SourceKind::DomesticShipment => {
            shipments::extract(kind, table)
        }
        SourceKind::Cancellations => cancellations::extract(table),
        SourceKind::MarketplacePurchases | SourceKind::Unknown => Vec::new(),
    }
}

/// Find the first column whose normalized name matches a candidate exactly,
/// falling back to substring containment. Candidate order is priority order.
pub(crate) fn find_column(table: &WideTable, candidates: &[&str]) -> Option<usize> {
    let normalized: Vec<String> = table.columns.iter().map(|c| normalize_column(c)).collect();
    for candidate in candidates {
        if let Some(idx) = normalized.iter().position(|n| n == candidate) {
            return Some(idx);
        }
    }
    for candidate in candidates {
        if let Some(idx) = normalized.iter().position(|n| n.contains(candidate)) {
            return Some(idx);
        }
    }
    None
}

/// Non-empty text of the cell at `idx`, if any.
pub(crate) fn cell_text(row: &[Value], idx: Option<usize>) -> Option<String> {
    row.get(idx?).and_then(Value::to_text)
}

static AMOUNT_JUNK: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^0-9.+\-]").unwrap());

/// Tolerant monetary coercion: numbers pass through, strings are stripped of
/// currency symbols and thousands separators before parsing.
pub(crate) fn parse_amount(value: &Value) -> Option<f64> {
    match value {
        Value::Num(n) => Some(*n),
        Value::Str(s) => {
            let cleaned = AMOUNT_JUNK.replace_all(s, "");
            cleaned.parse::<f64>().ok()
        }
        Value::Null => None,
    }
}

const DATE_ONLY_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%d/%m/%Y",
    "%m/%d/%Y",
    "%d-%m-%Y",
    "%d %b %Y",
    "%b %d, %Y",
];

const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
];

/// Tolerant timestamp parsing across the formats seen in export files.
/// Zone-aware forms are normalized to UTC; date-only forms get midnight.
pub fn parse_timestamp(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(trimmed) {
        return Some(dt.naive_utc());
    }
    for format in DATE_TIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(trimmed, format) {
            return Some(dt);
        }
    }
    for format in DATE_ONLY_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(trimmed, format) {
            return date.and_hms_opt(0, 0, 0);
        }
    }
    None
}

/// Timestamp of the cell at `idx`, if parseable.
pub(crate) fn cell_timestamp(row: &[Value], idx: Option<usize>) -> Option<NaiveDateTime> {
    cell_text(row, idx).and_then(|t| parse_timestamp(&t))
}
