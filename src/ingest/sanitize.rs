//! PII sanitization gate.
//!
//! Every parsed record passes through here before it enters any bucket.
//! Identifying columns are removed outright; email-bearing columns are
//! masked rather than dropped so records stay joinable by a human reviewer.

use super::normalize_column;
use crate::core::{RawRecord, Value};

/// Columns removed outright, matched by normalized name.
const PII_COLUMNS: &[&str] = &[
    "name",
    "buyer-name",
    "recipient-name",
    "recipient",
    "consignee",
    "consignee-name",
    "ship-address-1",
    "ship-address-2",
    "ship-address-3",
    "address",
    "address-1",
    "address-2",
    "address-3",
    "address-line-1",
    "address-line-2",
    "phone",
    "phone-number",
    "buyer-phone-number",
    "contact-number",
    "postal-code",
    "ship-postal-code",
    "zip",
    "zip-code",
    "pincode",
];

const EMAIL_MASK: &str = "****";

fn is_pii_column(normalized: &str) -> bool {
    PII_COLUMNS.contains(&normalized) || normalized.starts_with("recipient-")
}

/// Strip identifying columns and mask email columns. Pure and total; fields
/// that are absent are simply no-ops.
pub fn sanitize(record: RawRecord) -> RawRecord {
    let mut out = RawRecord::new();
    for (name, value) in record {
        let normalized = normalize_column(&name);
        if is_pii_column(&normalized) {
            continue;
        }
        if normalized.contains("email") {
            out.insert(name, mask_email_value(value));
        } else {
            out.insert(name, value);
        }
    }
    out
}

fn mask_email_value(value: Value) -> Value {
    match value {
        Value::Str(s) => Value::Str(mask_email(&s)),
        Value::Num(n) => Value::Str(mask_email(&n.to_string())),
        Value::Null => Value::Null,
    }
}

/// Keep the first character of the local part, replace the remainder with a
/// fixed mask token, keep the domain unchanged.
fn mask_email(raw: &str) -> String {
    let (local, domain) = match raw.split_once('@') {
        Some((local, domain)) => (local, Some(domain)),
        None => (raw, None),
    };
    let mut masked = String::new();
    if let Some(first) = local.chars().next() {
        masked.push(first);
    }
    masked.push_str(EMAIL_MASK);
    if let Some(domain) = domain {
        masked.push('@');
        masked.push_str(domain);
    }
    masked
}
