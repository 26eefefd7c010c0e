//! File-level ingestion stages: source detection, tolerant delimited
//! parsing, PII sanitization, and wide-table construction.

pub mod detect;
pub mod parser;
pub mod sanitize;
pub mod table;

pub use detect::detect_source;
pub use parser::{detect_delimiter, parse_delimited};
pub use sanitize::sanitize;
pub use table::build_wide_table;

/// Normalize a column name for matching: lowercase, with every run of
/// non-alphanumeric characters collapsed to a single `-`.
///
/// Export headers are wildly inconsistent ("Order ID", "order-id",
/// "ORDER_ID"); everything matches through this form.
pub fn normalize_column(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut pending_dash = false;
    for c in name.trim().chars() {
        if c.is_alphanumeric() {
            if pending_dash && !out.is_empty() {
                out.push('-');
            }
            pending_dash = false;
            for lower in c.to_lowercase() {
                out.push(lower);
            }
        } else {
            pending_dash = true;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_spacing_case_and_punctuation() {
        assert_eq!(normalize_column("Order ID"), "order-id");
        assert_eq!(normalize_column("ORDER_ITEM__ID"), "order-item-id");
        assert_eq!(normalize_column("  Ship Address 1 "), "ship-address-1");
        assert_eq!(normalize_column("buyer-email"), "buyer-email");
        assert_eq!(normalize_column("Qty."), "qty");
    }
}
