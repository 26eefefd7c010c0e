//! Source-kind detection from filename keywords with a header-sniffing
//! fallback. Pure and total: always returns a kind, never fails.

use super::{normalize_column, parser};
use crate::core::SourceKind;

/// Ordered filename keyword table; the first entry with a matching keyword
/// wins, so specific kinds come before the generic "order" catch-all.
const FILENAME_PATTERNS: &[(&[&str], SourceKind)] = &[
    (
        &["transaction", "settlement", "payment"],
        SourceKind::MarketplaceTransactions,
    ),
    (&["purchase"], SourceKind::MarketplacePurchases),
    (
        &["stackry", "commercial_invoice", "international", "awb"],
        SourceKind::InternationalShipment,
    ),
    (
        &["national", "courier", "waybill", "manifest"],
        SourceKind::DomesticShipment,
    ),
    (&["cancel"], SourceKind::Cancellations),
    (&["order"], SourceKind::MarketplaceOrders),
];

/// Classify an input file from its name and an optional content sample
/// (first ~2KB). Returns `Unknown` when nothing matches.
pub fn detect_source(file_name: &str, sample: Option<&str>) -> SourceKind {
    let lower = file_name.to_lowercase();
    for (keywords, kind) in FILENAME_PATTERNS {
        if keywords.iter().any(|k| lower.contains(k)) {
            return *kind;
        }
    }
    match sample {
        Some(text) => sniff_headers(text),
        None => SourceKind::Unknown,
    }
}

/// Fallback: look for known header tokens in the sample's first line.
fn sniff_headers(sample: &str) -> SourceKind {
    let first_line = match sample.lines().find(|l| !l.trim().is_empty()) {
        Some(line) => line,
        None => return SourceKind::Unknown,
    };
    let delimiter = parser::detect_delimiter(first_line);
    let headers: Vec<String> = first_line
        .split(delimiter)
        .map(|h| normalize_column(h.trim_matches('"')))
        .collect();

    let has = |token: &str| headers.iter().any(|h| h.contains(token));

    if has("transaction-type") || has("settlement-id") {
        return SourceKind::MarketplaceTransactions;
    }
    if (has("order-id") || has("order-item-id") || has("order-number")) && (has("sku") || has("asin"))
    {
        return SourceKind::MarketplaceOrders;
    }
    if has("awb") {
        return SourceKind::InternationalShipment;
    }
    if has("tracking") && has("status") {
        return SourceKind::DomesticShipment;
    }
    SourceKind::Unknown
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filename_keywords_classify_case_insensitively() {
        assert_eq!(
            detect_source("2024_Transactions_Jan.csv", None),
            SourceKind::MarketplaceTransactions
        );
        assert_eq!(
            detect_source("PURCHASE_report.tsv", None),
            SourceKind::MarketplacePurchases
        );
        assert_eq!(
            detect_source("stackry-export.csv", None),
            SourceKind::InternationalShipment
        );
        assert_eq!(
            detect_source("courier_manifest.csv", None),
            SourceKind::DomesticShipment
        );
        assert_eq!(
            detect_source("cancelled_items.csv", None),
            SourceKind::Cancellations
        );
        assert_eq!(
            detect_source("all_orders.txt", None),
            SourceKind::MarketplaceOrders
        );
    }

    #[test]
    fn specific_keywords_win_over_order() {
        // "cancel" appears before "order" in the pattern table
        assert_eq!(
            detect_source("cancelled_orders.csv", None),
            SourceKind::Cancellations
        );
    }

    #[test]
    fn sniffs_orders_from_order_id_and_sku_headers() {
        let sample = "order-id,sku,quantity,purchase-date\nX1,A,1,2024-01-01\n";
        assert_eq!(
            detect_source("export.csv", Some(sample)),
            SourceKind::MarketplaceOrders
        );
    }

    #[test]
    fn sniffs_transactions_from_settlement_headers() {
        let sample = "settlement-id\ttransaction-type\ttotal\n1\tOrder\t10\n";
        assert_eq!(
            detect_source("data.tsv", Some(sample)),
            SourceKind::MarketplaceTransactions
        );
    }

    #[test]
    fn unmatched_file_is_unknown() {
        assert_eq!(detect_source("mystery.csv", None), SourceKind::Unknown);
        assert_eq!(
            detect_source("mystery.csv", Some("alpha,beta\n1,2\n")),
            SourceKind::Unknown
        );
    }
}
