//! Transactions extractor: settlement rows become `PaymentReleased` or
//! `RefundIssued` events depending on the transaction type.

use super::{cell_text, cell_timestamp, find_column, parse_amount};
use crate::core::{EventDetails, EventType, Fee, SourceKind, TimelineEvent, WideTable};
use crate::ingest::normalize_column;

const ID_COLUMNS: &[&str] = &["amazon-order-id", "merchant-order-id", "order-id"];
const TYPE_COLUMNS: &[&str] = &["transaction-type", "type"];
const STATUS_COLUMNS: &[&str] = &["transaction-status", "status"];
const DATE_COLUMNS: &[&str] = &[
    "transaction-posted-date",
    "posted-date",
    "date-time",
    "date",
];
const AMOUNT_COLUMNS: &[&str] = &["total-amount", "total", "amount"];
const CURRENCY_COLUMNS: &[&str] = &["currency"];

pub fn extract(table: &WideTable) -> Vec<TimelineEvent> {
    let id_col = find_column(table, ID_COLUMNS);
    let type_col = find_column(table, TYPE_COLUMNS);
    let status_col = find_column(table, STATUS_COLUMNS);
    let date_col = find_column(table, DATE_COLUMNS);
    let amount_col = find_column(table, AMOUNT_COLUMNS);
    let currency_col = find_column(table, CURRENCY_COLUMNS);
    let fee_cols: Vec<usize> = table
        .columns
        .iter()
        .enumerate()
        .filter(|(_, name)| normalize_column(name).contains("fee"))
        .map(|(i, _)| i)
        .collect();

    table
        .rows
        .iter()
        .filter_map(|row| {
            let order_id = cell_text(row, id_col)?;
            let at = cell_timestamp(row, date_col)?;
            let tx_type = cell_text(row, type_col).unwrap_or_default().to_lowercase();
            let amount = amount_col.and_then(|i| row.get(i)).and_then(parse_amount);
            let currency = cell_text(row, currency_col);

            let event = if tx_type.contains("refund") {
                EventType::RefundIssued
            } else if is_released_payment(&tx_type, cell_text(row, status_col)) {
                EventType::PaymentReleased
            } else {
                log::debug!(
                    "transaction row for {} skipped: type '{}' not recognized",
                    order_id,
                    tx_type
                );
                return None;
            };

            let fees: Vec<Fee> = fee_cols
                .iter()
                .filter_map(|&i| {
                    let amount = row.get(i).and_then(parse_amount)?;
                    Some(Fee {
                        name: table.columns[i].clone(),
                        amount,
                    })
                })
                .collect();

            Some(TimelineEvent {
                order_id,
                at,
                event,
                source: SourceKind::MarketplaceTransactions,
                // Exports encode refund totals as negative; keep the
                // magnitude so paid/refunded rollups both stay positive.
                amount: amount.map(|a| {
                    if event == EventType::RefundIssued {
                        a.abs()
                    } else {
                        a
                    }
                }),
                currency,
                details: Some(EventDetails::Payment { fees }),
            })
        })
        .collect()
}

/// An order payment counts as released when the status column says so; a
/// file without any status column is assumed settled.
fn is_released_payment(tx_type: &str, status: Option<String>) -> bool {
    let is_payment = tx_type.contains("order") || tx_type.contains("payment");
    if !is_payment {
        return false;
    }
    match status {
        Some(s) => s.to_lowercase().contains("released"),
        None => true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::{build_wide_table, parse_delimited};
    use indoc::indoc;

    fn table(csv: &str) -> WideTable {
        build_wide_table(&parse_delimited(csv, None))
    }

    #[test]
    fn released_order_payment_becomes_payment_released() {
        let table = table(indoc! {"
            order-id,transaction-type,transaction-status,posted-date,total,currency
            403-111,Order Payment,Released,2024-05-10,1000,INR
        "});
        let events = extract(&table);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event, EventType::PaymentReleased);
        assert_eq!(events[0].amount, Some(1000.0));
        assert_eq!(events[0].currency, Some("INR".into()));
    }

    #[test]
    fn pending_payment_rows_are_skipped() {
        let table = table(indoc! {"
            order-id,transaction-type,transaction-status,posted-date,total
            403-111,Order Payment,Pending,2024-05-10,1000
        "});
        assert!(extract(&table).is_empty());
    }

    #[test]
    fn refund_rows_keep_positive_magnitude() {
        let table = table(indoc! {"
            order-id,transaction-type,posted-date,total
            403-222,Refund,2024-05-12,-500.00
        "});
        let events = extract(&table);
        assert_eq!(events[0].event, EventType::RefundIssued);
        assert_eq!(events[0].amount, Some(500.0));
    }

    #[test]
    fn fee_columns_land_in_payment_details() {
        let table = table(indoc! {"
            order-id,transaction-type,posted-date,total,selling fees,fba fees
            403-333,Order Payment,2024-05-10,900,-80,-20
        "});
        let events = extract(&table);
        match &events[0].details {
            Some(EventDetails::Payment { fees }) => {
                assert_eq!(fees.len(), 2);
                assert_eq!(fees[0].name, "selling fees");
                assert_eq!(fees[0].amount, -80.0);
            }
            other => panic!("expected payment details, got {:?}", other),
        }
    }
}
