//! Orders extractor: one `Ordered` event per row, carrying SKU, quantity,
//! and sales-channel provenance.

use super::{cell_text, cell_timestamp, find_column, parse_amount};
use crate::core::{EventDetails, EventType, SourceKind, TimelineEvent, WideTable};

const ID_COLUMNS: &[&str] = &[
    "amazon-order-id",
    "order-id",
    "order-item-id",
    "order-number",
    "order-no",
];
const DATE_COLUMNS: &[&str] = &["purchase-date", "order-date", "ordered-on", "date"];
const SKU_COLUMNS: &[&str] = &["sku", "seller-sku", "asin"];
const QTY_COLUMNS: &[&str] = &["quantity-purchased", "quantity", "qty"];
const SOURCE_COLUMNS: &[&str] = &["sales-channel", "source", "channel"];
const AMOUNT_COLUMNS: &[&str] = &["item-price", "order-amount", "total"];
const CURRENCY_COLUMNS: &[&str] = &["currency"];

pub fn extract(table: &WideTable) -> Vec<TimelineEvent> {
    let id_col = find_column(table, ID_COLUMNS);
    let date_col = find_column(table, DATE_COLUMNS);
    let sku_col = find_column(table, SKU_COLUMNS);
    let qty_col = find_column(table, QTY_COLUMNS);
    let source_col = find_column(table, SOURCE_COLUMNS);
    let amount_col = find_column(table, AMOUNT_COLUMNS);
    let currency_col = find_column(table, CURRENCY_COLUMNS);

    table
        .rows
        .iter()
        .filter_map(|row| {
            let order_id = cell_text(row, id_col)?;
            let at = match cell_timestamp(row, date_col) {
                Some(at) => at,
                None => {
                    log::debug!("orders row for {} dropped: no usable date", order_id);
                    return None;
                }
            };
            let quantity = qty_col
                .and_then(|i| row.get(i))
                .and_then(parse_amount);
            let amount = amount_col.and_then(|i| row.get(i)).and_then(parse_amount);
            Some(TimelineEvent {
                order_id,
                at,
                event: EventType::Ordered,
                source: SourceKind::MarketplaceOrders,
                amount,
                currency: cell_text(row, currency_col),
                details: Some(EventDetails::Ordered {
                    sku: cell_text(row, sku_col),
                    quantity,
                    source: cell_text(row, source_col),
                }),
            })
        })
        .collect()
}
