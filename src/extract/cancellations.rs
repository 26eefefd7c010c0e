//! Cancellations extractor: one vendor- or customer-initiated cancellation
//! event per row, keyed by the cancellation date.

use super::{cell_text, cell_timestamp, find_column};
use crate::core::{EventDetails, EventType, SourceKind, TimelineEvent, WideTable};

const ID_COLUMNS: &[&str] = &["amazon-order-id", "order-id", "order-number", "order-no"];
const DATE_COLUMNS: &[&str] = &["cancellation-date", "cancelled-on", "cancel-date", "date"];
const INITIATOR_COLUMNS: &[&str] = &[
    "cancelled-by",
    "cancellation-initiator",
    "initiated-by",
    "initiator",
];
const REASON_COLUMNS: &[&str] = &["cancellation-reason", "reason"];

pub fn extract(table: &WideTable) -> Vec<TimelineEvent> {
    let id_col = find_column(table, ID_COLUMNS);
    let date_col = find_column(table, DATE_COLUMNS);
    let initiator_col = find_column(table, INITIATOR_COLUMNS);
    let reason_col = find_column(table, REASON_COLUMNS);

    table
        .rows
        .iter()
        .filter_map(|row| {
            let order_id = cell_text(row, id_col)?;
            let at = match cell_timestamp(row, date_col) {
                Some(at) => at,
                None => {
                    log::debug!("cancellation row for {} dropped: no parseable date", order_id);
                    return None;
                }
            };
            let initiator = cell_text(row, initiator_col)
                .unwrap_or_default()
                .to_lowercase();
            let event = if initiator.contains("buyer") || initiator.contains("customer") {
                EventType::CancelledByCustomer
            } else {
                EventType::CancelledByVendor
            };
            Some(TimelineEvent {
                order_id,
                at,
                event,
                source: SourceKind::Cancellations,
                amount: None,
                currency: None,
                details: Some(EventDetails::Cancellation {
                    reason: cell_text(row, reason_col),
                }),
            })
        })
        .collect()
}
