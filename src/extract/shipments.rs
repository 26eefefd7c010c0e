//! Shipment extractor, shared by the international and domestic kinds.
//!
//! Tracker exports disagree on almost everything, so identifier, status and
//! timestamp columns are all looked up from candidate lists, and status text
//! is classified against keyword sets.

use super::{cell_text, cell_timestamp, find_column};
use crate::core::{EventDetails, EventType, SourceKind, TimelineEvent, WideTable};

const ID_COLUMNS: &[&str] = &[
    "order-id",
    "order-no",
    "order-number",
    "client-reference",
    "customer-reference",
    "reference",
];
const STATUS_COLUMNS: &[&str] = &[
    "shipment-status",
    "current-status",
    "status",
    "last-event",
    "scan",
    "event",
];
const DATE_COLUMNS: &[&str] = &[
    "status-date",
    "event-date",
    "event-time",
    "last-update",
    "updated-on",
    "delivery-date",
    "shipped-on",
    "date",
];

const DELIVERED_KEYWORDS: &[&str] = &["delivered", "pod"];
const TRANSIT_KEYWORDS: &[&str] = &[
    "pickup",
    "in transit",
    "received",
    "handover",
    "forwarded",
    "out for delivery",
];

pub fn extract(kind: SourceKind, table: &WideTable) -> Vec<TimelineEvent> {
    let id_col = find_column(table, ID_COLUMNS);
    let status_col = find_column(table, STATUS_COLUMNS);
    let date_col = find_column(table, DATE_COLUMNS);

    table
        .rows
        .iter()
        .filter_map(|row| {
            let order_id = cell_text(row, id_col)?;
            let at = cell_timestamp(row, date_col)?;
            let status = cell_text(row, status_col).unwrap_or_default();
            let (event, details) = classify_status(&status, &order_id);
            Some(TimelineEvent {
                order_id,
                at,
                event,
                source: kind,
                amount: None,
                currency: None,
                details,
            })
        })
        .collect()
}

fn classify_status(status: &str, reference: &str) -> (EventType, Option<EventDetails>) {
    let lower = status.to_lowercase();
    if DELIVERED_KEYWORDS.iter().any(|k| lower.contains(k)) {
        (EventType::Delivered, None)
    } else if TRANSIT_KEYWORDS.iter().any(|k| lower.contains(k)) {
        (EventType::InTransit, None)
    } else {
        // Unrecognized status stays visible downstream as raw text.
        (
            EventType::ShipmentCreated,
            Some(EventDetails::Shipment {
                status: status.to_string(),
                reference: Some(reference.to_string()),
            }),
        )
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
    fn classifies_delivered_and_transit_statuses() {
        let table = table(indoc! {"
            order-no,current-status,status-date
            X1,Delivered to consignee,2024-05-08
            X2,Out for delivery,2024-05-08
            X3,POD uploaded,2024-05-09
            X4,Shipment handover to courier,2024-05-07
        "});
        let events = extract(SourceKind::DomesticShipment, &table);
        let kinds: Vec<_> = events.iter().map(|e| e.event).collect();
        assert_eq!(
            kinds,
            vec![
                EventType::Delivered,
                EventType::InTransit,
                EventType::Delivered,
                EventType::InTransit,
            ]
        );
        assert!(events.iter().all(|e| e.source == SourceKind::DomesticShipment));
    }

    #[test]
    fn unknown_status_becomes_shipment_created_with_raw_text() {
        let table = table(indoc! {"
            client-reference,status,event-date
            R-9,Label generated,2024-05-01
        "});
        let events = extract(SourceKind::InternationalShipment, &table);
        assert_eq!(events[0].event, EventType::ShipmentCreated);
        assert_eq!(
            events[0].details,
            Some(EventDetails::Shipment {
                status: "Label generated".into(),
                reference: Some("R-9".into()),
            })
        );
    }

    #[test]
    fn rows_without_reference_are_dropped() {
        let table = table(indoc! {"
            order-no,status,event-date
            ,Delivered,2024-05-08
        "});
        assert!(extract(SourceKind::DomesticShipment, &table).is_empty());
    }
}
