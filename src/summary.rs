//! Per-order financial rollups and channel provenance.

use crate::core::{
    Channel, EventDetails, EventType, OrderBranch, OrderClass, OrderSource, OrderSummary,
    SummaryFlag, TimelineEvent,
};

/// Round to two decimal places (minor currency units).
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

fn sum_amounts(events: &[TimelineEvent], ty: EventType) -> f64 {
    events
        .iter()
        .filter(|e| e.event == ty)
        .filter_map(|e| e.amount)
        .sum()
}

/// A non-zero total that rounds below one minor unit is an anomaly worth
/// flagging, not an error.
fn is_near_zero(raw: f64, rounded: f64) -> bool {
    raw != 0.0 && rounded.abs() < 0.01
}

/// Build the summary for one order from its sorted timeline and computed
/// branch. Callers guarantee at least one event.
pub fn summarize(
    order_id: &str,
    events: &[TimelineEvent],
    branch: OrderBranch,
) -> OrderSummary {
    let paid_raw = sum_amounts(events, EventType::PaymentReleased);
    let refunded_raw = sum_amounts(events, EventType::RefundIssued);
    let paid_to_date = round2(paid_raw);
    let refunded_to_date = round2(refunded_raw);

    let mut flags = Vec::new();
    if is_near_zero(paid_raw, paid_to_date) {
        flags.push(SummaryFlag::NearZeroPaid);
    }
    if is_near_zero(refunded_raw, refunded_to_date) {
        flags.push(SummaryFlag::NearZeroRefund);
    }

    // Events arrive sorted and non-empty; the epoch fallback only guards
    // the degenerate empty slice.
    let epoch = chrono::DateTime::<chrono::Utc>::UNIX_EPOCH.naive_utc();
    OrderSummary {
        order_id: order_id.to_string(),
        first_seen: events.first().map(|e| e.at).unwrap_or(epoch),
        last_seen: events.last().map(|e| e.at).unwrap_or(epoch),
        branch,
        paid_to_date,
        refunded_to_date,
        delta: round2(paid_to_date - refunded_to_date),
        flags,
        source: extract_source(events),
    }
}

/// Channel provenance comes from the order's `Ordered` event, when present.
fn extract_source(events: &[TimelineEvent]) -> Option<OrderSource> {
    events.iter().find_map(|e| match &e.details {
        Some(EventDetails::Ordered {
            source: Some(raw), ..
        }) if e.event == EventType::Ordered => Some(parse_source(raw)),
        _ => None,
    })
}

/// Normalize channel strings, including legacy combined encodings such as
/// "flipkart_b2b". Unrecognized channels fall back to `Other`.
pub fn parse_source(raw: &str) -> OrderSource {
    let lower = raw.trim().to_lowercase();
    let channel = if lower.starts_with("amazon") {
        Channel::Amazon
    } else if lower.starts_with("flipkart") {
        Channel::Flipkart
    } else if lower.starts_with("meesho") {
        Channel::Meesho
    } else {
        Channel::Other
    };
    let order_class = if lower.contains("b2b") {
        Some(OrderClass::B2b)
    } else if lower.contains("b2c") {
        Some(OrderClass::B2c)
    } else {
        None
    };
    OrderSource {
        channel,
        order_class,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::SourceKind;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;

    fn event(day: u32, ty: EventType, amount: Option<f64>) -> TimelineEvent {
        TimelineEvent {
            order_id: "X".to_string(),
            at: NaiveDate::from_ymd_opt(2024, 5, day)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            event: ty,
            source: SourceKind::MarketplaceTransactions,
            amount,
            currency: None,
            details: None,
        }
    }

    #[test]
    fn rolls_up_paid_and_refunded_totals() {
        let events = vec![
            event(1, EventType::Ordered, None),
            event(2, EventType::PaymentReleased, Some(600.0)),
            event(3, EventType::PaymentReleased, Some(400.012)),
            event(4, EventType::RefundIssued, Some(250.0)),
        ];
        let summary = summarize("X", &events, OrderBranch::DeliveredThenRefunded);
        assert_eq!(summary.paid_to_date, 1000.01);
        assert_eq!(summary.refunded_to_date, 250.0);
        assert_eq!(summary.delta, 750.01);
        assert_eq!(summary.first_seen, events[0].at);
        assert_eq!(summary.last_seen, events[3].at);
        assert!(summary.flags.is_empty());
    }

    #[test]
    fn flags_near_zero_totals() {
        let events = vec![
            event(1, EventType::PaymentReleased, Some(0.004)),
            event(2, EventType::RefundIssued, Some(0.001)),
        ];
        let summary = summarize("X", &events, OrderBranch::Paid);
        assert_eq!(summary.paid_to_date, 0.0);
        assert_eq!(
            summary.flags,
            vec![SummaryFlag::NearZeroPaid, SummaryFlag::NearZeroRefund]
        );
    }

    #[test]
    fn parses_legacy_combined_source_strings() {
        assert_eq!(
            parse_source("flipkart_b2b"),
            OrderSource {
                channel: Channel::Flipkart,
                order_class: Some(OrderClass::B2b),
            }
        );
        assert_eq!(
            parse_source("Amazon.in"),
            OrderSource {
                channel: Channel::Amazon,
                order_class: None,
            }
        );
        assert_eq!(
            parse_source("shopify"),
            OrderSource {
                channel: Channel::Other,
                order_class: None,
            }
        );
    }

    #[test]
    fn source_comes_from_the_ordered_event() {
        let mut ordered = event(1, EventType::Ordered, None);
        ordered.details = Some(EventDetails::Ordered {
            sku: Some("SKU-1".into()),
            quantity: Some(1.0),
            source: Some("meesho b2c".into()),
        });
        let events = vec![ordered, event(2, EventType::Delivered, None)];
        let summary = summarize("X", &events, OrderBranch::AwaitingPayment);
        assert_eq!(
            summary.source,
            Some(OrderSource {
                channel: Channel::Meesho,
                order_class: Some(OrderClass::B2c),
            })
        );
    }
}
