//! Property tests: classification totality and timeline ordering.

use chrono::NaiveDate;
use orderlens::{aggregate, classify, EventType, IngestConfig, SourceKind, TimelineEvent};
use proptest::prelude::*;

const EVENT_TYPES: [EventType; 9] = [
    EventType::Ordered,
    EventType::ShipmentCreated,
    EventType::InTransit,
    EventType::Delivered,
    EventType::CancelledByVendor,
    EventType::CancelledByCustomer,
    EventType::RefundIssued,
    EventType::PaymentReleased,
    EventType::ReturnWindowLapsed,
];

fn arb_event() -> impl Strategy<Value = TimelineEvent> {
    (0usize..EVENT_TYPES.len(), 1u32..28, 0u8..4, prop::option::of(-1000.0f64..1000.0)).prop_map(
        |(ty, day, order, amount)| TimelineEvent {
            order_id: format!("ORD-{order}"),
            at: NaiveDate::from_ymd_opt(2024, 5, day)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
            event: EVENT_TYPES[ty],
            source: SourceKind::MarketplaceOrders,
            amount,
            currency: None,
            details: None,
        },
    )
}

fn fixed_config() -> IngestConfig {
    IngestConfig {
        return_window_days: 30,
        as_of: Some(
            NaiveDate::from_ymd_opt(2024, 7, 1)
                .unwrap()
                .and_hms_opt(0, 0, 0)
                .unwrap(),
        ),
    }
}

proptest! {
    #[test]
    fn classification_is_total_for_any_nonempty_sequence(
        events in prop::collection::vec(arb_event(), 1..40)
    ) {
        let config = fixed_config();
        for timeline in aggregate(&events).values() {
            // Returning at all is the property; every sequence must map to
            // exactly one branch.
            let _ = classify(timeline, &config);
        }
    }

    #[test]
    fn aggregated_timelines_are_sorted_and_lossless(
        events in prop::collection::vec(arb_event(), 0..60)
    ) {
        let timelines = aggregate(&events);
        let total: usize = timelines.values().map(Vec::len).sum();
        prop_assert_eq!(total, events.len());
        for timeline in timelines.values() {
            for pair in timeline.windows(2) {
                prop_assert!(pair[0].at <= pair[1].at);
            }
        }
    }

    #[test]
    fn classification_is_stable_under_reclassification(
        events in prop::collection::vec(arb_event(), 1..40)
    ) {
        let config = fixed_config();
        for timeline in aggregate(&events).values() {
            prop_assert_eq!(classify(timeline, &config), classify(timeline, &config));
        }
    }
}
