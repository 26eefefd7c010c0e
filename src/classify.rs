//! Order-branch classification.
//!
//! The nine lifecycle rules are an ordered decision table evaluated
//! top-to-bottom, first match wins. The ordering is part of the contract:
//! some later rows are shadowed by earlier ones (rule 7 by rule 2, rule 4
//! by rule 3) and are kept in place anyway rather than "fixed".

use crate::config::IngestConfig;
use crate::core::{EventType, OrderBranch, TimelineEvent};
use chrono::NaiveDateTime;

/// Most-recent significant events plus the evaluation clock.
struct RuleContext<'a> {
    delivered: Option<&'a TimelineEvent>,
    payment: Option<&'a TimelineEvent>,
    refund: Option<&'a TimelineEvent>,
    vendor_cancel: Option<&'a TimelineEvent>,
    customer_cancel: Option<&'a TimelineEvent>,
    as_of: NaiveDateTime,
    return_window_days: i64,
}

impl<'a> RuleContext<'a> {
    /// Events must already be in chronological order; the last occurrence of
    /// each significant type is the one that counts.
    fn from_events(events: &'a [TimelineEvent], config: &IngestConfig) -> Self {
        let last_of = |ty: EventType| events.iter().rev().find(|e| e.event == ty);
        Self {
            delivered: last_of(EventType::Delivered),
            payment: last_of(EventType::PaymentReleased),
            refund: last_of(EventType::RefundIssued),
            vendor_cancel: last_of(EventType::CancelledByVendor),
            customer_cancel: last_of(EventType::CancelledByCustomer),
            as_of: config.as_of_or_now(),
            return_window_days: config.return_window_days,
        }
    }

    fn any_cancel(&self) -> bool {
        self.vendor_cancel.is_some() || self.customer_cancel.is_some()
    }

    fn return_window_lapsed(&self) -> bool {
        match self.delivered {
            Some(delivered) => (self.as_of - delivered.at).num_days() > self.return_window_days,
            None => false,
        }
    }
}

struct Rule {
    name: &'static str,
    applies: fn(&RuleContext) -> bool,
    outcome: OrderBranch,
}

const RULES: &[Rule] = &[
    Rule {
        name: "refund-after-delivery",
        applies: |c| match (c.delivered, c.refund) {
            (Some(delivered), Some(refund)) => refund.at > delivered.at,
            _ => false,
        },
        outcome: OrderBranch::CancelledAfterDeliveryRefunded,
    },
    Rule {
        name: "delivered-unpaid",
        applies: |c| c.delivered.is_some() && c.payment.is_none(),
        outcome: OrderBranch::AwaitingPayment,
    },
    Rule {
        name: "delivered-paid",
        applies: |c| c.delivered.is_some() && c.payment.is_some() && c.refund.is_none(),
        outcome: OrderBranch::Paid,
    },
    Rule {
        name: "return-window-lapsed",
        applies: |c| {
            c.delivered.is_some()
                && c.refund.is_none()
                && c.payment.is_some()
                && c.return_window_lapsed()
        },
        outcome: OrderBranch::SendToFBA,
    },
    Rule {
        name: "customer-cancel-refunded",
        applies: |c| c.delivered.is_none() && c.customer_cancel.is_some() && c.refund.is_some(),
        outcome: OrderBranch::CancelledPreDeliveryRefunded,
    },
    Rule {
        name: "cancel-pre-delivery-pending",
        applies: |c| c.delivered.is_none() && c.any_cancel() && c.refund.is_none(),
        outcome: OrderBranch::CancelledPreDeliveryPendingRefund,
    },
    Rule {
        name: "cancel-after-delivery-pending",
        applies: |c| c.delivered.is_some() && c.any_cancel() && c.refund.is_none(),
        outcome: OrderBranch::CancelledAfterDeliveryPendingRefund,
    },
    Rule {
        name: "delivered-refunded",
        applies: |c| c.delivered.is_some() && c.refund.is_some(),
        outcome: OrderBranch::DeliveredThenRefunded,
    },
];

/// Classify one order's chronologically sorted events into exactly one
/// branch. Total for every event sequence; recomputed from scratch on every
/// ingest call.
pub fn classify(events: &[TimelineEvent], config: &IngestConfig) -> OrderBranch {
    let context = RuleContext::from_events(events, config);
    for rule in RULES {
        if (rule.applies)(&context) {
            log::debug!("classification rule '{}' fired", rule.name);
            return rule.outcome;
        }
    }
    // Fallback row: paid if a payment exists, otherwise awaiting payment.
    if context.payment.is_some() {
        OrderBranch::Paid
    } else {
        OrderBranch::AwaitingPayment
    }
}
