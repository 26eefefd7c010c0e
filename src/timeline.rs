//! Timeline aggregation: group extracted events by order id and sort each
//! group chronologically. Nothing is dropped here.

use crate::core::TimelineEvent;
use std::collections::BTreeMap;

/// Build the per-order timeline map. The stable sort keeps same-instant
/// events in extraction order, and sorting by timestamp makes the result
/// independent of file arrival order.
pub fn aggregate(events: &[TimelineEvent]) -> BTreeMap<String, Vec<TimelineEvent>> {
    let mut timelines: BTreeMap<String, Vec<TimelineEvent>> = BTreeMap::new();
    for event in events {
        timelines
            .entry(event.order_id.clone())
            .or_default()
            .push(event.clone());
    }
    for timeline in timelines.values_mut() {
        timeline.sort_by_key(|e| e.at);
    }
    timelines
}
