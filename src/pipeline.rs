//! Ingest orchestration: the public entry point that wires detection,
//! parsing, bucketing, table building, extraction, aggregation,
//! classification and summarization into one synchronous call.

use crate::classify::classify;
use crate::config::IngestConfig;
use crate::core::{IngestResult, IngestTables, InputFile, RawRecord, SourceKind, TimelineEvent};
use crate::extract::extract_events;
use crate::ingest::{build_wide_table, detect_source, normalize_column, parse_delimited};
use crate::summary::summarize;
use crate::timeline::aggregate;
use rayon::prelude::*;

/// Bytes of file content handed to the detector as a sniffing sample.
const SAMPLE_BYTES: usize = 2048;

/// Explicit accumulator for per-kind record buckets; passed through the
/// merge stage instead of any module-level state.
#[derive(Debug, Default)]
struct Buckets {
    orders: Vec<RawRecord>,
    transactions: Vec<RawRecord>,
    purchases: Vec<RawRecord>,
    international: Vec<RawRecord>,
    domestic: Vec<RawRecord>,
    cancellations: Vec<RawRecord>,
}

impl Buckets {
    fn push(&mut self, kind: SourceKind, records: Vec<RawRecord>) {
        match kind {
            SourceKind::MarketplaceOrders => self.orders.extend(records),
            SourceKind::MarketplaceTransactions => self.transactions.extend(records),
            SourceKind::MarketplacePurchases => self.purchases.extend(records),
            SourceKind::InternationalShipment => self.international.extend(records),
            SourceKind::DomesticShipment => self.domestic.extend(records),
            SourceKind::Cancellations => self.cancellations.extend(records),
            SourceKind::Unknown => unreachable!("unknown kind is rerouted before bucketing"),
        }
    }
}

/// Run the full pipeline over the supplied files. Synchronous and pure
/// given its inputs; never fails on malformed content (see the error
/// design: file reading and decoding are the caller's problem).
pub fn ingest(files: &[InputFile], config: &IngestConfig) -> IngestResult {
    ingest_with_options(files, config, true)
}

/// Like [`ingest`], with the per-file parallel stage switchable off for
/// debugging.
pub fn ingest_with_options(
    files: &[InputFile],
    config: &IngestConfig,
    parallel: bool,
) -> IngestResult {
    // Per-file detection + parsing + sanitization has no cross-file
    // dependency; everything after the merge is single-threaded.
    let parsed: Vec<(SourceKind, Vec<RawRecord>)> = if parallel {
        files.par_iter().map(parse_one).collect()
    } else {
        files.iter().map(parse_one).collect()
    };

    let mut buckets = Buckets::default();
    for ((kind, records), file) in parsed.into_iter().zip(files) {
        let kind = match kind {
            SourceKind::Unknown => {
                let routed = route_unknown(&records);
                log::warn!(
                    "file '{}' has unknown kind, routed to {} bucket",
                    file.name,
                    routed.display_name()
                );
                routed
            }
            known => known,
        };
        buckets.push(kind, records);
    }

    let tables = IngestTables {
        orders: build_wide_table(&buckets.orders),
        transactions: build_wide_table(&buckets.transactions),
        purchases: build_wide_table(&buckets.purchases),
        international_shipments: build_wide_table(&buckets.international),
        domestic_shipments: build_wide_table(&buckets.domestic),
        cancellations: build_wide_table(&buckets.cancellations),
    };

    let mut events: Vec<TimelineEvent> = Vec::new();
    events.extend(extract_events(SourceKind::MarketplaceOrders, &tables.orders));
    events.extend(extract_events(
        SourceKind::MarketplaceTransactions,
        &tables.transactions,
    ));
    events.extend(extract_events(
        SourceKind::InternationalShipment,
        &tables.international_shipments,
    ));
    events.extend(extract_events(
        SourceKind::DomesticShipment,
        &tables.domestic_shipments,
    ));
    events.extend(extract_events(
        SourceKind::Cancellations,
        &tables.cancellations,
    ));

    let timelines = aggregate(&events);
    let summaries = timelines
        .iter()
        .map(|(order_id, timeline)| {
            let branch = classify(timeline, config);
            summarize(order_id, timeline, branch)
        })
        .collect();

    log::debug!(
        "ingested {} files into {} events across {} orders",
        files.len(),
        events.len(),
        timelines.len()
    );

    IngestResult {
        tables,
        events,
        timelines,
        summaries,
    }
}

fn parse_one(file: &InputFile) -> (SourceKind, Vec<RawRecord>) {
    let sample = sample_of(&file.content);
    let kind = detect_source(&file.name, Some(sample));
    let records = parse_delimited(&file.content, None);
    log::debug!(
        "file '{}' detected as {} ({} records)",
        file.name,
        kind.display_name(),
        records.len()
    );
    (kind, records)
}

/// First ~2KB of content, cut at a char boundary.
fn sample_of(content: &str) -> &str {
    if content.len() <= SAMPLE_BYTES {
        return content;
    }
    let mut end = SAMPLE_BYTES;
    while !content.is_char_boundary(end) {
        end -= 1;
    }
    &content[..end]
}

/// Heuristic routing for unknown-kind files: rows with a status/scan/event
/// style column look like a shipment tracker, anything else joins the
/// orders bucket as raw rows.
fn route_unknown(records: &[RawRecord]) -> SourceKind {
    let looks_like_tracker = records.iter().any(|record| {
        record.columns().any(|name| {
            let normalized = normalize_column(name);
            normalized.contains("status") || normalized.contains("scan") || normalized.contains("event")
        })
    });
    if looks_like_tracker {
        SourceKind::DomesticShipment
    } else {
        SourceKind::MarketplaceOrders
    }
}
