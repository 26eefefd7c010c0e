//! Common type definitions used across the pipeline

use chrono::NaiveDateTime;
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Scalar cell value as produced by the delimited parser.
///
/// Cells start life as strings; a cell is only promoted to `Num` when the
/// numeric form round-trips back to the original text, so identifiers with
/// leading zeros stay strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Null,
    Num(f64),
    Str(String),
}

impl Value {
    /// Parse a raw cell into a value. Empty cells become `Null`.
    pub fn from_cell(cell: &str) -> Value {
        let trimmed = cell.trim();
        if trimmed.is_empty() {
            return Value::Null;
        }
        if let Ok(n) = trimmed.parse::<f64>() {
            if n.is_finite() && format_num(n) == trimmed {
                return Value::Num(n);
            }
        }
        Value::Str(trimmed.to_string())
    }

    /// True for `Null` and for blank strings.
    pub fn is_empty(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Str(s) => s.trim().is_empty(),
            Value::Num(_) => false,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Numeric coercion: `Num` directly, `Str` via parsing.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Num(n) => Some(*n),
            Value::Str(s) => s.trim().parse::<f64>().ok(),
            Value::Null => None,
        }
    }

    /// Text rendering used for column lookups and keyword matching.
    pub fn to_text(&self) -> Option<String> {
        match self {
            Value::Str(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
            Value::Num(n) => Some(format_num(*n)),
            _ => None,
        }
    }
}

fn format_num(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

/// One parsed input line: an insertion-ordered column → value mapping.
///
/// Column order matters downstream (wide-table columns keep first-appearance
/// order), so this is a thin wrapper over a pair list rather than a hash map.
/// Row widths are tens of columns, so linear lookup is fine.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawRecord {
    fields: Vec<(String, Value)>,
}

impl RawRecord {
    pub fn new() -> Self {
        Self { fields: Vec::new() }
    }

    /// Set a field, replacing any existing value under the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: Value) {
        let name = name.into();
        if let Some(existing) = self.fields.iter_mut().find(|(n, _)| *n == name) {
            existing.1 = value;
        } else {
            self.fields.push((name, value));
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn remove(&mut self, name: &str) -> Option<Value> {
        let idx = self.fields.iter().position(|(n, _)| n == name)?;
        Some(self.fields.remove(idx).1)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(n, _)| n.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl IntoIterator for RawRecord {
    type Item = (String, Value);
    type IntoIter = std::vec::IntoIter<(String, Value)>;

    fn into_iter(self) -> Self::IntoIter {
        self.fields.into_iter()
    }
}

impl FromIterator<(String, Value)> for RawRecord {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        let mut record = RawRecord::new();
        for (name, value) in iter {
            record.insert(name, value);
        }
        record
    }
}

impl Serialize for RawRecord {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for RawRecord {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RecordVisitor;

        impl<'de> Visitor<'de> for RecordVisitor {
            type Value = RawRecord;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("a map of column names to scalar values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<RawRecord, A::Error> {
                let mut record = RawRecord::new();
                while let Some((name, value)) = access.next_entry::<String, Value>()? {
                    record.insert(name, value);
                }
                Ok(record)
            }
        }

        deserializer.deserialize_map(RecordVisitor)
    }
}

/// File provenance, assigned once per input file by the source detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    MarketplaceOrders,
    MarketplaceTransactions,
    MarketplacePurchases,
    InternationalShipment,
    DomesticShipment,
    Cancellations,
    Unknown,
}

impl SourceKind {
    pub fn display_name(&self) -> &'static str {
        match self {
            SourceKind::MarketplaceOrders => "marketplace-orders",
            SourceKind::MarketplaceTransactions => "marketplace-transactions",
            SourceKind::MarketplacePurchases => "marketplace-purchases",
            SourceKind::InternationalShipment => "international-shipment",
            SourceKind::DomesticShipment => "domestic-shipment",
            SourceKind::Cancellations => "cancellations",
            SourceKind::Unknown => "unknown",
        }
    }
}

/// Pruned, deduplicated tabular projection of one source-kind bucket.
///
/// Invariants: every column has at least one non-empty value; no two columns
/// carry identical per-row value sequences (first occurrence wins).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WideTable {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl WideTable {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn value<'a>(&self, row: &'a [Value], column: &str) -> Option<&'a Value> {
        self.column_index(column).and_then(|idx| row.get(idx))
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

/// Canonical timeline event kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    Ordered,
    ShipmentCreated,
    InTransit,
    Delivered,
    CancelledByVendor,
    CancelledByCustomer,
    RefundIssued,
    PaymentReleased,
    ReturnWindowLapsed,
}

/// Typed per-event-kind attachment; each variant carries only the fields
/// that kind of event actually needs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum EventDetails {
    #[serde(rename_all = "camelCase")]
    Ordered {
        #[serde(skip_serializing_if = "Option::is_none")]
        sku: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        quantity: Option<f64>,
        #[serde(skip_serializing_if = "Option::is_none")]
        source: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Payment {
        #[serde(skip_serializing_if = "Vec::is_empty", default)]
        fees: Vec<Fee>,
    },
    #[serde(rename_all = "camelCase")]
    Shipment {
        status: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        reference: Option<String>,
    },
    #[serde(rename_all = "camelCase")]
    Cancellation {
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
    },
}

/// One line of a settlement fee breakdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Fee {
    pub name: String,
    pub amount: f64,
}

/// One canonical order-lifecycle event, extracted from exactly one input row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineEvent {
    pub order_id: String,
    pub at: NaiveDateTime,
    #[serde(rename = "type")]
    pub event: EventType,
    pub source: SourceKind,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub currency: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub details: Option<EventDetails>,
}

/// Lifecycle classification outcome, exactly one per order per ingest call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderBranch {
    Paid,
    AwaitingPayment,
    DeliveredThenRefunded,
    CancelledPreDeliveryRefunded,
    CancelledPreDeliveryPendingRefund,
    CancelledAfterDeliveryRefunded,
    CancelledAfterDeliveryPendingRefund,
    SendToFBA,
}

impl OrderBranch {
    pub fn display_name(&self) -> &'static str {
        match self {
            OrderBranch::Paid => "Paid",
            OrderBranch::AwaitingPayment => "Awaiting payment",
            OrderBranch::DeliveredThenRefunded => "Delivered, then refunded",
            OrderBranch::CancelledPreDeliveryRefunded => "Cancelled pre-delivery (refunded)",
            OrderBranch::CancelledPreDeliveryPendingRefund => {
                "Cancelled pre-delivery (refund pending)"
            }
            OrderBranch::CancelledAfterDeliveryRefunded => "Cancelled after delivery (refunded)",
            OrderBranch::CancelledAfterDeliveryPendingRefund => {
                "Cancelled after delivery (refund pending)"
            }
            OrderBranch::SendToFBA => "Send to FBA",
        }
    }
}

/// Sales channel extracted from order provenance metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Channel {
    Amazon,
    Flipkart,
    Meesho,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OrderClass {
    B2b,
    B2c,
}

/// Structured channel/order-class provenance for one order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSource {
    pub channel: Channel,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub order_class: Option<OrderClass>,
}

/// Anomaly tags attached to an order summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SummaryFlag {
    NearZeroPaid,
    NearZeroRefund,
}

/// Per-order financial rollup and classification result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderSummary {
    pub order_id: String,
    pub first_seen: NaiveDateTime,
    pub last_seen: NaiveDateTime,
    pub branch: OrderBranch,
    pub paid_to_date: f64,
    pub refunded_to_date: f64,
    pub delta: f64,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub flags: Vec<SummaryFlag>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub source: Option<OrderSource>,
}

/// The six pruned tables, one per source-kind bucket. Unknown-kind files are
/// folded into either the orders or domestic-shipment bucket before building.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestTables {
    pub orders: WideTable,
    pub transactions: WideTable,
    pub purchases: WideTable,
    pub international_shipments: WideTable,
    pub domestic_shipments: WideTable,
    pub cancellations: WideTable,
}

/// Consolidated output of one ingest call, owned entirely by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngestResult {
    pub tables: IngestTables,
    pub events: Vec<TimelineEvent>,
    pub timelines: BTreeMap<String, Vec<TimelineEvent>>,
    pub summaries: Vec<OrderSummary>,
}

/// One decoded input file handed to the orchestrator. Reading and UTF-8
/// decoding file bytes is the caller's responsibility.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InputFile {
    pub name: String,
    pub content: String,
}

impl InputFile {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}
