pub mod errors;
pub mod types;

pub use errors::{Error, Result};
pub use types::{
    Channel, EventDetails, EventType, Fee, IngestResult, IngestTables, InputFile, OrderBranch,
    OrderClass, OrderSource, OrderSummary, RawRecord, SourceKind, SummaryFlag, TimelineEvent,
    Value, WideTable,
};
