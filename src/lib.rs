// Export modules for library usage
pub mod classify;
pub mod cli;
pub mod config;
pub mod core;
pub mod extract;
pub mod ingest;
pub mod io;
pub mod pipeline;
pub mod summary;
pub mod timeline;

// Re-export commonly used types
pub use crate::core::{
    Channel, EventDetails, EventType, IngestResult, IngestTables, InputFile, OrderBranch,
    OrderClass, OrderSource, OrderSummary, RawRecord, SourceKind, SummaryFlag, TimelineEvent,
    Value, WideTable,
};

pub use crate::classify::classify;
pub use crate::config::IngestConfig;
pub use crate::extract::{extract_events, parse_timestamp};
pub use crate::ingest::{build_wide_table, detect_source, parse_delimited, sanitize};
pub use crate::io::{create_writer, OutputFormat, OutputWriter};
pub use crate::pipeline::{ingest, ingest_with_options};
pub use crate::summary::summarize;
pub use crate::timeline::aggregate;
