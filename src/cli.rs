use crate::io::OutputFormat;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "orderlens")]
#[command(about = "Order-lifecycle export ingestion and classification", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Ingest export files and report per-order lifecycle summaries
    Ingest {
        /// Export files to ingest (CSV or TSV)
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "terminal")]
        format: OutputFormat,

        /// Output file (defaults to stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Optional TOML config file
        #[arg(long)]
        config: Option<PathBuf>,

        /// Days after delivery before an unrefunded order is FBA-eligible
        #[arg(long)]
        return_window_days: Option<i64>,

        /// Fixed evaluation timestamp (e.g. 2024-06-01T00:00:00) for
        /// reproducible classification; defaults to now
        #[arg(long)]
        as_of: Option<String>,

        /// Disable the parallel per-file parse stage
        #[arg(long)]
        no_parallel: bool,
    },
}
