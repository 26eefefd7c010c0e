//! Result rendering for the CLI: JSON for machines, Markdown for reports,
//! colored tables for the terminal.

use crate::core::{IngestResult, OrderSummary};
use clap::ValueEnum;
use colored::*;
use comfy_table::{presets, Table};
use std::io::Write;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    Json,
    Markdown,
    Terminal,
}

pub trait OutputWriter {
    fn write_results(&mut self, results: &IngestResult) -> anyhow::Result<()>;
}

pub fn create_writer(format: OutputFormat, writer: Box<dyn Write>) -> Box<dyn OutputWriter> {
    match format {
        OutputFormat::Json => Box::new(JsonWriter::new(writer)),
        OutputFormat::Markdown => Box::new(MarkdownWriter::new(writer)),
        OutputFormat::Terminal => Box::new(TerminalWriter::new(writer)),
    }
}

pub struct JsonWriter<W: Write> {
    writer: W,
}

impl<W: Write> JsonWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for JsonWriter<W> {
    fn write_results(&mut self, results: &IngestResult) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(results)?;
        self.writer.write_all(json.as_bytes())?;
        writeln!(self.writer)?;
        Ok(())
    }
}

pub struct MarkdownWriter<W: Write> {
    writer: W,
}

impl<W: Write> MarkdownWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for MarkdownWriter<W> {
    fn write_results(&mut self, results: &IngestResult) -> anyhow::Result<()> {
        writeln!(self.writer, "# Order Lifecycle Report")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "## Summary")?;
        writeln!(self.writer)?;
        writeln!(self.writer, "- Events: {}", results.events.len())?;
        writeln!(self.writer, "- Orders: {}", results.timelines.len())?;
        writeln!(self.writer)?;
        if results.summaries.is_empty() {
            return Ok(());
        }
        writeln!(self.writer, "## Orders")?;
        writeln!(self.writer)?;
        writeln!(
            self.writer,
            "| Order | Branch | Paid | Refunded | Delta | Channel |"
        )?;
        writeln!(self.writer, "|---|---|---:|---:|---:|---|")?;
        for summary in &results.summaries {
            writeln!(
                self.writer,
                "| {} | {} | {:.2} | {:.2} | {:.2} | {} |",
                summary.order_id,
                summary.branch.display_name(),
                summary.paid_to_date,
                summary.refunded_to_date,
                summary.delta,
                channel_label(summary),
            )?;
        }
        Ok(())
    }
}

pub struct TerminalWriter<W: Write> {
    writer: W,
}

impl<W: Write> TerminalWriter<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }
}

impl<W: Write> OutputWriter for TerminalWriter<W> {
    fn write_results(&mut self, results: &IngestResult) -> anyhow::Result<()> {
        writeln!(
            self.writer,
            "{} {} events across {} orders",
            "Ingested".green().bold(),
            results.events.len(),
            results.timelines.len()
        )?;
        if results.summaries.is_empty() {
            return Ok(());
        }
        let mut table = Table::new();
        table.load_preset(presets::UTF8_FULL);
        table.set_header(vec![
            "Order", "Branch", "Paid", "Refunded", "Delta", "Channel", "Flags",
        ]);
        for summary in &results.summaries {
            table.add_row(vec![
                summary.order_id.clone(),
                summary.branch.display_name().to_string(),
                format!("{:.2}", summary.paid_to_date),
                format!("{:.2}", summary.refunded_to_date),
                format!("{:.2}", summary.delta),
                channel_label(summary),
                summary
                    .flags
                    .iter()
                    .map(|f| format!("{:?}", f))
                    .collect::<Vec<_>>()
                    .join(", "),
            ]);
        }
        writeln!(self.writer, "{table}")?;
        Ok(())
    }
}

fn channel_label(summary: &OrderSummary) -> String {
    match &summary.source {
        Some(source) => match source.order_class {
            Some(class) => format!("{:?} ({:?})", source.channel, class),
            None => format!("{:?}", source.channel),
        },
        None => "-".to_string(),
    }
}
