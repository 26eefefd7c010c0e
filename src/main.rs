use anyhow::{bail, Context, Result};
use clap::Parser;
use orderlens::cli::{Cli, Commands};
use orderlens::config::IngestConfig;
use orderlens::core::InputFile;
use orderlens::extract::parse_timestamp;
use orderlens::io::{create_writer, OutputFormat};
use orderlens::pipeline::ingest_with_options;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Ingest {
            files,
            format,
            output,
            config,
            return_window_days,
            as_of,
            no_parallel,
        } => run_ingest(
            &files,
            format,
            output.as_deref(),
            config.as_deref(),
            return_window_days,
            as_of.as_deref(),
            !no_parallel,
        ),
    }
}

#[allow(clippy::too_many_arguments)]
fn run_ingest(
    paths: &[PathBuf],
    format: OutputFormat,
    output: Option<&Path>,
    config_path: Option<&Path>,
    return_window_days: Option<i64>,
    as_of: Option<&str>,
    parallel: bool,
) -> Result<()> {
    let mut config = IngestConfig::load(config_path)?;
    if let Some(days) = return_window_days {
        config.return_window_days = days;
    }
    if let Some(raw) = as_of {
        config.as_of = Some(match parse_timestamp(raw) {
            Some(at) => at,
            None => bail!("cannot parse --as-of timestamp '{}'", raw),
        });
    }
    config.validate()?;

    let files = read_input_files(paths)?;
    let result = ingest_with_options(&files, &config, parallel);

    let writer: Box<dyn Write> = match output {
        Some(path) => Box::new(
            fs::File::create(path)
                .with_context(|| format!("failed to create output file {}", path.display()))?,
        ),
        None => Box::new(std::io::stdout()),
    };
    create_writer(format, writer).write_results(&result)
}

/// File reading and UTF-8 decoding belong to the caller, not the pipeline;
/// a failure here aborts the run as-is (no retries).
fn read_input_files(paths: &[PathBuf]) -> Result<Vec<InputFile>> {
    paths
        .iter()
        .map(|path| {
            let content = fs::read_to_string(path)
                .with_context(|| format!("failed to read input file {}", path.display()))?;
            let name = path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string());
            Ok(InputFile { name, content })
        })
        .collect()
}
