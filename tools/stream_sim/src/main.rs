use anyhow::{Context, Result};
use clap::Parser;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use streamer::{CounterMode, FieldPolicy, LineEmitter, MalformedPolicy, StreamConfig};

/// Replay CSV files as a stream of one-line files.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// YAML or JSON config file; flags below override it
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Directory scanned for source CSV files
    #[arg(short, long)]
    source: Option<PathBuf>,

    /// Existing directory receiving one file per line
    #[arg(short, long)]
    destination: Option<PathBuf>,

    /// Pause after each emitted line, in milliseconds
    #[arg(short, long)]
    interval_ms: Option<u64>,

    /// Counter embedded in output names: literal | per-file
    #[arg(long)]
    counter: Option<CounterMode>,

    /// Lines without the name field: abort | skip
    #[arg(long)]
    on_malformed: Option<MalformedPolicy>,

    /// Filename normalization of the name field: verbatim | portable
    #[arg(long)]
    field_policy: Option<FieldPolicy>,

    /// Process source files in filename order
    #[arg(long)]
    sorted: bool,

    /// Write a JSON run summary here when done
    #[arg(long)]
    summary_json: Option<PathBuf>,
}

impl Cli {
    fn into_config(self) -> Result<(StreamConfig, Option<PathBuf>)> {
        let mut config = match &self.config {
            Some(path) => StreamConfig::load(path)
                .with_context(|| format!("Failed to load config {:?}", path))?,
            None => StreamConfig::default(),
        };

        if let Some(source) = self.source {
            config.source_dir = source;
        }
        if let Some(destination) = self.destination {
            config.destination_dir = destination;
        }
        if let Some(interval_ms) = self.interval_ms {
            config.interval_ms = interval_ms;
        }
        if let Some(counter) = self.counter {
            config.counter_mode = counter;
        }
        if let Some(policy) = self.on_malformed {
            config.malformed_lines = policy;
        }
        if let Some(policy) = self.field_policy {
            config.field_policy = policy;
        }
        config.sorted |= self.sorted;

        Ok((config, self.summary_json))
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let (config, summary_json) = Cli::parse().into_config()?;
    let mut emitter = LineEmitter::new(config);
    log::debug!("Using configuration: {:?}", emitter.config());

    let summary = emitter.run().context("Streaming failed")?;

    if let Some(path) = summary_json {
        let file = File::create(&path).with_context(|| format!("Failed to create {:?}", path))?;
        serde_json::to_writer_pretty(BufWriter::new(file), &summary)
            .context("Failed to write summary")?;
    }

    Ok(())
}
