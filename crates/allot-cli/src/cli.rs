use crate::config::AllotConfig;
use crate::file_source::JsonFileSource;
use allot_core::{AllocationEngine, DataSnapshot};
use allot_types::AllocationRequest;
use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "allot")]
#[command(about = "Split model/color quantities across sales agents by performance")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Allocate every color of the catalog and print the result as JSON
    Run {
        /// Request file: roster, settings and catalog
        #[arg(short, long)]
        request: PathBuf,

        /// Directory holding the activity, inventory and store exports
        #[arg(short, long)]
        data_dir: PathBuf,

        /// Write the result here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(long)]
        pretty: bool,
    },

    /// Check a request file without fetching any data
    Validate {
        #[arg(short, long)]
        request: PathBuf,
    },

    /// Print whole-model weights of the eligible agents for one model
    Preview {
        #[arg(short, long)]
        request: PathBuf,

        #[arg(short, long)]
        data_dir: PathBuf,

        #[arg(short, long)]
        model: String,

        #[arg(long)]
        pretty: bool,
    },

    /// Describe how allocations are computed and show the effective configuration
    Explain,
}

impl Cli {
    pub async fn execute(&self, config: &AllotConfig, out: &mut dyn Write) -> anyhow::Result<()> {
        match &self.command {
            Command::Run { request, data_dir, output, pretty } => {
                let request = read_request(request).await?;
                let engine = AllocationEngine::new(config.engine.clone())?;
                let source = JsonFileSource::new(data_dir);
                let allocation = engine.allocate(&request, &source).await?;

                match output {
                    Some(path) => {
                        let mut buffer = Vec::new();
                        write_json(&mut buffer, &allocation, *pretty)?;
                        tokio::fs::write(path, buffer)
                            .await
                            .with_context(|| format!("writing {}", path.display()))?;
                        info!(output = %path.display(), "Wrote allocation");
                    }
                    None => write_json(out, &allocation, *pretty)?,
                }
                Ok(())
            }
            Command::Validate { request } => {
                let parsed = read_request(request).await?;
                AllocationEngine::validate_request(&parsed)
                    .with_context(|| format!("{} is not a valid request", request.display()))?;

                // Validation guarantees the catalog total fits
                let units: u64 = parsed.catalog.iter().map(|m| m.total_quantity()).fold(0, u64::saturating_add);
                writeln!(
                    out,
                    "{}: ok ({} agents, {} models, {} units)",
                    request.display(),
                    parsed.roster.len(),
                    parsed.catalog.len(),
                    units
                )?;
                Ok(())
            }
            Command::Preview { request, data_dir, model, pretty } => {
                let request = read_request(request).await?;
                let engine = AllocationEngine::new(config.engine.clone())?;
                let snapshot = DataSnapshot::gather(&JsonFileSource::new(data_dir)).await?;
                let weights = engine.preview_scores(&request, &snapshot, model)?;
                write_json(out, &weights, *pretty)
            }
            Command::Explain => explain(config, out),
        }
    }
}

async fn read_request(path: &Path) -> anyhow::Result<AllocationRequest> {
    let bytes = tokio::fs::read(path)
        .await
        .with_context(|| format!("reading request {}", path.display()))?;
    serde_json::from_slice(&bytes).with_context(|| format!("parsing request {}", path.display()))
}

fn write_json<T: Serialize>(out: &mut dyn Write, value: &T, pretty: bool) -> anyhow::Result<()> {
    if pretty {
        serde_json::to_writer_pretty(&mut *out, value)?;
    } else {
        serde_json::to_writer(&mut *out, value)?;
    }
    writeln!(out)?;
    Ok(())
}

fn explain(config: &AllotConfig, out: &mut dyn Write) -> anyhow::Result<()> {
    writeln!(out, "Allot inventory allocation engine")?;
    writeln!(out)?;
    writeln!(out, "For every color of every model:")?;
    writeln!(out, "  1. select agents by office + department, or individually")?;
    writeln!(out, "  2. drop agents that own no store")?;
    writeln!(out, "  3. score turnover rate, store count, inventory score and sales volume")?;
    writeln!(out, "  4. rescale the scores across the selected agents and weight them by the ratios")?;
    writeln!(out, "  5. hand out floor(weight share * quantity), then the remainder one unit at a")?;
    writeln!(out, "     time by weight, so the parts always sum to the quantity")?;
    writeln!(out)?;
    writeln!(out, "Agents with no activity and no stock for a color score a neutral 50.")?;
    writeln!(out)?;
    match &config.source {
        Some(path) => writeln!(out, "Effective configuration ({}):", path.display())?,
        None => writeln!(out, "Effective configuration (defaults):")?,
    }
    write!(out, "{}", toml::to_string_pretty(config).context("rendering configuration")?)?;
    Ok(())
}
