pub mod doctor;
pub mod export;
pub mod models;
pub mod show;
pub mod subset;
pub mod summary;

use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use log::warn;
use serde::Serialize;
use snlc_core::Diagnostic;
use snlc_ingest::serde::to_canonical_json_bytes;
use snlc_ingest::{IndexBase, IngestConfig, PairFailure};

/// Where the simulations live and how to read them.
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    /// YAML ingestion configuration.
    #[arg(long)]
    pub config: Option<PathBuf>,
    /// Root of the decompressed simulations; overrides the config and `CADENCE_SIMS`.
    #[arg(long)]
    pub data_root: Option<PathBuf>,
    /// Number of file pairs read in parallel.
    #[arg(long)]
    pub jobs: Option<usize>,
    /// Row pointer convention of the header tables.
    #[arg(long, value_parser = parse_index_base)]
    pub index_base: Option<IndexBase>,
}

impl SourceArgs {
    /// Loads the configuration file, if any, and applies command-line overrides.
    pub fn resolve(&self) -> Result<IngestConfig, Box<dyn Error>> {
        let mut config = match &self.config {
            Some(path) => IngestConfig::load(path)?,
            None => IngestConfig::default(),
        };
        if let Some(root) = &self.data_root {
            config.data_root = Some(root.clone());
        }
        if let Some(jobs) = self.jobs {
            config.concurrency = jobs;
        }
        if let Some(base) = self.index_base {
            config.index_base = base;
        }
        Ok(config)
    }
}

fn parse_index_base(value: &str) -> Result<IndexBase, String> {
    match value {
        "one-based" | "1" => Ok(IndexBase::OneBased),
        "zero-based" | "0" => Ok(IndexBase::ZeroBased),
        other => Err(format!("expected one-based or zero-based, got {other}")),
    }
}

pub fn print_json<T: Serialize>(value: &T) -> Result<(), Box<dyn Error>> {
    let json = to_canonical_json_bytes(value).map_err(|err| Box::new(err) as Box<dyn Error>)?;
    println!("{}", String::from_utf8(json)?);
    Ok(())
}

/// Fails under `--strict` when anything was excluded or abandoned.
pub fn check_strict(
    strict: bool,
    diagnostics: &[Diagnostic],
    failures: &[PairFailure],
) -> Result<(), Box<dyn Error>> {
    for failure in failures {
        warn!("{}: {}", failure.pair.header.display(), failure.error);
    }
    if strict && !(diagnostics.is_empty() && failures.is_empty()) {
        return Err(format!(
            "{} records excluded and {} file pairs failed",
            diagnostics.len(),
            failures.len()
        )
        .into());
    }
    Ok(())
}
