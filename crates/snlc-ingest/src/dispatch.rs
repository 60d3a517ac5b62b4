use log::{debug, info, warn};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use snlc_core::errors::{Diagnostic, ErrorInfo, LcError};
use snlc_core::LightCurve;
use snlc_fits::Table;

use crate::assemble::{assemble_all_with, AssembleOptions};
use crate::config::IngestConfig;
use crate::discover::FilePair;
use crate::index::{build_index, IndexOptions};

/// Light curves and diagnostics of one successfully read file pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairReport {
    /// Files that were read.
    pub pair: FilePair,
    /// Curves in header order.
    pub light_curves: Vec<LightCurve>,
    /// Records excluded from this pair.
    pub diagnostics: Vec<Diagnostic>,
}

/// A file pair abandoned because of a file-level error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairFailure {
    /// Files that were abandoned.
    pub pair: FilePair,
    /// File-level error that stopped the pair.
    pub error: LcError,
}

/// Result of ingesting one file pair.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum PairOutcome {
    /// Both tables were read.
    Ingested(PairReport),
    /// A file-level error stopped the pair.
    Failed(PairFailure),
}

impl PairOutcome {
    /// Files the outcome belongs to.
    pub fn pair(&self) -> &FilePair {
        match self {
            PairOutcome::Ingested(report) => &report.pair,
            PairOutcome::Failed(failure) => &failure.pair,
        }
    }
}

/// Reads one header/photometry pair into light curves.
///
/// Both tables are opened here and dropped on return.
pub fn ingest_pair(pair: &FilePair, config: &IngestConfig) -> Result<PairReport, LcError> {
    let header = Table::open(&pair.header)?;
    let photometry = Table::open(&pair.photometry)?;
    let index = build_index(
        &header,
        &IndexOptions {
            model_code: pair.model_code,
            ..config.index_options()
        },
    )?;
    let assembly = assemble_all_with(
        &index,
        &photometry,
        AssembleOptions {
            check_snid: config.check_snid,
        },
    )?;
    let report = assembly.collect_report()?;
    debug!(
        "{}: {} light curves, {} diagnostics",
        pair.header.display(),
        report.light_curves.len(),
        report.diagnostics.len()
    );
    Ok(PairReport {
        pair: pair.clone(),
        light_curves: report.light_curves,
        diagnostics: report.diagnostics,
    })
}

/// Ingests every pair on a pool of `config.concurrency` threads.
///
/// Outcomes are returned in the order of `pairs`, whatever order the
/// workers finish in. A failing pair does not stop the others.
pub fn ingest_pairs(
    pairs: &[FilePair],
    config: &IngestConfig,
) -> Result<Vec<PairOutcome>, LcError> {
    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(config.concurrency.max(1))
        .build()
        .map_err(|err| {
            LcError::Config(ErrorInfo::new("snlc_ingest.thread_pool", err.to_string()))
        })?;

    let mut ordered: Vec<(usize, PairOutcome)> = pool.install(|| {
        pairs
            .par_iter()
            .enumerate()
            .map(|(position, pair)| {
                let outcome = match ingest_pair(pair, config) {
                    Ok(report) => PairOutcome::Ingested(report),
                    Err(error) => {
                        warn!("skipping {}: {error}", pair.header.display());
                        PairOutcome::Failed(PairFailure {
                            pair: pair.clone(),
                            error,
                        })
                    }
                };
                (position, outcome)
            })
            .collect()
    });
    ordered.sort_by_key(|(position, _)| *position);

    let failed = ordered
        .iter()
        .filter(|(_, outcome)| matches!(outcome, PairOutcome::Failed(_)))
        .count();
    info!("ingested {} file pairs ({failed} failed)", ordered.len());
    Ok(ordered.into_iter().map(|(_, outcome)| outcome).collect())
}
