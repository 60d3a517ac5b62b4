use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use log::warn;
use snlc_core::errors::{Diagnostic, ErrorInfo, LcError};
use snlc_core::LightCurve;

use crate::config::IngestConfig;
use crate::discover::discover_pairs;
use crate::dispatch::{ingest_pairs, PairFailure, PairOutcome};
use crate::models::ModelCatalog;
use crate::report::{
    content_hash, count_models, provenance, CadenceSummary, PairSummary, REPORT_SCHEMA,
};

/// Every light curve of one cadence, keyed by object identifier.
#[derive(Debug, Clone, PartialEq)]
pub struct CadenceData {
    cadence: String,
    data_root: PathBuf,
    filter_set: Vec<String>,
    curves: BTreeMap<i64, LightCurve>,
    pairs: Vec<PairSummary>,
    diagnostics: Vec<Diagnostic>,
    failures: Vec<PairFailure>,
}

impl CadenceData {
    /// Discovers and ingests `<data root>/<cadence>`.
    pub fn load(config: &IngestConfig, cadence: &str) -> Result<Self, LcError> {
        let root = config.data_root()?;
        let pairs = discover_pairs(&root, cadence)?;
        let outcomes = ingest_pairs(&pairs, config)?;
        Ok(Self::from_outcomes(cadence, root, config.filter_set(), outcomes))
    }

    /// Merges pair outcomes in the given order. When an object identifier
    /// appears in more than one file the first curve is kept.
    pub fn from_outcomes(
        cadence: impl Into<String>,
        data_root: impl Into<PathBuf>,
        filter_set: Vec<String>,
        outcomes: Vec<PairOutcome>,
    ) -> Self {
        let mut data = Self {
            cadence: cadence.into(),
            data_root: data_root.into(),
            filter_set,
            curves: BTreeMap::new(),
            pairs: Vec::new(),
            diagnostics: Vec::new(),
            failures: Vec::new(),
        };
        for outcome in outcomes {
            match outcome {
                PairOutcome::Ingested(report) => {
                    let mut kept = 0;
                    let mut observations = 0;
                    let mut duplicates = 0;
                    let reported = report.diagnostics.len();
                    data.diagnostics.extend(report.diagnostics);
                    for curve in report.light_curves {
                        let snid = curve.snid();
                        if data.curves.contains_key(&snid) {
                            let diagnostic = Diagnostic::new(LcError::Validation(
                                ErrorInfo::new(
                                    "snlc_ingest.duplicate_snid",
                                    format!("SNID {snid} already read from an earlier file"),
                                ),
                            ))
                            .with_source(report.pair.header.clone())
                            .with_snid(snid);
                            warn!("{diagnostic}");
                            data.diagnostics.push(diagnostic);
                            duplicates += 1;
                        } else {
                            kept += 1;
                            observations += curve.len();
                            data.curves.insert(snid, curve);
                        }
                    }
                    data.pairs.push(PairSummary {
                        pair: report.pair,
                        ingested: true,
                        light_curves: kept,
                        observations,
                        diagnostics: reported + duplicates,
                    });
                }
                PairOutcome::Failed(failure) => {
                    data.pairs.push(PairSummary {
                        pair: failure.pair.clone(),
                        ingested: false,
                        light_curves: 0,
                        observations: 0,
                        diagnostics: 0,
                    });
                    data.failures.push(failure);
                }
            }
        }
        data
    }

    /// Cadence directory name.
    pub fn cadence(&self) -> &str {
        &self.cadence
    }

    /// Root the cadence was read from.
    pub fn data_root(&self) -> &Path {
        &self.data_root
    }

    /// Light curve of one object.
    pub fn get_lightcurve(&self, snid: i64) -> Option<&LightCurve> {
        self.curves.get(&snid)
    }

    /// Object identifiers in ascending order.
    pub fn object_names(&self) -> Vec<i64> {
        self.curves.keys().copied().collect()
    }

    /// Prefixed band names, e.g. `lsstu` .. `lssty`.
    pub fn filter_set(&self) -> &[String] {
        &self.filter_set
    }

    /// Curves in ascending object identifier order.
    pub fn light_curves(&self) -> impl Iterator<Item = &LightCurve> {
        self.curves.values()
    }

    /// Number of objects.
    pub fn len(&self) -> usize {
        self.curves.len()
    }

    /// True when no object was read.
    pub fn is_empty(&self) -> bool {
        self.curves.is_empty()
    }

    /// Per-pair counts in path order.
    pub fn pairs(&self) -> &[PairSummary] {
        &self.pairs
    }

    /// Records excluded across all pairs.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Pairs abandoned on a file-level error.
    pub fn failures(&self) -> &[PairFailure] {
        &self.failures
    }

    /// Builds a report with a fresh timestamp and content hash.
    pub fn summary(&self, catalog: &ModelCatalog) -> Result<CadenceSummary, LcError> {
        Ok(CadenceSummary {
            schema_version: REPORT_SCHEMA,
            provenance: provenance(
                &self.data_root,
                &self.cadence,
                content_hash(self.light_curves())?,
            ),
            pairs: self.pairs.clone(),
            objects: self.len(),
            observations: self.light_curves().map(LightCurve::len).sum(),
            models: count_models(self.light_curves(), catalog),
            diagnostics: self.diagnostics.clone(),
            failures: self.failures.clone(),
        })
    }
}
