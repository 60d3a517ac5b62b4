use std::collections::BTreeMap;
use std::path::Path;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use snlc_core::errors::{Diagnostic, LcError};
use snlc_core::provenance::{IngestProvenance, SchemaVersion};
use snlc_core::LightCurve;

use crate::discover::FilePair;
use crate::dispatch::PairFailure;
use crate::hash::stable_hash_string;
use crate::models::ModelCatalog;

/// Schema of serialized [`CadenceSummary`] values.
pub const REPORT_SCHEMA: SchemaVersion = SchemaVersion::new(1, 0, 0);

/// Per-pair counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PairSummary {
    /// Files of the pair.
    pub pair: FilePair,
    /// False when the pair failed.
    pub ingested: bool,
    /// Curves kept from this pair after cross-file deduplication.
    pub light_curves: usize,
    /// Observations in the kept curves.
    pub observations: usize,
    /// Records excluded from this pair, including cross-file duplicates.
    pub diagnostics: usize,
}

/// Objects per simulation model, with the catalogue classes of its code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelCount {
    /// Model code of the objects, when known.
    pub model_code: Option<i32>,
    /// `SIM_MODEL_NAME` as stored.
    pub model_name: String,
    /// Catalogue names for the code.
    pub classes: Vec<String>,
    /// Objects with this model.
    pub objects: usize,
}

/// Counts, provenance and diagnostics of one ingested cadence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CadenceSummary {
    /// Always [`REPORT_SCHEMA`].
    pub schema_version: SchemaVersion,
    /// Where and when the data was read.
    pub provenance: IngestProvenance,
    /// Per-pair counts in path order.
    pub pairs: Vec<PairSummary>,
    /// Distinct objects.
    pub objects: usize,
    /// Observations across all objects.
    pub observations: usize,
    /// Objects per model.
    pub models: Vec<ModelCount>,
    /// Excluded records.
    pub diagnostics: Vec<Diagnostic>,
    /// Abandoned pairs.
    pub failures: Vec<PairFailure>,
}

impl CadenceSummary {
    /// True when nothing was excluded or abandoned.
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty() && self.failures.is_empty()
    }
}

/// Fingerprint of a set of light curves, independent of when it was computed.
pub fn content_hash<'a>(
    curves: impl IntoIterator<Item = &'a LightCurve>,
) -> Result<String, LcError> {
    let curves: Vec<&LightCurve> = curves.into_iter().collect();
    stable_hash_string(&curves)
}

pub(crate) fn count_models<'a>(
    curves: impl IntoIterator<Item = &'a LightCurve>,
    catalog: &ModelCatalog,
) -> Vec<ModelCount> {
    let mut counts: BTreeMap<(Option<i32>, String), usize> = BTreeMap::new();
    for curve in curves {
        let record = curve.record();
        *counts
            .entry((record.model_code, record.model_name.clone()))
            .or_default() += 1;
    }
    counts
        .into_iter()
        .map(|((model_code, model_name), objects)| ModelCount {
            classes: model_code
                .map(|code| catalog.names(code).to_vec())
                .unwrap_or_default(),
            model_code,
            model_name,
            objects,
        })
        .collect()
}

pub(crate) fn provenance(
    data_root: &Path,
    cadence: &str,
    content_hash: String,
) -> IngestProvenance {
    IngestProvenance {
        data_root: data_root.display().to_string(),
        cadence: cadence.to_string(),
        content_hash,
        created_at: Utc::now().to_rfc3339(),
        tool_versions: [("snlc-ingest".to_string(), env!("CARGO_PKG_VERSION").to_string())]
            .into_iter()
            .collect(),
    }
}
