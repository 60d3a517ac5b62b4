//! Reads SNANA-format simulated light curves.
//!
//! A cadence directory holds pairs of FITS files: a header table with one
//! row per object and a photometry table with one row per observation. Each
//! header row points at a contiguous span of photometry rows through
//! `PTROBS_MIN` / `PTROBS_MAX`.
//!
//! - [`build_index`] validates the header table into [`HeaderIndex`].
//! - [`assemble_all`] joins each record with its photometry span.
//! - [`discover_pairs`] and [`ingest_pairs`] walk a cadence directory and
//!   ingest every pair on a worker pool.
//! - [`CadenceData`] merges the result into a lookup by object identifier.
//!
//! Structural problems with a file abort that file; problems with a single
//! record exclude the record and are reported as diagnostics.

#![deny(missing_docs)]

/// Light-curve assembly from header spans.
pub mod assemble;
/// YAML ingestion settings.
pub mod config;
/// Light curves of a whole cadence.
pub mod dataset;
/// Header/photometry pair discovery.
pub mod discover;
/// Parallel ingestion of file pairs.
pub mod dispatch;
/// JSON and CSV export.
pub mod export;
/// Canonical hashing helpers.
pub mod hash;
/// Header index builder.
pub mod index;
/// Simulation model catalogue.
pub mod models;
/// Cadence summary reports.
pub mod report;
/// Canonical JSON serde helpers.
pub mod serde;
/// Subset writer.
pub mod subset;
/// Span, flag and ordering predicates.
pub mod validate;

pub use assemble::{
    assemble, assemble_all, assemble_all_with, assemble_with, AssembleOptions, Assembly,
    AssemblyReport, LightCurveIter, PHOTOMETRY_COLUMNS,
};
pub use config::{IndexBase, IngestConfig, DATA_ROOT_ENV};
pub use dataset::CadenceData;
pub use discover::{discover_pairs, FilePair};
pub use dispatch::{ingest_pair, ingest_pairs, PairFailure, PairOutcome, PairReport};
pub use export::{export_csv, export_csv_file, export_json};
pub use hash::stable_hash_string;
pub use index::{build_index, convert_span, HeaderIndex, IndexOptions, HEADER_COLUMNS};
pub use models::{ModelCatalog, ModelEntry};
pub use report::{content_hash, CadenceSummary, ModelCount, PairSummary, REPORT_SCHEMA};
pub use subset::write_subset;
