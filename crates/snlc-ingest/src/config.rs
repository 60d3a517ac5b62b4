use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use snlc_core::errors::{ErrorInfo, LcError};

use crate::index::IndexOptions;
use crate::models::ModelCatalog;
use crate::serde::from_yaml_slice;

/// Environment variable naming the root of the decompressed simulations.
pub const DATA_ROOT_ENV: &str = "CADENCE_SIMS";

/// Convention used by `PTROBS_MIN` / `PTROBS_MAX`.
///
/// The stored value minus [`IndexBase::offset`] is the zero-based row in the
/// photometry table. SNANA writes one-based row numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum IndexBase {
    /// Stored pointers count rows from 1.
    #[default]
    OneBased,
    /// Stored pointers are zero-based rows.
    ZeroBased,
}

impl IndexBase {
    /// Value subtracted from a stored pointer.
    pub const fn offset(self) -> i64 {
        match self {
            IndexBase::OneBased => 1,
            IndexBase::ZeroBased => 0,
        }
    }

    /// Converts a stored row pointer to a zero-based row, `None` when negative.
    pub fn to_zero_based(self, stored: i64) -> Option<usize> {
        stored
            .checked_sub(self.offset())
            .and_then(|row| usize::try_from(row).ok())
    }

    /// Inverse of [`IndexBase::to_zero_based`].
    pub fn to_stored(self, row: usize) -> i64 {
        row as i64 + self.offset()
    }
}

/// YAML-configurable ingestion settings. Every field has a default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestConfig {
    /// Root directory of the simulations; falls back to `CADENCE_SIMS`.
    pub data_root: Option<PathBuf>,
    /// Row pointer convention of the header tables.
    pub index_base: IndexBase,
    /// Prefix joined with the lower-cased band name, e.g. `lsst` + `g`.
    pub filter_prefix: String,
    /// Number of file pairs ingested in parallel.
    pub concurrency: usize,
    /// Compare photometry `SNID` values against the header when present.
    pub check_snid: bool,
    /// Alternative model catalogue (YAML list of `{code, name}`).
    pub model_catalog: Option<PathBuf>,
}

impl Default for IngestConfig {
    fn default() -> Self {
        Self {
            data_root: None,
            index_base: IndexBase::OneBased,
            filter_prefix: "lsst".into(),
            concurrency: 1,
            check_snid: true,
            model_catalog: None,
        }
    }
}

impl IngestConfig {
    /// Loads a YAML configuration file.
    pub fn load(path: &Path) -> Result<Self, LcError> {
        let bytes = fs::read(path).map_err(|err| {
            LcError::NotFound(
                ErrorInfo::new("snlc_ingest.config_read", err.to_string()).with_path(path),
            )
        })?;
        from_yaml_slice(&bytes).map_err(|err| match err {
            LcError::Config(info) => LcError::Config(info.with_path(path)),
            other => other,
        })
    }

    /// Resolves the data root: the explicit setting, else `CADENCE_SIMS`.
    pub fn data_root(&self) -> Result<PathBuf, LcError> {
        if let Some(root) = &self.data_root {
            return Ok(root.clone());
        }
        match env::var_os(DATA_ROOT_ENV) {
            Some(root) if !root.is_empty() => Ok(PathBuf::from(root)),
            _ => Err(LcError::NotFound(
                ErrorInfo::new("snlc_ingest.data_root", "no simulation data root configured")
                    .with_hint(format!(
                        "set {DATA_ROOT_ENV} in the environment or pass an explicit data root"
                    )),
            )),
        }
    }

    /// Index options without a directory model code.
    pub fn index_options(&self) -> IndexOptions {
        IndexOptions {
            index_base: self.index_base,
            model_code: None,
        }
    }

    /// The configured model catalogue, or the built-in one.
    pub fn catalog(&self) -> Result<ModelCatalog, LcError> {
        match &self.model_catalog {
            Some(path) => ModelCatalog::load(path),
            None => Ok(ModelCatalog::builtin()),
        }
    }

    /// Filter names expected by downstream tools, e.g. `lsstu` .. `lssty`.
    pub fn filter_set(&self) -> Vec<String> {
        "ugrizy"
            .chars()
            .map(|band| format!("{}{band}", self.filter_prefix))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_based_pointers_shift_down() {
        assert_eq!(IndexBase::OneBased.to_zero_based(1), Some(0));
        assert_eq!(IndexBase::OneBased.to_zero_based(0), None);
        assert_eq!(IndexBase::ZeroBased.to_zero_based(0), Some(0));
        assert_eq!(IndexBase::OneBased.to_stored(4), 5);
    }

    #[test]
    fn partial_yaml_keeps_defaults() {
        let config: IngestConfig =
            from_yaml_slice(b"index_base: zero-based\nconcurrency: 4\n").expect("yaml");
        assert_eq!(config.index_base, IndexBase::ZeroBased);
        assert_eq!(config.concurrency, 4);
        assert_eq!(config.filter_prefix, "lsst");
        assert!(config.check_snid);
    }

    #[test]
    fn explicit_root_wins() {
        let config = IngestConfig {
            data_root: Some(PathBuf::from("/data/sims")),
            ..IngestConfig::default()
        };
        assert_eq!(config.data_root().unwrap(), PathBuf::from("/data/sims"));
    }

    #[test]
    fn filter_set_uses_prefix() {
        let config = IngestConfig::default();
        assert_eq!(
            config.filter_set(),
            vec!["lsstu", "lsstg", "lsstr", "lssti", "lsstz", "lssty"]
        );
    }
}
