use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use snlc_core::errors::{ErrorInfo, LcError};

use crate::serde::from_yaml_slice;

/// Simulation model codes of the LSST cadence light-curve sets, in the order
/// the data release lists them. Some codes carry more than one class name.
const BUILTIN_MODELS: &[(i32, &str)] = &[
    (11, "SNIa-normal"),
    (2, "SNCC-II"),
    (12, "SNCC-II"),
    (14, "SNCC-II"),
    (14, "SNCC-IIn"),
    (3, "SNCC-Ibc"),
    (13, "SNCC-Ibc"),
    (41, "SNIa-91bg"),
    (43, "SNIa-x"),
    (51, "KN"),
    (60, "SLSN-I"),
    (61, "PISN"),
    (62, "ILOT"),
    (63, "CART"),
    (64, "TDE"),
    (80, "RRlyrae"),
    (81, "Mdwarf"),
    (83, "EBE"),
    (84, "MIRA"),
    (90, "uLens-BSR"),
    (91, "uLens-1STAR"),
    (91, "uLens-String"),
];

/// One catalogue line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelEntry {
    /// Numeric simulation model code.
    pub code: i32,
    /// Class name listed for the code.
    pub name: String,
}

/// Immutable lookup from model code to class names.
///
/// Names keep the order they were listed in and duplicates per code are
/// kept; the catalogue never picks one name over another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelCatalog {
    entries: BTreeMap<i32, Vec<String>>,
}

impl ModelCatalog {
    /// The LSST cadence simulation table.
    pub fn builtin() -> Self {
        Self::from_entries(
            BUILTIN_MODELS
                .iter()
                .map(|(code, name)| ModelEntry {
                    code: *code,
                    name: (*name).to_string(),
                }),
        )
    }

    /// Groups entries by code, keeping their order.
    pub fn from_entries(entries: impl IntoIterator<Item = ModelEntry>) -> Self {
        let mut map: BTreeMap<i32, Vec<String>> = BTreeMap::new();
        for entry in entries {
            map.entry(entry.code).or_default().push(entry.name);
        }
        Self { entries: map }
    }

    /// Parses a YAML list of `{code, name}` entries.
    pub fn from_yaml_slice(data: &[u8]) -> Result<Self, LcError> {
        let entries: Vec<ModelEntry> = from_yaml_slice(data)?;
        Ok(Self::from_entries(entries))
    }

    /// Reads a YAML catalogue file.
    pub fn load(path: &Path) -> Result<Self, LcError> {
        let bytes = fs::read(path).map_err(|err| {
            LcError::NotFound(
                ErrorInfo::new("snlc_ingest.catalog_read", err.to_string()).with_path(path),
            )
        })?;
        Self::from_yaml_slice(&bytes)
    }

    /// Class names listed for `code`; empty for unknown codes.
    pub fn names(&self, code: i32) -> &[String] {
        self.entries.get(&code).map(Vec::as_slice).unwrap_or(&[])
    }

    /// True when `code` has at least one name.
    pub fn contains(&self, code: i32) -> bool {
        self.entries.contains_key(&code)
    }

    /// Codes with their names, in ascending code order.
    pub fn iter(&self) -> impl Iterator<Item = (i32, &[String])> {
        self.entries
            .iter()
            .map(|(code, names)| (*code, names.as_slice()))
    }

    /// Number of distinct codes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the catalogue has no codes.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_keeps_one_to_many_entries() {
        let catalog = ModelCatalog::builtin();
        assert_eq!(catalog.names(11), ["SNIa-normal"]);
        assert_eq!(catalog.names(14), ["SNCC-II", "SNCC-IIn"]);
        assert!(catalog.names(999).is_empty());
    }

    #[test]
    fn yaml_catalogue_preserves_duplicates() {
        let yaml = b"- {code: 5, name: A}\n- {code: 5, name: A}\n- {code: 1, name: B}\n";
        let catalog = ModelCatalog::from_yaml_slice(yaml).expect("yaml");
        assert_eq!(catalog.names(5), ["A", "A"]);
        let codes: Vec<_> = catalog.iter().map(|(code, _)| code).collect();
        assert_eq!(codes, vec![1, 5]);
    }
}
