//! Provenance and schema descriptors attached to ingestion reports.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Semantic version describing the schema of serialized reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SchemaVersion {
    /// Major version incremented for breaking changes.
    pub major: u32,
    /// Minor version incremented for additive changes.
    pub minor: u32,
    /// Patch version incremented for bug fixes.
    pub patch: u32,
}

impl SchemaVersion {
    /// Creates a new schema version descriptor.
    pub const fn new(major: u32, minor: u32, patch: u32) -> Self {
        Self {
            major,
            minor,
            patch,
        }
    }
}

impl Default for SchemaVersion {
    fn default() -> Self {
        Self::new(1, 0, 0)
    }
}

/// Provenance recorded with every ingestion report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct IngestProvenance {
    /// Root directory the data was read from.
    pub data_root: String,
    /// Cadence name (subdirectory of the root).
    pub cadence: String,
    /// SHA-256 over the canonical JSON of the assembled light curves.
    pub content_hash: String,
    /// RFC 3339 timestamp recording when the report was generated.
    pub created_at: String,
    /// Version map for the tools involved.
    pub tool_versions: BTreeMap<String, String>,
}
