//! Structured error types shared across SNLC crates.

use std::collections::BTreeMap;
use std::fmt::{self, Display};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Structured payload attached to every [`LcError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable machine readable error code.
    pub code: String,
    /// Human readable diagnostic message.
    pub message: String,
    /// Contextual key value pairs (paths, column names, row indices, etc.).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Optional hint that may help the caller resolve the issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Creates a new error payload with the provided code and message.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry to the payload.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Adds a `path` context entry rendered with [`Path::display`].
    pub fn with_path(self, path: &Path) -> Self {
        self.with_context("path", path.display().to_string())
    }

    /// Sets a human readable hint for remediation.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

/// Canonical error type for light-curve ingestion.
///
/// `NotFound`, `Format` and `Schema` are file-level: they abort the file
/// pair being processed. `Range` and `Validation` are record-level: the
/// offending record is excluded and reported as a [`Diagnostic`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum LcError {
    /// A file or directory does not exist.
    #[error("not found: {0}")]
    NotFound(ErrorInfo),
    /// A file is not a well formed binary table.
    #[error("format error: {0}")]
    Format(ErrorInfo),
    /// A table lacks one or more required columns.
    #[error("schema error: {0}")]
    Schema(ErrorInfo),
    /// A single named column is absent.
    #[error("column not found: {0}")]
    ColumnNotFound(ErrorInfo),
    /// A row index or span lies outside a table.
    #[error("range error: {0}")]
    Range(ErrorInfo),
    /// A structurally readable record is semantically invalid.
    #[error("validation error: {0}")]
    Validation(ErrorInfo),
    /// Configuration could not be resolved or parsed.
    #[error("config error: {0}")]
    Config(ErrorInfo),
    /// Serialization and export errors.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (code: {})", self.message, self.code)?;
        if !self.context.is_empty() {
            write!(f, " | context: [")?;
            for (idx, (key, value)) in self.context.iter().enumerate() {
                if idx > 0 {
                    write!(f, ", ")?;
                }
                write!(f, "{key}={value}")?;
            }
            write!(f, "]")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, " | hint: {hint}")?;
        }
        Ok(())
    }
}

impl LcError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            LcError::NotFound(info)
            | LcError::Format(info)
            | LcError::Schema(info)
            | LcError::ColumnNotFound(info)
            | LcError::Range(info)
            | LcError::Validation(info)
            | LcError::Config(info)
            | LcError::Serde(info) => info,
        }
    }

    /// Returns the variant name, used when summarising diagnostics.
    pub fn family(&self) -> &'static str {
        match self {
            LcError::NotFound(_) => "not_found",
            LcError::Format(_) => "format",
            LcError::Schema(_) => "schema",
            LcError::ColumnNotFound(_) => "column_not_found",
            LcError::Range(_) => "range",
            LcError::Validation(_) => "validation",
            LcError::Config(_) => "config",
            LcError::Serde(_) => "serde",
        }
    }

    /// True for errors that abort a whole file pair.
    pub fn is_file_level(&self) -> bool {
        matches!(
            self,
            LcError::NotFound(_) | LcError::Format(_) | LcError::Schema(_)
        )
    }

    /// True for errors that exclude a single record and let processing continue.
    pub fn is_record_level(&self) -> bool {
        matches!(self, LcError::Range(_) | LcError::Validation(_))
    }
}

/// A record excluded from the output, reported alongside the successful results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// File the record was read from, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<PathBuf>,
    /// Object identifier of the excluded record, when it could be read.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snid: Option<i64>,
    /// Zero-based header row of the excluded record.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row: Option<usize>,
    /// Reason for the exclusion.
    pub error: LcError,
}

impl Diagnostic {
    /// Creates a diagnostic carrying only the error.
    pub fn new(error: LcError) -> Self {
        Self {
            source: None,
            snid: None,
            row: None,
            error,
        }
    }

    /// Attaches the object identifier.
    pub fn with_snid(mut self, snid: i64) -> Self {
        self.snid = Some(snid);
        self
    }

    /// Attaches the zero-based header row.
    pub fn with_row(mut self, row: usize) -> Self {
        self.row = Some(row);
        self
    }

    /// Attaches the source file path.
    pub fn with_source(mut self, source: impl Into<PathBuf>) -> Self {
        self.source = Some(source.into());
        self
    }
}

impl Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(source) = &self.source {
            write!(f, "{}: ", source.display())?;
        }
        if let Some(snid) = self.snid {
            write!(f, "snid {snid}: ")?;
        }
        if let Some(row) = self.row {
            write!(f, "row {row}: ")?;
        }
        write!(f, "{}", self.error)
    }
}
