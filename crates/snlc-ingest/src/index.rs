use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use log::{debug, warn};
use snlc_core::errors::{Diagnostic, ErrorInfo, LcError};
use snlc_core::ObjectRecord;
use snlc_fits::{ColumnData, Table};

use crate::config::IndexBase;

/// Columns every header table must carry.
pub const HEADER_COLUMNS: [&str; 7] = [
    "SNID",
    "RA",
    "DECL",
    "MWEBV",
    "PTROBS_MIN",
    "PTROBS_MAX",
    "SIM_MODEL_NAME",
];

const MODEL_INDEX_COLUMN: &str = "SIM_MODEL_INDEX";
const REDSHIFT_COLUMN: &str = "SIM_REDSHIFT_CMB";

/// Options for [`build_index`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IndexOptions {
    /// Convention of `PTROBS_MIN` / `PTROBS_MAX`.
    pub index_base: IndexBase,
    /// Model code applied when the table has no `SIM_MODEL_INDEX` column,
    /// usually derived from the `MODEL<nn>` directory name.
    pub model_code: Option<i32>,
}

/// Validated header records in table order, with the rows that were excluded.
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderIndex {
    source: PathBuf,
    records: Vec<ObjectRecord>,
    rows: Vec<usize>,
    diagnostics: Vec<Diagnostic>,
}

impl HeaderIndex {
    /// Header table the index was built from.
    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Accepted records in table order.
    pub fn records(&self) -> &[ObjectRecord] {
        &self.records
    }

    /// Accepted records paired with their zero-based header row.
    pub fn entries(&self) -> impl Iterator<Item = (usize, &ObjectRecord)> {
        self.rows.iter().copied().zip(self.records.iter())
    }

    /// Rows left out of the index.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Number of accepted records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// True when no record was accepted.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Record of one object.
    pub fn get(&self, snid: i64) -> Option<&ObjectRecord> {
        self.records.iter().find(|record| record.snid == snid)
    }
}

/// Decodes object identifiers stored either as integers or as text.
pub(crate) fn decode_ids(column: ColumnData) -> Vec<Option<i64>> {
    match column {
        ColumnData::Int(values) => values.into_iter().map(Some).collect(),
        ColumnData::Float(values) => values
            .into_iter()
            .map(|value| (value.fract() == 0.0).then_some(value as i64))
            .collect(),
        ColumnData::Text(values) => values
            .iter()
            .map(|value| value.trim().parse::<i64>().ok())
            .collect(),
    }
}

/// Reads every header row into an [`ObjectRecord`].
///
/// A missing required column fails the whole table with `Schema`. Inverted
/// or negative spans, unreadable identifiers and duplicate identifiers are
/// reported per row and the row is left out of the index. A duplicate is a
/// row whose identifier was already accepted from an earlier row.
pub fn build_index(table: &Table, opts: &IndexOptions) -> Result<HeaderIndex, LcError> {
    let missing: Vec<&str> = HEADER_COLUMNS
        .iter()
        .copied()
        .filter(|name| !table.has_column(name))
        .collect();
    if !missing.is_empty() {
        return Err(LcError::Schema(
            ErrorInfo::new(
                "snlc_ingest.header_schema",
                format!("header table is missing {}", missing.join(", ")),
            )
            .with_path(table.path())
            .with_context("missing", missing.join(",")),
        ));
    }

    let snids = decode_ids(table.column("SNID")?);
    let ra = table.column("RA")?.into_floats("RA")?;
    let decl = table.column("DECL")?.into_floats("DECL")?;
    let mwebv = table.column("MWEBV")?.into_floats("MWEBV")?;
    let ptr_min = table.column("PTROBS_MIN")?.into_ints("PTROBS_MIN")?;
    let ptr_max = table.column("PTROBS_MAX")?.into_ints("PTROBS_MAX")?;
    let model_names = table.column("SIM_MODEL_NAME")?.into_texts();
    let model_codes = if table.has_column(MODEL_INDEX_COLUMN) {
        Some(table.column(MODEL_INDEX_COLUMN)?.into_ints(MODEL_INDEX_COLUMN)?)
    } else {
        None
    };
    let redshifts = if table.has_column(REDSHIFT_COLUMN) {
        Some(table.column(REDSHIFT_COLUMN)?.into_floats(REDSHIFT_COLUMN)?)
    } else {
        None
    };

    let mut seen = BTreeSet::new();
    let mut records = Vec::with_capacity(table.row_count());
    let mut rows = Vec::with_capacity(table.row_count());
    let mut diagnostics = Vec::new();
    for row in 0..table.row_count() {
        let reject = |error: LcError| {
            Diagnostic::new(error)
                .with_source(table.path())
                .with_row(row)
        };
        let Some(snid) = snids[row] else {
            diagnostics.push(reject(invalid(
                "snlc_ingest.snid",
                format!("header row {row} has an unreadable SNID"),
            )));
            continue;
        };
        let span = match convert_span(ptr_min[row], ptr_max[row], opts.index_base) {
            Ok(span) => span,
            Err(error) => {
                diagnostics.push(reject(error).with_snid(snid));
                continue;
            }
        };
        // only accepted rows claim an identifier
        if !seen.insert(snid) {
            diagnostics.push(
                reject(invalid(
                    "snlc_ingest.duplicate_snid",
                    format!("SNID {snid} appears more than once"),
                ))
                .with_snid(snid),
            );
            continue;
        }
        let model_code = match &model_codes {
            Some(codes) => i32::try_from(codes[row]).ok(),
            None => opts.model_code,
        };
        records.push(ObjectRecord {
            snid,
            ra: ra[row],
            decl: decl[row],
            mwebv: mwebv[row],
            model_code,
            model_name: model_names[row].trim().to_string(),
            redshift: redshifts.as_ref().map(|values| values[row]),
            span_start: span.0,
            span_end: span.1,
        });
        rows.push(row);
    }

    for diagnostic in &diagnostics {
        warn!("excluded header record: {diagnostic}");
    }
    debug!(
        "indexed {}: {} records, {} excluded",
        table.path().display(),
        records.len(),
        diagnostics.len()
    );
    Ok(HeaderIndex {
        source: table.path().to_path_buf(),
        records,
        rows,
        diagnostics,
    })
}

fn invalid(code: &str, message: String) -> LcError {
    LcError::Validation(ErrorInfo::new(code, message))
}

/// Converts stored `PTROBS_MIN` / `PTROBS_MAX` to a zero-based inclusive span.
pub fn convert_span(min: i64, max: i64, base: IndexBase) -> Result<(usize, usize), LcError> {
    let with_pointers = |info: ErrorInfo| {
        info.with_context("ptrobs_min", min.to_string())
            .with_context("ptrobs_max", max.to_string())
    };
    let (Some(start), Some(end)) = (base.to_zero_based(min), base.to_zero_based(max)) else {
        return Err(LcError::Validation(with_pointers(ErrorInfo::new(
            "snlc_ingest.negative_span",
            format!("span {min}..{max} is negative after {base:?} conversion"),
        ))));
    };
    if start > end {
        return Err(LcError::Validation(with_pointers(ErrorInfo::new(
            "snlc_ingest.inverted_span",
            format!("span {min}..{max} is inverted"),
        ))));
    }
    Ok((start, end))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn one_based_span_converts_inclusive() {
        assert_eq!(convert_span(1, 3, IndexBase::OneBased).unwrap(), (0, 2));
        assert_eq!(convert_span(4, 4, IndexBase::OneBased).unwrap(), (3, 3));
        assert_eq!(convert_span(0, 2, IndexBase::ZeroBased).unwrap(), (0, 2));
    }

    #[test]
    fn inverted_and_negative_spans_fail_validation() {
        let inverted = convert_span(5, 2, IndexBase::OneBased).unwrap_err();
        assert_eq!(inverted.info().code, "snlc_ingest.inverted_span");
        let negative = convert_span(0, 2, IndexBase::OneBased).unwrap_err();
        assert_eq!(negative.info().code, "snlc_ingest.negative_span");
        assert!(negative.is_record_level());
    }

    #[test]
    fn text_ids_are_parsed() {
        let ids = decode_ids(ColumnData::Text(vec![" 100".into(), "abc".into()]));
        assert_eq!(ids, vec![Some(100), None]);
    }
}
