use std::fs;
use std::path::Path;

use log::info;
use snlc_core::errors::{ErrorInfo, LcError};
use snlc_fits::{ColumnData, Table, TableWriter};

use crate::config::IndexBase;
use crate::discover::FilePair;
use crate::index::{build_index, IndexOptions};

const HEADER_EXTNAME: &str = "HEADER";
const PHOTOMETRY_EXTNAME: &str = "PHOTOMETRY";

/// Copies the chosen objects into a smaller header/photometry pair under
/// `out_dir`, keeping file names and every column.
///
/// Objects are written in the order of `snids`; their photometry is packed
/// contiguously and `PTROBS_MIN` / `PTROBS_MAX` are rewritten in
/// `index_base` to point at the new rows.
pub fn write_subset(
    header: &Table,
    photometry: &Table,
    snids: &[i64],
    out_dir: &Path,
    index_base: IndexBase,
) -> Result<FilePair, LcError> {
    let index = build_index(
        header,
        &IndexOptions {
            index_base,
            model_code: None,
        },
    )?;

    let mut header_rows = Vec::with_capacity(snids.len());
    let mut photometry_rows = Vec::new();
    let mut ptr_min = Vec::with_capacity(snids.len());
    let mut ptr_max = Vec::with_capacity(snids.len());
    for &snid in snids {
        let Some((row, record)) = index.entries().find(|(_, record)| record.snid == snid) else {
            return Err(LcError::NotFound(
                ErrorInfo::new("snlc_ingest.subset_snid", format!("SNID {snid} is not indexed"))
                    .with_path(header.path())
                    .with_context("snid", snid.to_string()),
            ));
        };
        if record.span_end >= photometry.row_count() {
            return Err(LcError::Range(
                ErrorInfo::new(
                    "snlc_ingest.span_range",
                    format!(
                        "span {}..={} exceeds {} photometry rows",
                        record.span_start,
                        record.span_end,
                        photometry.row_count()
                    ),
                )
                .with_path(photometry.path())
                .with_context("snid", snid.to_string()),
            ));
        }
        header_rows.push(row);
        ptr_min.push(index_base.to_stored(photometry_rows.len()));
        photometry_rows.extend(record.span_start..=record.span_end);
        ptr_max.push(index_base.to_stored(photometry_rows.len() - 1));
    }

    fs::create_dir_all(out_dir).map_err(|err| {
        LcError::NotFound(
            ErrorInfo::new("snlc_ingest.subset_dir", err.to_string()).with_path(out_dir),
        )
    })?;

    let mut header_writer = TableWriter::new(HEADER_EXTNAME);
    for info in header.columns() {
        let data = if info.name.eq_ignore_ascii_case("PTROBS_MIN") {
            ColumnData::Int(ptr_min.clone())
        } else if info.name.eq_ignore_ascii_case("PTROBS_MAX") {
            ColumnData::Int(ptr_max.clone())
        } else {
            header.column(&info.name)?.select(&header_rows)
        };
        header_writer = header_writer.column(info.name.as_str(), data);
    }
    let mut photometry_writer = TableWriter::new(PHOTOMETRY_EXTNAME);
    for info in photometry.columns() {
        let data = photometry.column(&info.name)?.select(&photometry_rows);
        photometry_writer = photometry_writer.column(info.name.as_str(), data);
    }

    let pair = FilePair::from_header(out_dir.join(file_name(header.path())?));
    let photometry_path = out_dir.join(file_name(photometry.path())?);
    header_writer.write(&pair.header)?;
    photometry_writer.write(&photometry_path)?;
    info!(
        "wrote subset of {} objects ({} observations) to {}",
        snids.len(),
        photometry_rows.len(),
        out_dir.display()
    );
    Ok(FilePair {
        photometry: photometry_path,
        ..pair
    })
}

fn file_name(path: &Path) -> Result<&std::ffi::OsStr, LcError> {
    path.file_name().ok_or_else(|| {
        LcError::NotFound(
            ErrorInfo::new("snlc_ingest.file_name", "path has no file name").with_path(path),
        )
    })
}
