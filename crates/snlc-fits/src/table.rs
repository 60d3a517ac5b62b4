use std::cell::RefCell;
use std::fmt;
use std::ops::Range;
use std::path::{Path, PathBuf};

use fitsio::hdu::{FitsHdu, HduInfo};
use fitsio::tables::{ColumnDataType, ConcreteColumnDescription};
use fitsio::FitsFile;
use log::debug;
use snlc_core::errors::{ErrorInfo, LcError};

use crate::column::{ColumnData, ColumnInfo, ColumnKind, Row};

/// HDU holding the table in SNANA files; HDU 0 is an empty primary image.
pub const DEFAULT_TABLE_HDU: usize = 1;

pub(crate) fn fits_error(code: &str, path: &Path, err: fitsio::errors::Error) -> LcError {
    LcError::Format(ErrorInfo::new(code, err.to_string()).with_path(path))
}

/// A binary table opened for reading.
///
/// The table owns its FITS handle until it is dropped. Column data is read
/// on demand, so slicing a few rows never loads the full table.
pub struct Table {
    path: PathBuf,
    fits: RefCell<FitsFile>,
    hdu: FitsHdu,
    columns: Vec<ColumnInfo>,
    row_count: usize,
}

impl fmt::Debug for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Table")
            .field("path", &self.path)
            .field("row_count", &self.row_count)
            .field("columns", &self.columns)
            .finish_non_exhaustive()
    }
}

impl Table {
    /// Opens the first extension of a FITS file as a table.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, LcError> {
        Self::open_hdu(path, DEFAULT_TABLE_HDU)
    }

    /// Opens the table stored in HDU `hdu_index`.
    pub fn open_hdu(path: impl AsRef<Path>, hdu_index: usize) -> Result<Self, LcError> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(LcError::NotFound(
                ErrorInfo::new(
                    "snlc_fits.open",
                    format!("table file {} does not exist", path.display()),
                )
                .with_path(path),
            ));
        }
        let mut fits =
            FitsFile::open(path).map_err(|err| fits_error("snlc_fits.open", path, err))?;
        let hdu = fits
            .hdu(hdu_index)
            .map_err(|err| fits_error("snlc_fits.hdu", path, err))?;
        let (columns, row_count) = match &hdu.info {
            HduInfo::TableInfo {
                column_descriptions,
                num_rows,
            } => (describe_columns(path, column_descriptions)?, *num_rows),
            _ => {
                return Err(LcError::Format(
                    ErrorInfo::new(
                        "snlc_fits.not_table",
                        format!("HDU {hdu_index} is not a binary table"),
                    )
                    .with_path(path),
                ))
            }
        };
        debug!(
            "opened {} ({} rows, {} columns)",
            path.display(),
            row_count,
            columns.len()
        );
        Ok(Self {
            path: path.to_path_buf(),
            fits: RefCell::new(fits),
            hdu,
            columns,
            row_count,
        })
    }

    /// File the table was opened from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of rows (`NAXIS2`).
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Column layout in table order.
    pub fn columns(&self) -> &[ColumnInfo] {
        &self.columns
    }

    /// True when a column named `name` exists, ignoring case.
    pub fn has_column(&self, name: &str) -> bool {
        self.column_position(name).is_some()
    }

    /// Position of `name` in table column order. Names compare case-insensitively,
    /// as FITS `TTYPE` keywords do.
    pub fn column_position(&self, name: &str) -> Option<usize> {
        self.columns
            .iter()
            .position(|info| info.name.eq_ignore_ascii_case(name))
    }

    /// Layout of the named column, `ColumnNotFound` when absent.
    pub fn column_info(&self, name: &str) -> Result<&ColumnInfo, LcError> {
        self.column_position(name)
            .map(|pos| &self.columns[pos])
            .ok_or_else(|| {
                LcError::ColumnNotFound(
                    ErrorInfo::new("snlc_fits.column", format!("no column named {name}"))
                        .with_path(&self.path)
                        .with_context("column", name),
                )
            })
    }

    /// Reads a whole column.
    pub fn column(&self, name: &str) -> Result<ColumnData, LcError> {
        self.column_range(name, 0..self.row_count)
    }

    /// Reads rows `range.start..range.end` of a column.
    pub fn column_range(&self, name: &str, range: Range<usize>) -> Result<ColumnData, LcError> {
        let info = self.column_info(name)?;
        self.check_range(&range)?;
        self.read(info, range)
    }

    /// Reads rows `start..end` as row tuples in table column order.
    pub fn row_slice(&self, start: usize, end: usize) -> Result<Vec<Row>, LcError> {
        let range = start..end;
        self.check_range(&range)?;
        let columns = self
            .columns
            .iter()
            .map(|info| self.read(info, range.clone()))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(range
            .enumerate()
            .map(|(offset, index)| Row {
                index,
                values: columns
                    .iter()
                    .filter_map(|column| column.value(offset))
                    .collect(),
            })
            .collect())
    }

    fn check_range(&self, range: &Range<usize>) -> Result<(), LcError> {
        if range.start > range.end || range.end > self.row_count {
            return Err(LcError::Range(
                ErrorInfo::new(
                    "snlc_fits.range",
                    format!(
                        "rows {}..{} outside table of {} rows",
                        range.start, range.end, self.row_count
                    ),
                )
                .with_path(&self.path)
                .with_context("row_count", self.row_count.to_string()),
            ));
        }
        Ok(())
    }

    fn read(&self, info: &ColumnInfo, range: Range<usize>) -> Result<ColumnData, LcError> {
        if range.is_empty() {
            return Ok(ColumnData::empty(info.kind));
        }
        let mut fits = self.fits.borrow_mut();
        let name = info.name.as_str();
        let result = match info.kind {
            ColumnKind::Int => self
                .hdu
                .read_col_range::<i64>(&mut *fits, name, &range)
                .map(ColumnData::Int),
            ColumnKind::Float => self
                .hdu
                .read_col_range::<f64>(&mut *fits, name, &range)
                .map(ColumnData::Float),
            ColumnKind::Text => self
                .hdu
                .read_col_range::<String>(&mut *fits, name, &range)
                .map(|values| {
                    ColumnData::Text(
                        values
                            .into_iter()
                            .map(|value| value.trim_end().to_string())
                            .collect(),
                    )
                }),
        };
        result.map_err(|err| {
            LcError::Format(
                ErrorInfo::new("snlc_fits.read", err.to_string())
                    .with_path(&self.path)
                    .with_context("column", name),
            )
        })
    }
}

fn describe_columns(
    path: &Path,
    descriptions: &[ConcreteColumnDescription],
) -> Result<Vec<ColumnInfo>, LcError> {
    descriptions
        .iter()
        .map(|description| {
            let data_type = &description.data_type;
            let kind = match data_type.typ {
                ColumnDataType::Byte
                | ColumnDataType::SignedByte
                | ColumnDataType::Short
                | ColumnDataType::UnsignedShort
                | ColumnDataType::Int
                | ColumnDataType::Long
                | ColumnDataType::UnsignedLong
                | ColumnDataType::LongLong => ColumnKind::Int,
                ColumnDataType::Float | ColumnDataType::Double => ColumnKind::Float,
                ColumnDataType::String => ColumnKind::Text,
                ref other => {
                    return Err(unsupported(path, &description.name, format!("{other:?}")))
                }
            };
            if kind != ColumnKind::Text && data_type.repeat > 1 {
                return Err(unsupported(
                    path,
                    &description.name,
                    format!("vector of {}", data_type.repeat),
                ));
            }
            let width = match kind {
                ColumnKind::Text => data_type.repeat.max(data_type.width).max(1),
                _ => 1,
            };
            Ok(ColumnInfo {
                name: description.name.trim().to_string(),
                kind,
                width,
            })
        })
        .collect()
}

fn unsupported(path: &Path, column: &str, found: String) -> LcError {
    LcError::Format(
        ErrorInfo::new(
            "snlc_fits.column_type",
            format!("column {column} has unsupported type {found}"),
        )
        .with_path(path)
        .with_context("column", column)
        .with_hint("only scalar integer, floating point and character columns are read"),
    )
}
