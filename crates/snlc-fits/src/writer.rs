use std::path::Path;

use fitsio::tables::{ColumnDataType, ColumnDescription};
use fitsio::FitsFile;
use log::debug;
use snlc_core::errors::{ErrorInfo, LcError};

use crate::column::ColumnData;
use crate::table::fits_error;

/// Builds a FITS file holding a single binary table extension.
///
/// Integer columns are written as `K`, floating point columns as `D` and text
/// columns as `A` sized to the longest value.
#[derive(Debug, Clone)]
pub struct TableWriter {
    extname: String,
    columns: Vec<(String, ColumnData)>,
}

impl TableWriter {
    /// Starts an empty table with extension name `extname`.
    pub fn new(extname: impl Into<String>) -> Self {
        Self {
            extname: extname.into(),
            columns: Vec::new(),
        }
    }

    /// Appends a column; every column must have the same length.
    pub fn column(mut self, name: impl Into<String>, data: ColumnData) -> Self {
        self.columns.push((name.into(), data));
        self
    }

    /// Rows of the first column.
    pub fn row_count(&self) -> usize {
        self.columns.first().map_or(0, |(_, data)| data.len())
    }

    /// Writes the table, replacing any existing file at `path`.
    pub fn write(&self, path: &Path) -> Result<(), LcError> {
        let rows = self.row_count();
        if let Some((name, data)) = self.columns.iter().find(|(_, data)| data.len() != rows) {
            return Err(LcError::Format(
                ErrorInfo::new(
                    "snlc_fits.write_ragged",
                    format!("column {name} has {} rows, expected {rows}", data.len()),
                )
                .with_path(path),
            ));
        }
        let descriptions = self
            .columns
            .iter()
            .map(|(name, data)| {
                let (typ, repeat) = match data {
                    ColumnData::Int(_) => (ColumnDataType::LongLong, 1),
                    ColumnData::Float(_) => (ColumnDataType::Double, 1),
                    ColumnData::Text(values) => (
                        ColumnDataType::String,
                        values.iter().map(String::len).max().unwrap_or(0).max(1),
                    ),
                };
                ColumnDescription::new(name.as_str())
                    .with_type(typ)
                    .that_repeats(repeat)
                    .create()
                    .map_err(|err| fits_error("snlc_fits.write_column", path, err))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut fits = FitsFile::create(path)
            .overwrite()
            .open()
            .map_err(|err| fits_error("snlc_fits.create", path, err))?;
        let hdu = fits
            .create_table(self.extname.clone(), &descriptions)
            .map_err(|err| fits_error("snlc_fits.create_table", path, err))?;
        if rows == 0 {
            return Ok(());
        }
        for (name, data) in &self.columns {
            let written = match data {
                ColumnData::Int(values) => {
                    hdu.write_col(&mut fits, name.as_str(), values.as_slice())
                }
                ColumnData::Float(values) => {
                    hdu.write_col(&mut fits, name.as_str(), values.as_slice())
                }
                ColumnData::Text(values) => {
                    hdu.write_col(&mut fits, name.as_str(), values.as_slice())
                }
            };
            written.map_err(|err| {
                LcError::Format(
                    ErrorInfo::new("snlc_fits.write", err.to_string())
                        .with_path(path)
                        .with_context("column", name.as_str()),
                )
            })?;
        }
        debug!("wrote {} ({rows} rows)", path.display());
        Ok(())
    }
}
