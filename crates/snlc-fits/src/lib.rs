//! Record table access for SNANA FITS files.
//!
//! [`Table`] reads one binary table extension lazily: opening parses only
//! the header, and [`Table::column_range`] / [`Table::row_slice`] read just
//! the requested rows. [`TableWriter`] produces files the reader accepts.

#![deny(missing_docs)]

mod column;
mod table;
mod writer;

pub use column::{ColumnData, ColumnInfo, ColumnKind, Row, Value};
pub use table::{Table, DEFAULT_TABLE_HDU};
pub use writer::TableWriter;
