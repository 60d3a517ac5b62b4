use serde::{Deserialize, Serialize};
use snlc_core::errors::{ErrorInfo, LcError};

/// Storage class of a table column after decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnKind {
    /// Any integer TFORM (`B`, `I`, `J`, `K`), widened to `i64`.
    Int,
    /// `E` or `D`, widened to `f64`.
    Float,
    /// Character column (`A`).
    Text,
}

/// Name and kind of a table column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnInfo {
    /// Column name as stored in `TTYPE`, trimmed.
    pub name: String,
    /// Decoded storage class.
    pub kind: ColumnKind,
    /// Character width for text columns, 1 otherwise.
    pub width: usize,
}

/// Decoded values of one column, or of a row range within it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ColumnData {
    /// Integer values.
    Int(Vec<i64>),
    /// Floating point values.
    Float(Vec<f64>),
    /// Character values with trailing padding removed.
    Text(Vec<String>),
}

/// A single cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    /// Integer cell.
    Int(i64),
    /// Floating point cell.
    Float(f64),
    /// Character cell.
    Text(String),
}

/// One table row, with values in table column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    /// Zero-based row index within the table.
    pub index: usize,
    /// Cells in table column order.
    pub values: Vec<Value>,
}

fn kind_mismatch(name: &str, expected: ColumnKind, found: ColumnKind) -> LcError {
    LcError::Format(
        ErrorInfo::new(
            "snlc_fits.column_kind",
            format!("column {name} holds {found:?} values, expected {expected:?}"),
        )
        .with_context("column", name),
    )
}

impl ColumnData {
    /// Storage class of the values.
    pub fn kind(&self) -> ColumnKind {
        match self {
            ColumnData::Int(_) => ColumnKind::Int,
            ColumnData::Float(_) => ColumnKind::Float,
            ColumnData::Text(_) => ColumnKind::Text,
        }
    }

    /// Number of rows held.
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Int(values) => values.len(),
            ColumnData::Float(values) => values.len(),
            ColumnData::Text(values) => values.len(),
        }
    }

    /// True when no rows are held.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Empty column of the given kind.
    pub fn empty(kind: ColumnKind) -> Self {
        match kind {
            ColumnKind::Int => ColumnData::Int(Vec::new()),
            ColumnKind::Float => ColumnData::Float(Vec::new()),
            ColumnKind::Text => ColumnData::Text(Vec::new()),
        }
    }

    /// Cell at `idx`, `None` past the end.
    pub fn value(&self, idx: usize) -> Option<Value> {
        match self {
            ColumnData::Int(values) => values.get(idx).copied().map(Value::Int),
            ColumnData::Float(values) => values.get(idx).copied().map(Value::Float),
            ColumnData::Text(values) => values.get(idx).cloned().map(Value::Text),
        }
    }

    /// Integer values. Float and text columns are rejected.
    pub fn into_ints(self, name: &str) -> Result<Vec<i64>, LcError> {
        match self {
            ColumnData::Int(values) => Ok(values),
            other => Err(kind_mismatch(name, ColumnKind::Int, other.kind())),
        }
    }

    /// Floating point values; integer columns are widened.
    pub fn into_floats(self, name: &str) -> Result<Vec<f64>, LcError> {
        match self {
            ColumnData::Float(values) => Ok(values),
            ColumnData::Int(values) => Ok(values.into_iter().map(|v| v as f64).collect()),
            other => Err(kind_mismatch(name, ColumnKind::Float, other.kind())),
        }
    }

    /// Text values; numeric columns are rendered with their `Display` form.
    pub fn into_texts(self) -> Vec<String> {
        match self {
            ColumnData::Text(values) => values,
            ColumnData::Int(values) => values.iter().map(ToString::to_string).collect(),
            ColumnData::Float(values) => values.iter().map(ToString::to_string).collect(),
        }
    }

    /// Selects the given indices, in order.
    pub fn select(&self, indices: &[usize]) -> Self {
        match self {
            ColumnData::Int(values) => ColumnData::Int(indices.iter().map(|&i| values[i]).collect()),
            ColumnData::Float(values) => {
                ColumnData::Float(indices.iter().map(|&i| values[i]).collect())
            }
            ColumnData::Text(values) => {
                ColumnData::Text(indices.iter().map(|&i| values[i].clone()).collect())
            }
        }
    }
}

impl Row {
    /// Cell of the column at `position`.
    pub fn get(&self, position: usize) -> Option<&Value> {
        self.values.get(position)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ints_widen_to_floats() {
        let column = ColumnData::Int(vec![1, -2]);
        assert_eq!(column.into_floats("X").unwrap(), vec![1.0, -2.0]);
    }

    #[test]
    fn text_is_not_numeric() {
        let column = ColumnData::Text(vec!["a".into()]);
        let err = column.into_ints("FLT").unwrap_err();
        assert_eq!(err.info().code, "snlc_fits.column_kind");
    }

    #[test]
    fn select_preserves_requested_order() {
        let column = ColumnData::Float(vec![0.5, 1.5, 2.5]);
        assert_eq!(column.select(&[2, 0]), ColumnData::Float(vec![2.5, 0.5]));
    }
}
