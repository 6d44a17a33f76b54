use std::sync::Arc;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    Number,
    String,
    Boolean,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Number(f64),
    String(Arc<str>),
    Boolean(bool),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    fn fits(&self, column_type: ColumnType) -> bool {
        matches!(
            (self, column_type),
            (Value::Null, _)
                | (Value::Number(_), ColumnType::Number)
                | (Value::String(_), ColumnType::String)
                | (Value::Boolean(_), ColumnType::Boolean)
        )
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(Arc::from(value))
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::Null)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnSpec {
    pub name: String,
    pub column_type: ColumnType,
}

impl ColumnSpec {
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemTableError {
    #[error("row has {actual} values but the table has {expected} columns")]
    RowLength { expected: usize, actual: usize },
    #[error("value does not match {column_type:?} column {column}")]
    TypeMismatch { column: usize, column_type: ColumnType },
    #[error("row {row} out of range (table has {rows} rows)")]
    RowOutOfRange { row: usize, rows: usize },
    #[error("column {column} out of range (table has {columns} columns)")]
    ColumnOutOfRange { column: usize, columns: usize },
}

#[derive(Clone, Debug)]
pub(crate) struct Column {
    pub(crate) spec: ColumnSpec,
    pub(crate) values: Vec<Value>,
}

/// Row-appendable table of typed, nullable columns stored column-major.
#[derive(Clone, Debug, Default)]
pub struct MemTable {
    columns: Vec<Column>,
    rows: usize,
}

impl MemTable {
    pub fn new(schema: Vec<ColumnSpec>) -> Self {
        Self {
            columns: schema
                .into_iter()
                .map(|spec| Column {
                    spec,
                    values: Vec::new(),
                })
                .collect(),
            rows: 0,
        }
    }

    pub fn row_count(&self) -> usize {
        self.rows
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn column_spec(&self, col: usize) -> Option<&ColumnSpec> {
        self.columns.get(col).map(|c| &c.spec)
    }

    pub fn get_cell(&self, row: usize, col: usize) -> Option<&Value> {
        self.columns.get(col)?.values.get(row)
    }

    pub(crate) fn column(&self, col: usize) -> Result<&Column, MemTableError> {
        self.columns
            .get(col)
            .ok_or(MemTableError::ColumnOutOfRange {
                column: col,
                columns: self.columns.len(),
            })
    }

    pub fn append_row(&mut self, row: Vec<Value>) -> Result<(), MemTableError> {
        if row.len() != self.columns.len() {
            return Err(MemTableError::RowLength {
                expected: self.columns.len(),
                actual: row.len(),
            });
        }
        for (idx, (column, value)) in self.columns.iter().zip(row.iter()).enumerate() {
            if !value.fits(column.spec.column_type) {
                return Err(MemTableError::TypeMismatch {
                    column: idx,
                    column_type: column.spec.column_type,
                });
            }
        }

        for (column, value) in self.columns.iter_mut().zip(row) {
            column.values.push(value);
        }
        self.rows += 1;
        Ok(())
    }

    pub fn set_cell(&mut self, row: usize, col: usize, value: Value) -> Result<(), MemTableError> {
        let rows = self.rows;
        let columns = self.columns.len();
        let column = self
            .columns
            .get_mut(col)
            .ok_or(MemTableError::ColumnOutOfRange {
                column: col,
                columns,
            })?;
        if !value.fits(column.spec.column_type) {
            return Err(MemTableError::TypeMismatch {
                column: col,
                column_type: column.spec.column_type,
            });
        }
        let slot = column
            .values
            .get_mut(row)
            .ok_or(MemTableError::RowOutOfRange { row, rows })?;
        *slot = value;
        Ok(())
    }

    /// Append a column, filling existing rows with `fill`.
    pub fn add_column(&mut self, spec: ColumnSpec, fill: Value) -> Result<(), MemTableError> {
        if !fill.fits(spec.column_type) {
            return Err(MemTableError::TypeMismatch {
                column: self.columns.len(),
                column_type: spec.column_type,
            });
        }
        self.columns.push(Column {
            spec,
            values: vec![fill; self.rows],
        });
        Ok(())
    }
}
