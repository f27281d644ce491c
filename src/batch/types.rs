//! Batch, column and cell types

use crate::error::{Error, Result};
use chrono::{NaiveDate, NaiveDateTime};
use serde_json::Value;
use std::collections::HashSet;
use std::fmt;

/// Format used when a timestamp cell is rendered as text
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format used when a date cell is rendered as text
pub const DATE_FORMAT: &str = "%Y-%m-%d";

// ============================================================================
// Cell
// ============================================================================

/// A single scalar value
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    /// Missing value
    #[default]
    Null,
    /// Text
    Str(String),
    /// 64-bit signed integer
    Int(i64),
    /// 64-bit float
    Float(f64),
    /// Boolean
    Bool(bool),
    /// Calendar date
    Date(NaiveDate),
    /// Date and time without zone
    Timestamp(NaiveDateTime),
}

/// Kind of a cell, used to derive a column's storage type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Null,
    Str,
    Int,
    Float,
    Bool,
    Date,
    Timestamp,
}

impl CellKind {
    /// Merge two kinds into one that can hold both
    pub fn merge(self, other: CellKind) -> CellKind {
        match (self, other) {
            (a, b) if a == b => a,
            (CellKind::Null, other) | (other, CellKind::Null) => other,
            (CellKind::Int, CellKind::Float) | (CellKind::Float, CellKind::Int) => {
                CellKind::Float
            }
            (CellKind::Date, CellKind::Timestamp) | (CellKind::Timestamp, CellKind::Date) => {
                CellKind::Timestamp
            }
            // Anything else falls back to text
            _ => CellKind::Str,
        }
    }
}

impl Cell {
    /// Create a text cell
    pub fn str(value: impl Into<String>) -> Self {
        Cell::Str(value.into())
    }

    /// Check if the cell is null
    pub fn is_null(&self) -> bool {
        matches!(self, Cell::Null)
    }

    /// Get the text value, if this is a text cell
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Cell::Str(s) => Some(s),
            _ => None,
        }
    }

    /// Get the kind of this cell
    pub fn kind(&self) -> CellKind {
        match self {
            Cell::Null => CellKind::Null,
            Cell::Str(_) => CellKind::Str,
            Cell::Int(_) => CellKind::Int,
            Cell::Float(_) => CellKind::Float,
            Cell::Bool(_) => CellKind::Bool,
            Cell::Date(_) => CellKind::Date,
            Cell::Timestamp(_) => CellKind::Timestamp,
        }
    }

    /// Convert a JSON scalar into a cell
    ///
    /// Arrays and objects are kept as their compact JSON text.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => Cell::Null,
            Value::Bool(b) => Cell::Bool(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => Cell::Int(i),
                None => n.as_f64().map_or(Cell::Null, Cell::Float),
            },
            Value::String(s) => Cell::Str(s.clone()),
            Value::Array(_) | Value::Object(_) => Cell::Str(value.to_string()),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => Ok(()),
            Cell::Str(s) => write!(f, "{s}"),
            Cell::Int(i) => write!(f, "{i}"),
            Cell::Float(v) => write!(f, "{v}"),
            Cell::Bool(b) => write!(f, "{b}"),
            Cell::Date(d) => write!(f, "{}", d.format(DATE_FORMAT)),
            Cell::Timestamp(ts) => write!(f, "{}", ts.format(TIMESTAMP_FORMAT)),
        }
    }
}

impl From<&str> for Cell {
    fn from(value: &str) -> Self {
        Cell::Str(value.to_string())
    }
}

impl From<String> for Cell {
    fn from(value: String) -> Self {
        Cell::Str(value)
    }
}

impl From<i64> for Cell {
    fn from(value: i64) -> Self {
        Cell::Int(value)
    }
}

impl From<f64> for Cell {
    fn from(value: f64) -> Self {
        Cell::Float(value)
    }
}

impl From<NaiveDate> for Cell {
    fn from(value: NaiveDate) -> Self {
        Cell::Date(value)
    }
}

impl From<NaiveDateTime> for Cell {
    fn from(value: NaiveDateTime) -> Self {
        Cell::Timestamp(value)
    }
}

impl<T: Into<Cell>> From<Option<T>> for Cell {
    fn from(value: Option<T>) -> Self {
        value.map_or(Cell::Null, Into::into)
    }
}

// ============================================================================
// Column
// ============================================================================

/// A named sequence of cells
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    /// Column name
    pub name: String,
    /// Cell values, one per row
    pub cells: Vec<Cell>,
}

impl Column {
    /// Create a new column
    pub fn new(name: impl Into<String>, cells: Vec<Cell>) -> Self {
        Self {
            name: name.into(),
            cells,
        }
    }

    /// Create a column holding `value` in every one of `len` rows
    pub fn repeat(name: impl Into<String>, value: &Cell, len: usize) -> Self {
        Self::new(name, vec![value.clone(); len])
    }

    /// Create an all-null column
    pub fn nulls(name: impl Into<String>, len: usize) -> Self {
        Self::repeat(name, &Cell::Null, len)
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Check if the column has no cells
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Check if every cell is null (true for an empty column)
    pub fn is_all_null(&self) -> bool {
        self.cells.iter().all(Cell::is_null)
    }

    /// Kind that can hold every cell of this column
    pub fn kind(&self) -> CellKind {
        self.cells
            .iter()
            .fold(CellKind::Null, |acc, cell| acc.merge(cell.kind()))
    }
}

// ============================================================================
// Batch
// ============================================================================

/// An ordered collection of equal-length columns
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Batch {
    columns: Vec<Column>,
    num_rows: usize,
}

impl Batch {
    /// Create an empty batch (no columns, no rows)
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a batch without columns but with a row count
    pub fn with_row_count(num_rows: usize) -> Self {
        Self {
            columns: Vec::new(),
            num_rows,
        }
    }

    /// Build a batch from columns, checking lengths and name uniqueness
    pub fn from_columns(columns: Vec<Column>) -> Result<Self> {
        let num_rows = columns.first().map_or(0, Column::len);

        let mut seen = HashSet::new();
        for column in &columns {
            if column.len() != num_rows {
                return Err(Error::shape(format!(
                    "column '{}' has {} rows, expected {num_rows}",
                    column.name,
                    column.len()
                )));
            }
            if !seen.insert(column.name.as_str()) {
                return Err(Error::shape(format!(
                    "duplicate column '{}'",
                    column.name
                )));
            }
        }

        Ok(Self { columns, num_rows })
    }

    /// Number of rows
    pub fn num_rows(&self) -> usize {
        self.num_rows
    }

    /// Number of columns
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Check if the batch has no rows
    pub fn is_empty(&self) -> bool {
        self.num_rows == 0
    }

    /// All columns in order
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column names in order
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Look up a column by name
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    /// Check if a column exists
    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Get a single cell
    pub fn cell(&self, column: &str, row: usize) -> Option<&Cell> {
        self.column(column).and_then(|c| c.cells.get(row))
    }

    /// Add a column, or replace an existing one of the same name in place
    pub fn with_column(mut self, column: Column) -> Result<Self> {
        if self.columns.is_empty() && self.num_rows == 0 {
            self.num_rows = column.len();
        } else if column.len() != self.num_rows {
            return Err(Error::shape(format!(
                "column '{}' has {} rows, batch has {}",
                column.name,
                column.len(),
                self.num_rows
            )));
        }

        self.put_column(column);
        Ok(self)
    }

    /// Add a column holding the same value in every row
    #[must_use]
    pub fn with_constant(mut self, name: impl Into<String>, value: &Cell) -> Self {
        let column = Column::repeat(name, value, self.num_rows);
        self.put_column(column);
        self
    }

    fn put_column(&mut self, column: Column) {
        match self.columns.iter_mut().find(|c| c.name == column.name) {
            Some(existing) => *existing = column,
            None => self.columns.push(column),
        }
    }

    /// Remove a column if present
    #[must_use]
    pub fn without_column(mut self, name: &str) -> Self {
        self.columns.retain(|c| c.name != name);
        self
    }

    /// Positionally join another batch's columns onto this one
    ///
    /// Row `i` of `other` lands on row `i` of `self`. Columns of `other`
    /// with a name already present replace the existing column.
    pub fn hconcat(self, other: Batch) -> Result<Self> {
        if other.num_rows != self.num_rows && other.num_columns() > 0 {
            return Err(Error::shape(format!(
                "cannot join {} rows onto {} rows",
                other.num_rows, self.num_rows
            )));
        }
        other
            .columns
            .into_iter()
            .try_fold(self, Batch::with_column)
    }

    /// Stack batches vertically
    ///
    /// The result has the union of all column names in first-appearance
    /// order; cells for columns a batch lacks are null.
    pub fn vconcat(batches: Vec<Batch>) -> Result<Self> {
        let mut names: Vec<String> = Vec::new();
        for batch in &batches {
            for column in &batch.columns {
                if !names.contains(&column.name) {
                    names.push(column.name.clone());
                }
            }
        }

        let mut columns: Vec<Column> = names
            .iter()
            .map(|name| Column::new(name.clone(), Vec::new()))
            .collect();
        let mut num_rows = 0;

        for batch in batches {
            for column in &mut columns {
                match batch.column(&column.name) {
                    Some(source) => column.cells.extend(source.cells.iter().cloned()),
                    None => column
                        .cells
                        .extend(std::iter::repeat(Cell::Null).take(batch.num_rows)),
                }
            }
            num_rows += batch.num_rows;
        }

        Ok(Self { columns, num_rows })
    }

    /// Apply `f` to the named column, producing a new batch
    pub fn map_column<F>(self, name: &str, f: F) -> Result<Self>
    where
        F: FnOnce(&Column) -> Result<Column>,
    {
        let column = self
            .column(name)
            .ok_or_else(|| Error::shape(format!("missing column '{name}'")))?;
        let mapped = f(column)?;
        self.with_column(mapped)
    }
}
