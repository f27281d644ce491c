//! Per-cell casts and the strict/lenient coercion policy

use crate::batch::{Batch, Cell, Column};
use crate::error::{Error, Result};
use crate::registry::{ColumnType, ColumnTypes};
use crate::temporal::{parse_date, parse_timestamp};
use std::fmt;
use tracing::{debug, info, warn};

/// Largest float that converts to `i64` without overflow
const I64_FLOAT_LIMIT: f64 = 9_223_372_036_854_775_807.0;

/// How cell conversion failures are treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CoercionMode {
    /// Any failure fails the batch
    #[default]
    Strict,
    /// Failures keep the original cell
    Lenient,
}

impl fmt::Display for CoercionMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoercionMode::Strict => write!(f, "strict"),
            CoercionMode::Lenient => write!(f, "lenient"),
        }
    }
}

/// Conform a batch to its write types
///
/// Tries a strict pass first. If any cell fails, the whole batch is coerced
/// again in lenient mode, where unconvertible cells are kept as they were.
pub fn coerce(batch: Batch, target_types: &ColumnTypes) -> Result<Batch> {
    match coerce_with_mode(batch.clone(), target_types, CoercionMode::Strict) {
        Ok(coerced) => Ok(coerced),
        Err(e) => {
            warn!("Strict coercion failed ({}), retrying leniently", e);
            coerce_with_mode(batch, target_types, CoercionMode::Lenient)
        }
    }
}

/// Conform a batch to its write types in one mode
///
/// Columns of `target_types` the batch lacks are added as nulls. Columns
/// without a target type pass through unchanged.
pub fn coerce_with_mode(
    batch: Batch,
    target_types: &ColumnTypes,
    mode: CoercionMode,
) -> Result<Batch> {
    let num_rows = batch.num_rows();
    let mut coerced = batch.clone();

    for (name, target) in target_types {
        let column = match batch.column(name) {
            Some(column) => coerce_column(column, *target, mode)?,
            None => {
                debug!("Adding missing column '{}' as {}", name, target);
                Column::nulls(name.clone(), num_rows)
            }
        };
        coerced = coerced.with_column(column)?;
    }

    info!(
        "Coerced {} rows to {} declared column(s) ({})",
        num_rows,
        target_types.len(),
        mode
    );
    Ok(coerced)
}

/// Convert every cell of a column to `target`
pub fn coerce_column(column: &Column, target: ColumnType, mode: CoercionMode) -> Result<Column> {
    let mut kept = 0usize;
    let mut cells = Vec::with_capacity(column.len());

    for (row, cell) in column.cells.iter().enumerate() {
        match cast_cell(cell, target) {
            Some(converted) => cells.push(converted),
            None if mode == CoercionMode::Lenient => {
                kept += 1;
                cells.push(cell.clone());
            }
            None => {
                return Err(Error::coercion(
                    &column.name,
                    format!("row {row}: cannot convert '{cell}' to {target}"),
                ));
            }
        }
    }

    if kept > 0 {
        warn!(
            "Kept {} unconverted value(s) in column '{}' (declared {})",
            kept, column.name, target
        );
    }

    Ok(Column::new(column.name.clone(), cells))
}

/// Convert one cell, `None` when the value has no representation in `target`
///
/// Nulls stay null for every target.
pub fn cast_cell(cell: &Cell, target: ColumnType) -> Option<Cell> {
    if cell.is_null() {
        return Some(Cell::Null);
    }

    match target {
        ColumnType::Raw => Some(cell.clone()),
        ColumnType::String => Some(match cell {
            Cell::Str(_) => cell.clone(),
            other => Cell::Str(other.to_string()),
        }),
        ColumnType::Int64 => to_int(cell).map(Cell::Int),
        ColumnType::Float64 => to_float(cell).map(Cell::Float),
        ColumnType::Timestamp => to_timestamp(cell),
        ColumnType::Date => to_date(cell),
    }
}

fn to_int(cell: &Cell) -> Option<i64> {
    match cell {
        Cell::Int(i) => Some(*i),
        Cell::Float(f) => integral(*f),
        Cell::Bool(b) => Some(i64::from(*b)),
        Cell::Str(s) => {
            let s = s.trim();
            s.parse::<i64>()
                .ok()
                .or_else(|| s.parse::<f64>().ok().and_then(integral))
        }
        _ => None,
    }
}

/// An integer-valued, in-range float as `i64`
fn integral(f: f64) -> Option<i64> {
    (f.is_finite() && f.fract() == 0.0 && f.abs() < I64_FLOAT_LIMIT).then_some(f as i64)
}

fn to_float(cell: &Cell) -> Option<f64> {
    match cell {
        Cell::Float(f) => Some(*f),
        Cell::Int(i) => Some(*i as f64),
        Cell::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Cell::Str(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

fn to_timestamp(cell: &Cell) -> Option<Cell> {
    match cell {
        Cell::Timestamp(_) => Some(cell.clone()),
        Cell::Date(d) => d.and_hms_opt(0, 0, 0).map(Cell::Timestamp),
        Cell::Str(s) => parse_timestamp(s).map(Cell::Timestamp),
        _ => None,
    }
}

fn to_date(cell: &Cell) -> Option<Cell> {
    match cell {
        Cell::Date(_) => Some(cell.clone()),
        Cell::Timestamp(ts) => Some(Cell::Date(ts.date())),
        Cell::Str(s) => parse_date(s)
            .or_else(|| parse_timestamp(s).map(|ts| ts.date()))
            .map(Cell::Date),
        _ => None,
    }
}
