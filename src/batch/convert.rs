//! Conversion between batches and Arrow RecordBatches
//!
//! A column's storage type comes from its declared output type when the
//! cells fit it, and is otherwise derived from the cells the column holds.

use super::types::{Batch, Cell, CellKind, Column};
use crate::error::{Error, Result};
use crate::registry::{ColumnType, ColumnTypes};
use arrow::array::{
    Array, ArrayRef, BooleanArray, Date32Array, Float64Array, Int64Array, LargeStringArray,
    StringArray, TimestampNanosecondArray,
};
use arrow::datatypes::{DataType, Field, Schema, TimeUnit};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime};
use std::sync::Arc;

/// Days from 0001-01-01 (CE) to 1970-01-01
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

/// Arrow type able to hold every cell of `column`
///
/// All-null columns become nullable text.
pub fn arrow_type_for(column: &Column) -> DataType {
    match column.kind() {
        CellKind::Null | CellKind::Str => DataType::Utf8,
        CellKind::Int => DataType::Int64,
        CellKind::Float => DataType::Float64,
        CellKind::Bool => DataType::Boolean,
        CellKind::Date => DataType::Date32,
        CellKind::Timestamp => DataType::Timestamp(TimeUnit::Nanosecond, None),
    }
}

/// Arrow type of a declared column type
///
/// `None` for `raw`, which is stored as whatever its cells hold.
pub fn declared_arrow_type(column_type: ColumnType) -> Option<DataType> {
    match column_type {
        ColumnType::String => Some(DataType::Utf8),
        ColumnType::Int64 => Some(DataType::Int64),
        ColumnType::Float64 => Some(DataType::Float64),
        ColumnType::Date => Some(DataType::Date32),
        ColumnType::Timestamp => Some(DataType::Timestamp(TimeUnit::Nanosecond, None)),
        ColumnType::Raw => None,
    }
}

/// Whether cells of `kind` can be stored as `data_type`
fn fits(kind: CellKind, data_type: &DataType) -> bool {
    match (kind, data_type) {
        (CellKind::Null, _) | (_, DataType::Utf8) => true,
        (CellKind::Int, DataType::Int64)
        | (CellKind::Int | CellKind::Float, DataType::Float64)
        | (CellKind::Date, DataType::Date32)
        | (CellKind::Date | CellKind::Timestamp, DataType::Timestamp(..)) => true,
        _ => false,
    }
}

/// Storage type of `column` given its declared type, if any
fn storage_type(column: &Column, declared: Option<ColumnType>) -> DataType {
    let kind = column.kind();
    match declared.and_then(declared_arrow_type) {
        Some(data_type) if fits(kind, &data_type) => data_type,
        _ => arrow_type_for(column),
    }
}

/// Convert a batch into an Arrow RecordBatch, typing columns by their cells
pub fn to_record_batch(batch: &Batch) -> Result<RecordBatch> {
    to_record_batch_with_types(batch, &ColumnTypes::new())
}

/// Convert a batch into an Arrow RecordBatch
///
/// Columns in `types` are stored as their declared type, including all-null
/// ones. A declared column holding cells that do not fit (kept by lenient
/// coercion) falls back to the type its cells require.
pub fn to_record_batch_with_types(batch: &Batch, types: &ColumnTypes) -> Result<RecordBatch> {
    let mut fields = Vec::with_capacity(batch.num_columns());
    let mut arrays: Vec<ArrayRef> = Vec::with_capacity(batch.num_columns());

    for column in batch.columns() {
        let data_type = storage_type(column, types.get(&column.name).copied());
        arrays.push(build_array(&column.cells, &data_type)?);
        fields.push(Field::new(&column.name, data_type, true));
    }

    let options = RecordBatchOptions::new().with_row_count(Some(batch.num_rows()));
    RecordBatch::try_new_with_options(Arc::new(Schema::new(fields)), arrays, &options)
        .map_err(Error::from)
}

/// Build an Arrow array of `data_type` from cells
fn build_array(cells: &[Cell], data_type: &DataType) -> Result<ArrayRef> {
    match data_type {
        DataType::Int64 => {
            let arr: Int64Array = cells
                .iter()
                .map(|c| match c {
                    Cell::Int(i) => Some(*i),
                    _ => None,
                })
                .collect();
            Ok(Arc::new(arr))
        }

        DataType::Float64 => {
            #[allow(clippy::cast_precision_loss)]
            let arr: Float64Array = cells
                .iter()
                .map(|c| match c {
                    Cell::Float(v) => Some(*v),
                    Cell::Int(i) => Some(*i as f64),
                    _ => None,
                })
                .collect();
            Ok(Arc::new(arr))
        }

        DataType::Boolean => {
            let arr: BooleanArray = cells
                .iter()
                .map(|c| match c {
                    Cell::Bool(b) => Some(*b),
                    _ => None,
                })
                .collect();
            Ok(Arc::new(arr))
        }

        DataType::Date32 => {
            let arr: Date32Array = cells
                .iter()
                .map(|c| match c {
                    Cell::Date(d) => Some(d.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE),
                    _ => None,
                })
                .collect();
            Ok(Arc::new(arr))
        }

        DataType::Timestamp(TimeUnit::Nanosecond, None) => {
            let arr: TimestampNanosecondArray = cells
                .iter()
                .map(|c| match c {
                    Cell::Timestamp(ts) => ts.and_utc().timestamp_nanos_opt(),
                    Cell::Date(d) => d
                        .and_hms_opt(0, 0, 0)
                        .and_then(|ts| ts.and_utc().timestamp_nanos_opt()),
                    _ => None,
                })
                .collect();
            Ok(Arc::new(arr))
        }

        DataType::Utf8 => {
            let arr: StringArray = cells
                .iter()
                .map(|c| if c.is_null() { None } else { Some(c.to_string()) })
                .collect();
            Ok(Arc::new(arr))
        }

        other => Err(Error::Other(format!(
            "Unsupported Arrow type for batch column: {other:?}"
        ))),
    }
}

/// Convert an Arrow RecordBatch into a batch
pub fn from_record_batch(record_batch: &RecordBatch) -> Result<Batch> {
    let schema = record_batch.schema();
    let mut batch = Batch::with_row_count(record_batch.num_rows());

    for (idx, field) in schema.fields().iter().enumerate() {
        let array = record_batch.column(idx);
        let cells = (0..array.len())
            .map(|row| array_value_to_cell(array.as_ref(), row))
            .collect::<Result<Vec<_>>>()?;
        batch = batch.with_column(Column::new(field.name().clone(), cells))?;
    }

    Ok(batch)
}

/// Convert a single array element to a cell
fn array_value_to_cell(array: &dyn Array, row: usize) -> Result<Cell> {
    if array.is_null(row) {
        return Ok(Cell::Null);
    }

    fn downcast<'a, T: 'static>(array: &'a dyn Array, name: &str) -> Result<&'a T> {
        array
            .as_any()
            .downcast_ref::<T>()
            .ok_or_else(|| Error::Other(format!("Failed to downcast to {name}")))
    }

    match array.data_type() {
        DataType::Null => Ok(Cell::Null),
        DataType::Boolean => Ok(Cell::Bool(
            downcast::<BooleanArray>(array, "BooleanArray")?.value(row),
        )),
        DataType::Int64 => Ok(Cell::Int(
            downcast::<Int64Array>(array, "Int64Array")?.value(row),
        )),
        DataType::Float64 => Ok(Cell::Float(
            downcast::<Float64Array>(array, "Float64Array")?.value(row),
        )),
        DataType::Utf8 => Ok(Cell::str(
            downcast::<StringArray>(array, "StringArray")?.value(row),
        )),
        DataType::LargeUtf8 => Ok(Cell::str(
            downcast::<LargeStringArray>(array, "LargeStringArray")?.value(row),
        )),
        DataType::Date32 => {
            let days = downcast::<Date32Array>(array, "Date32Array")?.value(row);
            Ok(NaiveDate::from_num_days_from_ce_opt(days + UNIX_EPOCH_DAYS_FROM_CE)
                .map_or(Cell::Null, Cell::Date))
        }
        DataType::Timestamp(TimeUnit::Nanosecond, _) => {
            let nanos =
                downcast::<TimestampNanosecondArray>(array, "TimestampNanosecondArray")?.value(row);
            Ok(nanos_to_datetime(nanos).map_or(Cell::Null, Cell::Timestamp))
        }
        // Default: keep a debug rendering so nothing is silently dropped
        other => Ok(Cell::Str(format!("{other:?}"))),
    }
}

fn nanos_to_datetime(nanos: i64) -> Option<NaiveDateTime> {
    let secs = nanos.div_euclid(1_000_000_000);
    let sub = nanos.rem_euclid(1_000_000_000) as u32;
    DateTime::from_timestamp(secs, sub).map(|dt| dt.naive_utc())
}
