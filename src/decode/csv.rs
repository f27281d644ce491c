//! CSV decoding
//!
//! Quote-aware CSV splitting plus read-time typing of columns.

use crate::batch::{Batch, Cell, Column};
use crate::error::{Error, Result};
use crate::registry::{ColumnType, ColumnTypes};
use crate::temporal::parse_timestamp;
use tracing::debug;

/// Field values read as missing
pub const NULL_TOKENS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// CSV decoder with configurable delimiter and header handling
#[derive(Debug, Clone)]
pub struct CsvDecoder {
    /// Field delimiter
    delimiter: char,
    /// Whether the first row is a header
    has_header: bool,
}

impl Default for CsvDecoder {
    fn default() -> Self {
        Self {
            delimiter: ',',
            has_header: true,
        }
    }
}

impl CsvDecoder {
    /// Create a new CSV decoder with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a CSV decoder with custom settings
    pub fn with_options(delimiter: char, has_header: bool) -> Self {
        Self {
            delimiter,
            has_header,
        }
    }

    /// Decode a CSV body into an untyped batch
    ///
    /// Every cell is text, or null when it matches one of [`NULL_TOKENS`].
    pub fn decode(&self, body: &str) -> Result<Batch> {
        let mut records = parse_records(body, self.delimiter)?.into_iter();

        // Get headers
        let headers: Vec<String> = if self.has_header {
            match records.next() {
                Some(header) => header,
                None => return Ok(Batch::new()),
            }
        } else {
            // Generate numeric column names
            match records.as_slice().first() {
                Some(first) => (0..first.len()).map(|i| format!("column_{i}")).collect(),
                None => return Ok(Batch::new()),
            }
        };

        let mut columns: Vec<Column> = headers
            .iter()
            .map(|h| Column::new(h.clone(), Vec::new()))
            .collect();

        for (row_idx, fields) in records.enumerate() {
            if fields.len() > headers.len() {
                return Err(Error::CsvParse {
                    message: format!(
                        "row {} has {} fields, header has {}",
                        row_idx + 1,
                        fields.len(),
                        headers.len()
                    ),
                });
            }

            let mut fields = fields.into_iter();
            for column in &mut columns {
                let cell = match fields.next() {
                    Some(value) if !NULL_TOKENS.contains(&value.as_str()) => Cell::Str(value),
                    _ => Cell::Null,
                };
                column.cells.push(cell);
            }
        }

        Batch::from_columns(columns)
    }
}

/// Split a CSV body into records
///
/// Quoted fields may contain delimiters, doubled quotes and line breaks.
/// Blank lines are skipped.
fn parse_records(body: &str, delimiter: char) -> Result<Vec<Vec<String>>> {
    let mut records = Vec::new();
    let mut fields: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut chars = body.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                // Check for escaped quote
                if chars.peek() == Some(&'"') {
                    current.push('"');
                    chars.next();
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(c);
            }
        } else if c == '"' {
            in_quotes = true;
        } else if c == delimiter {
            fields.push(std::mem::take(&mut current));
        } else if c == '\n' || c == '\r' {
            if c == '\r' && chars.peek() == Some(&'\n') {
                chars.next();
            }
            end_record(&mut records, &mut fields, &mut current);
        } else {
            current.push(c);
        }
    }

    if in_quotes {
        return Err(Error::CsvParse {
            message: "unterminated quoted field".to_string(),
        });
    }

    end_record(&mut records, &mut fields, &mut current);
    Ok(records)
}

fn end_record(records: &mut Vec<Vec<String>>, fields: &mut Vec<String>, current: &mut String) {
    if fields.is_empty() && current.is_empty() {
        return;
    }
    fields.push(std::mem::take(current));
    records.push(std::mem::take(fields));
}

/// Apply read-time column types to an untyped batch
///
/// - `string` and `raw` columns stay text
/// - `int64` and `float64` columns are parsed; a malformed value is an error
/// - `date_columns` (and `date`/`timestamp` tags) become timestamps where the
///   text parses, and stay text where it does not
///
/// Columns without a declared type are left as read.
pub fn apply_read_types(
    batch: Batch,
    column_types: &ColumnTypes,
    date_columns: &[String],
) -> Result<Batch> {
    let mut batch = batch;

    for (name, column_type) in column_types {
        let is_date = date_columns.contains(name)
            || matches!(column_type, ColumnType::Date | ColumnType::Timestamp);

        if !batch.has_column(name) {
            debug!("Declared column '{}' not present in extract", name);
            continue;
        }

        batch = batch.map_column(name, |column| {
            let cells = column
                .cells
                .iter()
                .enumerate()
                .map(|(row, cell)| read_cell(cell, *column_type, is_date, name, row))
                .collect::<Result<Vec<_>>>()?;
            Ok(Column::new(name.clone(), cells))
        })?;
    }

    Ok(batch)
}

fn read_cell(
    cell: &Cell,
    column_type: ColumnType,
    is_date: bool,
    column: &str,
    row: usize,
) -> Result<Cell> {
    let Cell::Str(text) = cell else {
        return Ok(cell.clone());
    };

    if is_date {
        return Ok(parse_timestamp(text).map_or_else(|| cell.clone(), Cell::Timestamp));
    }

    match column_type {
        ColumnType::Int64 => text.trim().parse::<i64>().map(Cell::Int).map_err(|e| {
            Error::CsvParse {
                message: format!("column '{column}' row {}: '{text}' is not an integer: {e}", row + 1),
            }
        }),
        ColumnType::Float64 => text.trim().parse::<f64>().map(Cell::Float).map_err(|e| {
            Error::CsvParse {
                message: format!("column '{column}' row {}: '{text}' is not a number: {e}", row + 1),
            }
        }),
        _ => Ok(cell.clone()),
    }
}
