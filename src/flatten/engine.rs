//! JSON column flattening

use crate::batch::{Batch, Cell, Column};
use crate::decode::parse_literal;
use crate::error::{Error, Result};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use tracing::{debug, warn};

/// Document used for null cells
const EMPTY_DOCUMENT: &str = "{}";

/// Deserialization tier applied to a whole JSON column
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentTier {
    /// Strict JSON
    Json,
    /// Python-style literal notation
    Literal,
}

impl DocumentTier {
    fn parse(self, text: &str) -> Result<Value> {
        match self {
            DocumentTier::Json => Ok(serde_json::from_str(text)?),
            DocumentTier::Literal => parse_literal(text),
        }
    }
}

impl fmt::Display for DocumentTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DocumentTier::Json => write!(f, "json"),
            DocumentTier::Literal => write!(f, "literal"),
        }
    }
}

/// Name of the column a flattened field lands in
pub fn flattened_name(json_column: &str, field: &str) -> String {
    format!("{json_column}_{field}")
}

/// Flatten `json_column` into one column per document field
///
/// The flattened columns are joined positionally onto `batch`, followed by
/// every expected field the data did not produce (as nulls). The JSON column
/// itself is kept unchanged. When the column is missing or entirely null, no
/// document is parsed and only the expected fields are added.
pub fn flatten(batch: Batch, json_column: &str, expected_fields: &[String]) -> Result<Batch> {
    let num_rows = batch.num_rows();
    let column = match batch.column(json_column) {
        Some(column) if !column.is_all_null() => column,
        _ => {
            debug!(
                "Column '{}' has no documents, adding {} empty field(s)",
                json_column,
                expected_fields.len()
            );
            return batch.hconcat(expected_skeleton(expected_fields, &[], num_rows)?);
        }
    };

    let documents = parse_documents(column)?;
    let flattened = flatten_documents(json_column, &documents)?;
    debug!(
        "Flattened '{}' into {} column(s)",
        json_column,
        flattened.num_columns()
    );

    let present: Vec<&str> = flattened.column_names();
    let missing = expected_skeleton(expected_fields, &present, num_rows)?;
    let reconciled = flattened.hconcat(missing)?;

    batch.hconcat(reconciled)
}

/// Parse every cell of a JSON column, falling back to literal notation
///
/// A tier applies to the whole column: one bad document in the strict tier
/// sends every document to the literal tier.
fn parse_documents(column: &Column) -> Result<Vec<Map<String, Value>>> {
    let texts: Vec<String> = column
        .cells
        .iter()
        .map(|cell| match cell {
            Cell::Null => EMPTY_DOCUMENT.to_string(),
            other => other.to_string(),
        })
        .collect();

    match parse_with(DocumentTier::Json, &texts) {
        Ok(documents) => Ok(documents),
        Err(json_error) => {
            warn!(
                "Column '{}' is not strict JSON ({}), retrying as literal documents",
                column.name, json_error
            );
            parse_with(DocumentTier::Literal, &texts).map_err(|literal_error| {
                Error::flatten(
                    &column.name,
                    format!("json: {json_error}; literal: {literal_error}"),
                )
            })
        }
    }
}

fn parse_with(tier: DocumentTier, texts: &[String]) -> std::result::Result<Vec<Map<String, Value>>, String> {
    texts
        .iter()
        .enumerate()
        .map(|(row, text)| match tier.parse(text) {
            Ok(Value::Object(map)) => Ok(map),
            Ok(_) => Err(format!("row {row}: {tier} document is not an object")),
            Err(e) => Err(format!("row {row}: {e}")),
        })
        .collect()
}

/// Turn documents into columns, one per leaf path, in first-appearance order
fn flatten_documents(json_column: &str, documents: &[Map<String, Value>]) -> Result<Batch> {
    let mut columns: Vec<Column> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for (row, document) in documents.iter().enumerate() {
        let mut leaves = Vec::new();
        collect_leaves("", document, &mut leaves);

        for (path, cell) in leaves {
            let name = flattened_name(json_column, &path);
            let slot = *index.entry(name.clone()).or_insert_with(|| {
                columns.push(Column::nulls(name, documents.len()));
                columns.len() - 1
            });
            columns[slot].cells[row] = cell;
        }
    }

    if columns.is_empty() {
        return Ok(Batch::with_row_count(documents.len()));
    }
    Batch::from_columns(columns)
}

/// Collect `(dotted.path, cell)` for every leaf of an object
fn collect_leaves(prefix: &str, object: &Map<String, Value>, leaves: &mut Vec<(String, Cell)>) {
    for (key, value) in object {
        let path = if prefix.is_empty() {
            key.clone()
        } else {
            format!("{prefix}.{key}")
        };

        match value {
            Value::Object(nested) => collect_leaves(&path, nested, leaves),
            Value::String(s) if s.is_empty() => leaves.push((path, Cell::Null)),
            other => leaves.push((path, Cell::from_json(other))),
        }
    }
}

/// Null columns for expected fields not already present
fn expected_skeleton(expected_fields: &[String], present: &[&str], num_rows: usize) -> Result<Batch> {
    let columns = expected_fields
        .iter()
        .filter(|field| !present.contains(&field.as_str()))
        .map(|field| Column::nulls(field.clone(), num_rows))
        .collect::<Vec<_>>();

    if columns.is_empty() {
        return Ok(Batch::with_row_count(num_rows));
    }
    Batch::from_columns(columns)
}
