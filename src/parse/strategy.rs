//! Per-entity pre-flatten transforms

use crate::batch::{Batch, Cell, Column};
use crate::error::Result;
use crate::registry::PreFlattenDef;
use std::fmt::Debug;
use std::sync::Arc;
use tracing::debug;

/// Transform applied to an entity's batch before its JSON columns are flattened
pub trait PreFlattenTransform: Send + Sync + Debug {
    /// Reshape the batch ahead of flattening
    fn apply(&self, batch: Batch) -> Result<Batch>;

    /// Columns created by `apply` that are dropped once flattening is done
    fn intermediate_columns(&self) -> Vec<String> {
        Vec::new()
    }
}

/// Leaves the batch unchanged
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl PreFlattenTransform for Identity {
    fn apply(&self, batch: Batch) -> Result<Batch> {
        Ok(batch)
    }
}

/// Splits a column holding either plain values or JSON documents
///
/// Values starting with `{` move to `json_column`; every other value stays
/// in `column`. Each row is non-null in at most one of the two.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitJsonColumn {
    column: String,
    json_column: String,
}

impl SplitJsonColumn {
    /// Create a split of `column` into `column` and `json_column`
    pub fn new(column: impl Into<String>, json_column: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            json_column: json_column.into(),
        }
    }

    fn is_document(cell: &Cell) -> bool {
        cell.as_str().is_some_and(|s| s.starts_with('{'))
    }
}

impl PreFlattenTransform for SplitJsonColumn {
    fn apply(&self, batch: Batch) -> Result<Batch> {
        let Some(source) = batch.column(&self.column) else {
            debug!("Column '{}' absent, nothing to split", self.column);
            let num_rows = batch.num_rows();
            return batch.with_column(Column::nulls(self.json_column.clone(), num_rows));
        };

        let (documents, plain): (Vec<Cell>, Vec<Cell>) = source
            .cells
            .iter()
            .map(|cell| {
                if Self::is_document(cell) {
                    (cell.clone(), Cell::Null)
                } else {
                    (Cell::Null, cell.clone())
                }
            })
            .unzip();

        batch
            .with_column(Column::new(self.column.clone(), plain))?
            .with_column(Column::new(self.json_column.clone(), documents))
    }

    fn intermediate_columns(&self) -> Vec<String> {
        vec![self.json_column.clone()]
    }
}

/// Build the transform declared in the registry
pub fn strategy_for(def: &PreFlattenDef) -> Arc<dyn PreFlattenTransform> {
    match def {
        PreFlattenDef::SplitJson {
            column,
            json_column,
        } => Arc::new(SplitJsonColumn::new(column, json_column)),
    }
}
