//! Batch module
//!
//! In-memory tabular data passed between pipeline stages.
//!
//! # Overview
//!
//! A [`Batch`] is an ordered set of named [`Column`]s of equal length.
//! Cells are dynamically typed ([`Cell`]) so a column can hold untyped text
//! straight from a CSV extract, typed values after coercion, or a mix of both
//! when lenient coercion kept a value it could not convert.
//!
//! Batches are value-like: every transformation consumes a batch and returns
//! a new one. Conversion to Arrow happens only at the write boundary.

mod convert;
mod types;

pub use convert::{
    arrow_type_for, declared_arrow_type, from_record_batch, to_record_batch,
    to_record_batch_with_types,
};
pub use types::{Batch, Cell, CellKind, Column};
