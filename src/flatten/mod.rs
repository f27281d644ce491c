//! JSON flattening module
//!
//! Turns a column of serialized documents into first-class columns.
//!
//! # Overview
//!
//! [`flatten`] parses every document of a JSON column and adds one column per
//! leaf field, named `{json_column}_{field}` (nested keys joined with `.`).
//! The declared expected fields act as a schema floor: fields the data lacks
//! are added as nulls, fields the data adds are kept.
//!
//! Documents are parsed as strict JSON first. If any document of the column
//! fails, the whole column is parsed again as Python-style literals.

mod engine;

pub use engine::{flatten, flattened_name, DocumentTier};

#[cfg(test)]
mod tests;
