//! Decoder module
//!
//! Supports: CSV extracts, Python-style literal documents
//!
//! # Overview
//!
//! The decode module turns raw text into pipeline values:
//! - [`CsvDecoder`] splits a CSV body into an untyped [`Batch`](crate::batch::Batch)
//! - [`apply_read_types`] applies an entity's read-time column types
//! - [`parse_literal`] reads Python-literal documents (`{'a': True}`) as JSON

mod csv;
mod literal;

pub use csv::{apply_read_types, CsvDecoder, NULL_TOKENS};
pub use literal::parse_literal;

#[cfg(test)]
mod tests;
