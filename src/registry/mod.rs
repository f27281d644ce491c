//! Schema registry module
//!
//! Static per-entity schema configuration, kept as data.
//!
//! # Overview
//!
//! The registry module provides:
//! - `SchemaRegistry` - entity name to schema lookup
//! - `EntitySchema` - read types, date columns, JSON columns, expected
//!   flattened fields and write types for one entity
//! - YAML parsing with validation, and the embedded HR registry

mod parser;
mod types;

pub use parser::{builtin_registry, load_registry, load_registry_from_str, BUILTIN_REGISTRY};
pub use types::{ColumnType, ColumnTypes, EntitySchema, PreFlattenDef, SchemaRegistry};

#[cfg(test)]
mod tests;
