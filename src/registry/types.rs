//! Registry types
//!
//! Declarative entity schema types for YAML parsing.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

// ============================================================================
// Column Types
// ============================================================================

/// Primitive or temporal type tag of a column
///
/// Pandas-style dtype names are accepted as aliases so registries exported
/// from older tooling load unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    /// Text
    #[serde(alias = "str")]
    String,
    /// Nullable 64-bit integer
    #[serde(alias = "Int64")]
    Int64,
    /// 64-bit float
    Float64,
    /// Left exactly as read
    #[serde(alias = "object")]
    Raw,
    /// Calendar date
    Date,
    /// Date and time
    #[serde(alias = "datetime64[ns]")]
    Timestamp,
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::String => write!(f, "string"),
            ColumnType::Int64 => write!(f, "int64"),
            ColumnType::Float64 => write!(f, "float64"),
            ColumnType::Raw => write!(f, "raw"),
            ColumnType::Date => write!(f, "date"),
            ColumnType::Timestamp => write!(f, "timestamp"),
        }
    }
}

/// Column name to type mapping
pub type ColumnTypes = BTreeMap<String, ColumnType>;

// ============================================================================
// Pre-flatten Definition
// ============================================================================

/// Declarative pre-flatten transform for an entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PreFlattenDef {
    /// Split a column holding either plain values or JSON documents
    SplitJson {
        /// Dual-purpose source column; keeps the plain values
        column: String,
        /// Intermediate column receiving the JSON documents
        json_column: String,
    },
}

// ============================================================================
// Entity Schema
// ============================================================================

/// Schema configuration for one entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct EntitySchema {
    /// Entity name (filled from the registry key)
    #[serde(skip)]
    pub name: String,
    /// Types applied when the extract is read
    pub read_types: ColumnTypes,
    /// Columns parsed as dates at read time, in order
    #[serde(default)]
    pub date_columns: Vec<String>,
    /// Columns holding serialized JSON documents
    #[serde(default)]
    pub json_columns: Vec<String>,
    /// Expected flattened field names per JSON column
    #[serde(default)]
    pub expected_json_shape: BTreeMap<String, Vec<String>>,
    /// Types of the columnar output
    pub write_types: ColumnTypes,
    /// Transform applied before flattening
    #[serde(default)]
    pub pre_flatten: Option<PreFlattenDef>,
}

impl EntitySchema {
    /// Check if the entity carries any JSON columns
    pub fn has_json_columns(&self) -> bool {
        !self.json_columns.is_empty()
    }

    /// Expected flattened fields of a JSON column
    pub fn expected_fields(&self, json_column: &str) -> &[String] {
        self.expected_json_shape
            .get(json_column)
            .map_or(&[], Vec::as_slice)
    }

    /// Read type of a column, if declared
    pub fn read_type(&self, column: &str) -> Option<ColumnType> {
        self.read_types.get(column).copied()
    }
}

// ============================================================================
// Schema Registry
// ============================================================================

/// Static mapping of entity names to schemas
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaRegistry {
    /// Entity schemas by name
    pub(crate) entities: BTreeMap<String, EntitySchema>,
}

impl SchemaRegistry {
    /// Look up an entity schema
    pub fn get(&self, entity: &str) -> Result<&EntitySchema> {
        self.entities
            .get(entity)
            .ok_or_else(|| Error::unknown_entity(entity))
    }

    /// Check if an entity is configured
    pub fn contains(&self, entity: &str) -> bool {
        self.entities.contains_key(entity)
    }

    /// Configured entity names, sorted
    pub fn entity_names(&self) -> Vec<&str> {
        self.entities.keys().map(String::as_str).collect()
    }

    /// Number of configured entities
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Check if no entity is configured
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
