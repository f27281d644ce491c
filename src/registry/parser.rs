//! YAML parser for entity registries
//!
//! Parses and validates registry YAML files.
//! The HR registry is embedded in the binary; custom registries load by path.

use crate::error::{Error, Result};
use crate::provenance::PROVENANCE_COLUMNS;
use crate::registry::types::{EntitySchema, PreFlattenDef, SchemaRegistry};
use std::fs;
use std::path::Path;

/// Built-in HR registry definition
pub const BUILTIN_REGISTRY: &str = include_str!("../../registry/hr_entities.yaml");

/// Load the built-in HR registry
pub fn builtin_registry() -> Result<SchemaRegistry> {
    load_registry_from_str(BUILTIN_REGISTRY)
}

/// Load a registry from a YAML file
pub fn load_registry(path: impl AsRef<Path>) -> Result<SchemaRegistry> {
    let path = path.as_ref();
    let content = fs::read_to_string(path).map_err(|e| {
        Error::config(format!(
            "Failed to read registry file '{}': {e}",
            path.display()
        ))
    })?;
    load_registry_from_str(&content)
}

/// Load a registry from a YAML string
pub fn load_registry_from_str(yaml: &str) -> Result<SchemaRegistry> {
    let mut registry: SchemaRegistry = serde_yaml::from_str(yaml)
        .map_err(|e| Error::config(format!("Failed to parse registry YAML: {e}")))?;

    for (name, schema) in &mut registry.entities {
        schema.name.clone_from(name);
        validate_entity(schema)?;
    }

    Ok(registry)
}

/// Validate one entity schema
fn validate_entity(schema: &EntitySchema) -> Result<()> {
    let name = &schema.name;

    if name.trim().is_empty() {
        return Err(Error::config("Entity name cannot be empty"));
    }

    if schema.read_types.is_empty() {
        return Err(Error::config(format!(
            "Entity '{name}' must declare at least one read column"
        )));
    }

    for column in &schema.date_columns {
        if !schema.read_types.contains_key(column) {
            return Err(Error::config(format!(
                "Entity '{name}' date column '{column}' is not a read column"
            )));
        }
    }

    // Business columns survive to the output
    for column in schema.read_types.keys() {
        if !schema.write_types.contains_key(column) && !is_intermediate(schema, column) {
            return Err(Error::config(format!(
                "Entity '{name}' read column '{column}' is missing from write_types"
            )));
        }
    }

    for column in &schema.json_columns {
        let fields = schema.expected_json_shape.get(column).ok_or_else(|| {
            Error::config(format!(
                "Entity '{name}' JSON column '{column}' has no expected_json_shape"
            ))
        })?;

        for field in fields {
            if !schema.write_types.contains_key(field) {
                return Err(Error::config(format!(
                    "Entity '{name}' flattened field '{field}' is missing from write_types"
                )));
            }
        }
    }

    for column in PROVENANCE_COLUMNS {
        if !schema.write_types.contains_key(column) {
            return Err(Error::config(format!(
                "Entity '{name}' provenance column '{column}' is missing from write_types"
            )));
        }
    }

    if let Some(PreFlattenDef::SplitJson {
        column,
        json_column,
    }) = &schema.pre_flatten
    {
        if !schema.read_types.contains_key(column) {
            return Err(Error::config(format!(
                "Entity '{name}' split column '{column}' is not a read column"
            )));
        }
        if !schema.json_columns.contains(json_column) {
            return Err(Error::config(format!(
                "Entity '{name}' split target '{json_column}' is not a JSON column"
            )));
        }
    }

    Ok(())
}

/// Columns that only exist between parse stages
fn is_intermediate(schema: &EntitySchema, column: &str) -> bool {
    matches!(
        &schema.pre_flatten,
        Some(PreFlattenDef::SplitJson { json_column, .. }) if json_column == column
    )
}
