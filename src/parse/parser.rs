//! Entity parser

use super::strategy::{strategy_for, Identity, PreFlattenTransform};
use crate::batch::Batch;
use crate::error::Result;
use crate::flatten::flatten;
use crate::provenance::{resolve_source, ProvenanceTriple};
use crate::registry::{EntitySchema, SchemaRegistry};
use crate::storage::ObjectLister;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};

/// Turns a raw entity batch into a flattened, provenance-stamped batch
#[derive(Debug, Clone)]
pub struct EntityParser {
    registry: Arc<SchemaRegistry>,
    strategies: HashMap<String, Arc<dyn PreFlattenTransform>>,
}

impl EntityParser {
    /// Create a parser, registering every pre-flatten transform the registry declares
    pub fn new(registry: Arc<SchemaRegistry>) -> Self {
        let strategies = registry
            .entities
            .iter()
            .filter_map(|(name, schema)| {
                schema
                    .pre_flatten
                    .as_ref()
                    .map(|def| (name.clone(), strategy_for(def)))
            })
            .collect();

        Self {
            registry,
            strategies,
        }
    }

    /// Register (or replace) the pre-flatten transform of an entity
    #[must_use]
    pub fn with_strategy(
        mut self,
        entity: impl Into<String>,
        strategy: Arc<dyn PreFlattenTransform>,
    ) -> Self {
        self.strategies.insert(entity.into(), strategy);
        self
    }

    /// The schema registry in use
    pub fn registry(&self) -> &SchemaRegistry {
        &self.registry
    }

    /// Parse a batch with an already resolved provenance
    ///
    /// Entities without JSON columns only gain the provenance columns.
    pub fn parse(
        &self,
        batch: Batch,
        entity: &str,
        provenance: &ProvenanceTriple,
    ) -> Result<Batch> {
        let schema = self.registry.get(entity)?;

        let parsed = if schema.has_json_columns() {
            self.flatten_entity(batch, schema)?
        } else {
            debug!("Entity '{}' has no JSON columns", entity);
            batch
        };

        Ok(provenance.stamp(parsed))
    }

    /// Parse a batch, resolving provenance from the objects under `source_prefix`
    pub async fn parse_from_source(
        &self,
        batch: Batch,
        entity: &str,
        lister: &dyn ObjectLister,
        source_prefix: &str,
    ) -> Result<Batch> {
        // Unknown entities fail before any listing happens
        self.registry.get(entity)?;
        let provenance = resolve_source(lister, source_prefix).await;
        self.parse(batch, entity, &provenance)
    }

    fn flatten_entity(&self, batch: Batch, schema: &EntitySchema) -> Result<Batch> {
        let strategy: &dyn PreFlattenTransform = match self.strategies.get(&schema.name) {
            Some(strategy) => strategy.as_ref(),
            None => &Identity,
        };

        let mut batch = strategy.apply(batch)?;
        for json_column in &schema.json_columns {
            batch = flatten(batch, json_column, schema.expected_fields(json_column))?;
        }

        for column in strategy.intermediate_columns() {
            batch = batch.without_column(&column);
        }

        info!(
            "Parsed {} rows of '{}' into {} columns",
            batch.num_rows(),
            schema.name,
            batch.num_columns()
        );
        Ok(batch)
    }
}
