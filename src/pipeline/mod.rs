//! Pipeline module
//!
//! Runs the read, parse, coerce and write steps for each entity of a run.
//!
//! # Overview
//!
//! [`Pipeline`] owns its collaborators: the schema registry, a
//! [`TabularReader`], an [`ObjectLister`] and a [`ColumnarWriter`]. Entities
//! are processed one at a time in list order. The first error aborts the
//! run; entities already written stay written.

mod types;

pub use types::{EntityOutcome, EntityReport, RunReport};

use crate::coerce::coerce;
use crate::config::PipelineConfig;
use crate::error::Result;
use crate::parse::EntityParser;
use crate::registry::SchemaRegistry;
use crate::storage::{ColumnarWriter, ObjectLister, TabularReader, WriteOptions};
use std::sync::Arc;
use std::time::Instant;
use tracing::{error, info};

/// Per-entity ingestion pipeline
#[derive(Clone)]
pub struct Pipeline {
    parser: EntityParser,
    reader: Arc<dyn TabularReader>,
    lister: Arc<dyn ObjectLister>,
    writer: Arc<dyn ColumnarWriter>,
    write_options: WriteOptions,
}

impl Pipeline {
    /// Create a pipeline with default write options
    pub fn new(
        registry: Arc<SchemaRegistry>,
        reader: Arc<dyn TabularReader>,
        lister: Arc<dyn ObjectLister>,
        writer: Arc<dyn ColumnarWriter>,
    ) -> Self {
        Self {
            parser: EntityParser::new(registry),
            reader,
            lister,
            writer,
            write_options: WriteOptions::default(),
        }
    }

    /// Set write options
    #[must_use]
    pub fn with_write_options(mut self, options: WriteOptions) -> Self {
        self.write_options = options;
        self
    }

    /// Replace the entity parser (e.g. one with custom strategies)
    #[must_use]
    pub fn with_parser(mut self, parser: EntityParser) -> Self {
        self.parser = parser;
        self
    }

    /// The entity parser in use
    pub fn parser(&self) -> &EntityParser {
        &self.parser
    }

    /// Process every entity of `config` in order
    pub async fn run(&self, config: &PipelineConfig) -> Result<RunReport> {
        let mut report = RunReport::default();

        for entity in &config.entities {
            match self.run_entity(config, entity).await {
                Ok(entry) => report.entities.push(entry),
                Err(e) => {
                    let class = if e.is_storage() { "storage" } else { "processing" };
                    error!(
                        "Aborting run at '{}' after {} entit(ies), {} error: {}",
                        entity,
                        report.entities.len(),
                        class,
                        e
                    );
                    return Err(e);
                }
            }
        }

        info!(
            "Run finished: {} written, {} skipped, {} rows",
            report.written_count(),
            report.skipped_count(),
            report.total_rows()
        );
        Ok(report)
    }

    /// Read, parse, coerce and write one entity
    pub async fn run_entity(&self, config: &PipelineConfig, entity: &str) -> Result<EntityReport> {
        let start = Instant::now();
        let schema = self.parser.registry().get(entity)?;
        let source_path = config.source_path(entity);
        let target_path = config.target_path(entity);

        info!("entity_name={}", entity);
        info!("Full source_path {}/{}", config.source_bucket, source_path);
        info!("Full target_path {}/{}", config.dest_bucket, target_path);

        let raw = self
            .reader
            .read_tabular(&source_path, &schema.read_types, &schema.date_columns)
            .await?;

        let outcome = if raw.is_empty() {
            info!("No rows under {}, skipping '{}'", source_path, entity);
            EntityOutcome::SkippedEmpty
        } else {
            info!("Read {} rows for '{}'", raw.num_rows(), entity);

            let parsed = self
                .parser
                .parse_from_source(raw, entity, self.lister.as_ref(), &source_path)
                .await?;
            let coerced = coerce(parsed, &schema.write_types)?;
            let rows = coerced.num_rows();

            let options = self
                .write_options
                .clone()
                .with_column_types(schema.write_types.clone());
            let write_result = self
                .writer
                .write_columnar(&coerced, &target_path, &options)
                .await?;
            info!("stored_files {:?}", write_result.stored_paths);

            EntityOutcome::Written { rows, write_result }
        };

        Ok(EntityReport {
            entity: entity.to_string(),
            source_path,
            target_path,
            outcome,
            duration: start.elapsed(),
        })
    }
}
