//! CLI runner

use crate::cli::commands::Cli;
use crate::config::{parse_entity_list, PipelineConfig};
use crate::error::{Error, Result};
use crate::pipeline::{EntityOutcome, Pipeline, RunReport};
use crate::registry::{builtin_registry, load_registry, SchemaRegistry};
use crate::storage::{ObjectStoreSource, ParquetSink, StorageLocation, WriteOptions};
use std::sync::Arc;
use tracing::info;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the pipeline described by the arguments
    pub async fn run(&self) -> Result<RunReport> {
        let config = self.config()?;
        let registry = Arc::new(self.registry()?);

        for entity in &config.entities {
            if !registry.contains(entity) {
                return Err(Error::unknown_entity(entity));
            }
        }

        let source = Arc::new(ObjectStoreSource::new(StorageLocation::parse(
            &config.source_bucket,
        )?));
        let sink = Arc::new(ParquetSink::new(StorageLocation::parse(
            &config.dest_bucket,
        )?));

        let mut options = WriteOptions::default();
        if let Some(rows) = self.cli.max_rows_per_file {
            options = options.with_max_rows_per_file(rows);
        }

        let pipeline = Pipeline::new(registry, source.clone(), source, sink).with_write_options(options);
        let report = pipeline.run(&config).await?;

        for entry in &report.entities {
            match &entry.outcome {
                EntityOutcome::Written { rows, write_result } => info!(
                    "{}: {} rows -> {} file(s) in {:.2?}",
                    entry.entity,
                    rows,
                    write_result.stored_paths.len(),
                    entry.duration
                ),
                EntityOutcome::SkippedEmpty => info!("{}: no data", entry.entity),
            }
        }

        Ok(report)
    }

    /// Build the run configuration from the positional arguments
    pub fn config(&self) -> Result<PipelineConfig> {
        Ok(PipelineConfig::new(
            &self.cli.source_bucket,
            &self.cli.source_prefix,
            &self.cli.dest_bucket,
            &self.cli.dest_prefix,
            &self.cli.partition,
            parse_entity_list(&self.cli.entities)?,
        ))
    }

    fn registry(&self) -> Result<SchemaRegistry> {
        match &self.cli.registry {
            Some(path) => {
                info!("Loading registry from {}", path.display());
                load_registry(path)
            }
            None => builtin_registry(),
        }
    }
}
