// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::unused_self)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # hr-lake
//!
//! Ingests per-entity HR CSV extracts from an object store, flattens their
//! JSON columns, stamps source-file provenance onto every row and rewrites
//! them as partitioned Parquet in a second location.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use hr_lake::config::PipelineConfig;
//! use hr_lake::pipeline::Pipeline;
//! use hr_lake::registry::builtin_registry;
//! use hr_lake::storage::{ObjectStoreSource, ParquetSink, StorageLocation};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> hr_lake::Result<()> {
//!     let source = Arc::new(ObjectStoreSource::new(StorageLocation::parse("s3://ib-bucket")?));
//!     let sink = Arc::new(ParquetSink::new(StorageLocation::parse("s3://dlp-bucket")?));
//!     let pipeline = Pipeline::new(Arc::new(builtin_registry()?), source.clone(), source, sink);
//!
//!     let config = PipelineConfig::new(
//!         "ib-bucket", "hr/raw", "dlp-bucket", "hr/lake",
//!         "year=2024/month=01/day=15",
//!         vec!["employees".to_string()],
//!     );
//!     let report = pipeline.run(&config).await?;
//!     println!("{} rows written", report.total_rows());
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌───────────┐   ┌───────────────────────────────────┐   ┌──────────┐   ┌───────────┐
//! │  Reader   │──▶│           Entity Parser           │──▶│  Coerce  │──▶│  Writer   │
//! │ CSV/typed │   │ pre-flatten → flatten → provenance│   │ strict → │   │  Parquet  │
//! └───────────┘   └───────────────────────────────────┘   │ lenient  │   └───────────┘
//!       ▲                          ▲                       └──────────┘
//!       └──────── Schema Registry (YAML, per entity) ───────────┘
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types
pub mod error;

/// In-memory tabular batches
pub mod batch;

/// Per-entity schema registry
pub mod registry;

/// CSV and literal decoders
pub mod decode;

/// Date and timestamp parsing
pub mod temporal;

/// Source-file provenance
pub mod provenance;

/// JSON column flattening
pub mod flatten;

/// Per-entity parsing
pub mod parse;

/// Write-type coercion
pub mod coerce;

/// Storage capabilities and object-store adapters
pub mod storage;

/// Run configuration
pub mod config;

/// Per-entity pipeline
pub mod pipeline;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use batch::{Batch, Cell, Column};
pub use config::PipelineConfig;
pub use error::{Error, Result};
pub use pipeline::{EntityOutcome, Pipeline, RunReport};
pub use registry::{builtin_registry, load_registry, EntitySchema, SchemaRegistry};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
