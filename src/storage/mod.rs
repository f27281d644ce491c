//! Storage module
//!
//! Object-store access for source extracts and Parquet output.
//!
//! # Overview
//!
//! The pipeline depends only on three capabilities:
//! - [`TabularReader`] - read every CSV extract under a prefix into a batch
//! - [`ObjectLister`] - list object keys under a prefix
//! - [`ColumnarWriter`] - write a batch as Parquet under a target prefix
//!
//! [`ObjectStoreSource`] and [`ParquetSink`] implement them over any
//! [`StorageLocation`] (S3, R2, GCS, Azure, local filesystem or in-memory).

mod location;
mod sink;
mod source;
mod types;

pub use location::StorageLocation;
pub use sink::{partition_values, ParquetSink};
pub use source::{ObjectStoreSource, CSV_SUFFIX};
pub use types::{
    ColumnarWriter, ObjectLister, OverwriteMode, TabularReader, WriteOptions, WriteResult,
};
