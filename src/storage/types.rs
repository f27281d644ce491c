//! Storage capability traits and write options
//!
//! The pipeline only sees these traits; object-store adapters implement them.

use crate::batch::Batch;
use crate::error::Result;
use crate::registry::ColumnTypes;
use async_trait::async_trait;
use parquet::basic::Compression;
use std::collections::BTreeMap;

// ============================================================================
// Capabilities
// ============================================================================

/// Reads tabular extracts
#[async_trait]
pub trait TabularReader: Send + Sync {
    /// Read every extract under `path` into one batch
    ///
    /// Returns an empty batch when nothing is found. Transport failures
    /// are `Error::StorageRead`.
    async fn read_tabular(
        &self,
        path: &str,
        column_types: &ColumnTypes,
        date_columns: &[String],
    ) -> Result<Batch>;
}

/// Lists object keys
#[async_trait]
pub trait ObjectLister: Send + Sync {
    /// List object keys under `prefix`, sorted
    async fn list_objects(&self, prefix: &str) -> Result<Vec<String>>;
}

/// Writes batches as columnar files
#[async_trait]
pub trait ColumnarWriter: Send + Sync {
    /// Write `batch` under `target_path`
    ///
    /// Failures are `Error::StorageWrite` and are not retried.
    async fn write_columnar(
        &self,
        batch: &Batch,
        target_path: &str,
        options: &WriteOptions,
    ) -> Result<WriteResult>;
}

// ============================================================================
// Write Options
// ============================================================================

/// How existing data under the target is treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverwriteMode {
    /// Delete existing objects under the target partition first
    #[default]
    ReplaceMatchingPartitions,
    /// Keep existing objects
    Append,
}

/// Configuration for columnar writes
#[derive(Debug, Clone)]
pub struct WriteOptions {
    compression: Compression,
    row_group_size: usize,
    max_rows_per_file: Option<usize>,
    overwrite: OverwriteMode,
    use_threads: bool,
    column_types: ColumnTypes,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            compression: Compression::SNAPPY,
            row_group_size: 1024 * 1024, // 1M rows
            max_rows_per_file: None,
            overwrite: OverwriteMode::ReplaceMatchingPartitions,
            use_threads: false,
            column_types: ColumnTypes::new(),
        }
    }
}

impl WriteOptions {
    /// Create options with default settings
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set compression algorithm
    #[must_use]
    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    /// Set row group size
    #[must_use]
    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// Split output into files of at most `rows` rows
    #[must_use]
    pub fn with_max_rows_per_file(mut self, rows: usize) -> Self {
        self.max_rows_per_file = Some(rows.max(1));
        self
    }

    /// Set overwrite mode
    #[must_use]
    pub fn with_overwrite(mut self, mode: OverwriteMode) -> Self {
        self.overwrite = mode;
        self
    }

    /// Upload file parts concurrently
    #[must_use]
    pub fn with_threads(mut self, enabled: bool) -> Self {
        self.use_threads = enabled;
        self
    }

    /// Declare the output type of columns
    ///
    /// Declared columns keep their type even when every value is null.
    #[must_use]
    pub fn with_column_types(mut self, types: ColumnTypes) -> Self {
        self.column_types = types;
        self
    }

    /// Compression algorithm
    pub fn compression(&self) -> Compression {
        self.compression
    }

    /// Row group size
    pub fn row_group_size(&self) -> usize {
        self.row_group_size
    }

    /// Maximum rows per output file
    pub fn max_rows_per_file(&self) -> Option<usize> {
        self.max_rows_per_file
    }

    /// Overwrite mode
    pub fn overwrite(&self) -> OverwriteMode {
        self.overwrite
    }

    /// Whether uploads run concurrently
    pub fn use_threads(&self) -> bool {
        self.use_threads
    }

    /// Declared output column types
    pub fn column_types(&self) -> &ColumnTypes {
        &self.column_types
    }
}

// ============================================================================
// Write Result
// ============================================================================

/// Outcome of a columnar write
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteResult {
    /// Full paths of every stored file
    pub stored_paths: Vec<String>,
    /// Partition directory to its `key=value` values
    pub partitions_written: BTreeMap<String, Vec<String>>,
}
