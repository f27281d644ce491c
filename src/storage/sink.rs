//! Parquet writer over an object store
//!
//! Encodes batches as Parquet in memory and uploads them under a
//! Hive-style partitioned target prefix.

use super::location::StorageLocation;
use super::types::{ColumnarWriter, OverwriteMode, WriteOptions, WriteResult};
use crate::batch::{to_record_batch_with_types, Batch};
use crate::error::{Error, Result};
use arrow::record_batch::RecordBatch;
use async_trait::async_trait;
use bytes::Bytes;
use futures::TryStreamExt;
use object_store::path::Path as ObjectPath;
use parquet::arrow::ArrowWriter;
use parquet::file::properties::WriterProperties;
use regex::Regex;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tracing::{debug, info};

/// Regex for a Hive partition segment: `key=value`
static PARTITION_SEGMENT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([^=/]+)=([^/]*)$").expect("valid partition regex"));

/// Partition values of every `key=value` segment in a path, in order
pub fn partition_values(path: &str) -> Vec<String> {
    path.split('/')
        .filter_map(|segment| PARTITION_SEGMENT.captures(segment))
        .filter_map(|caps| caps.get(2).map(|m| m.as_str().to_string()))
        .collect()
}

/// Writes batches as Parquet files into one storage location
#[derive(Debug, Clone)]
pub struct ParquetSink {
    location: StorageLocation,
}

impl ParquetSink {
    /// Create a sink over a location
    pub fn new(location: StorageLocation) -> Self {
        Self { location }
    }

    /// The location this sink writes to
    pub fn location(&self) -> &StorageLocation {
        &self.location
    }

    /// Delete every object under the target prefix
    async fn clear_partition(&self, target: &str) -> Result<()> {
        let prefix = self.location.object_path(target);
        let existing: Vec<ObjectPath> = self
            .location
            .store()
            .list(Some(&prefix))
            .map_ok(|meta| meta.location)
            .try_collect::<Vec<ObjectPath>>()
            .await
            .or_else(|e| match e {
                object_store::Error::NotFound { .. } => Ok(Vec::new()),
                other => Err(other),
            })
            .map_err(|e| Error::storage_write(self.location.display_path(target), e.to_string()))?;

        for path in existing {
            debug!("Removing {}", path);
            self.location
                .store()
                .delete(&path)
                .await
                .map_err(|e| Error::storage_write(path.to_string(), e.to_string()))?;
        }
        Ok(())
    }

    /// Upload one encoded part
    async fn put_part(&self, key: String, data: Bytes) -> Result<String> {
        let path = self.location.object_path(&key);
        let object_url = self.location.display_path(&key);
        self.location
            .store()
            .put(&path, data.into())
            .await
            .map_err(|e| Error::storage_write(&object_url, e.to_string()))?;
        Ok(object_url)
    }
}

#[async_trait]
impl ColumnarWriter for ParquetSink {
    async fn write_columnar(
        &self,
        batch: &Batch,
        target_path: &str,
        options: &WriteOptions,
    ) -> Result<WriteResult> {
        let target = target_path.trim_matches('/');
        let display_target = self.location.display_path(target);

        let record_batch = to_record_batch_with_types(batch, options.column_types())
            .map_err(|e| Error::storage_write(&display_target, e.to_string()))?;

        let mut parts = Vec::new();
        for (idx, chunk) in split_rows(&record_batch, options.max_rows_per_file())
            .iter()
            .enumerate()
        {
            let data = batch_to_parquet_bytes(chunk, options)
                .map_err(|e| Error::storage_write(&display_target, e.to_string()))?;
            parts.push((format!("{target}/part-{idx:05}.parquet"), data));
        }

        if options.overwrite() == OverwriteMode::ReplaceMatchingPartitions {
            self.clear_partition(target).await?;
        }

        let stored_paths = if options.use_threads() {
            futures::future::try_join_all(
                parts
                    .into_iter()
                    .map(|(key, data)| self.put_part(key, data)),
            )
            .await?
        } else {
            let mut stored = Vec::with_capacity(parts.len());
            for (key, data) in parts {
                stored.push(self.put_part(key, data).await?);
            }
            stored
        };

        info!(
            "Stored {} file(s), {} rows under {}",
            stored_paths.len(),
            batch.num_rows(),
            display_target
        );

        let mut partitions_written = BTreeMap::new();
        let values = partition_values(target);
        if !values.is_empty() {
            partitions_written.insert(format!("{display_target}/"), values);
        }

        Ok(WriteResult {
            stored_paths,
            partitions_written,
        })
    }
}

/// Split a record batch into chunks of at most `max_rows` rows
fn split_rows(batch: &RecordBatch, max_rows: Option<usize>) -> Vec<RecordBatch> {
    match max_rows {
        Some(max) if batch.num_rows() > max => (0..batch.num_rows())
            .step_by(max)
            .map(|offset| batch.slice(offset, max.min(batch.num_rows() - offset)))
            .collect(),
        _ => vec![batch.clone()],
    }
}

/// Encode a record batch as Parquet bytes in memory
fn batch_to_parquet_bytes(batch: &RecordBatch, options: &WriteOptions) -> Result<Bytes> {
    let props = WriterProperties::builder()
        .set_compression(options.compression())
        .set_max_row_group_size(options.row_group_size())
        .build();

    let mut buf = Vec::new();
    let mut writer = ArrowWriter::try_new(&mut buf, batch.schema(), Some(props))?;
    writer.write(batch)?;
    writer.close()?;

    Ok(Bytes::from(buf))
}
