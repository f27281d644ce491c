//! Object-store backed reader and lister

use super::location::StorageLocation;
use super::types::{ObjectLister, TabularReader};
use crate::batch::Batch;
use crate::decode::{apply_read_types, CsvDecoder};
use crate::error::{Error, Result};
use crate::registry::ColumnTypes;
use async_trait::async_trait;
use futures::TryStreamExt;
use object_store::ObjectMeta;
use tracing::debug;

/// Suffix of source extracts
pub const CSV_SUFFIX: &str = ".csv";

/// Reads CSV extracts and lists keys in one storage location
#[derive(Debug, Clone)]
pub struct ObjectStoreSource {
    location: StorageLocation,
    decoder: CsvDecoder,
}

impl ObjectStoreSource {
    /// Create a source over a location
    pub fn new(location: StorageLocation) -> Self {
        Self {
            location,
            decoder: CsvDecoder::new(),
        }
    }

    /// Use a custom CSV decoder
    #[must_use]
    pub fn with_decoder(mut self, decoder: CsvDecoder) -> Self {
        self.decoder = decoder;
        self
    }

    /// The location this source reads from
    pub fn location(&self) -> &StorageLocation {
        &self.location
    }

    /// List object metadata under a prefix, sorted by key
    async fn list_meta(&self, prefix: &str) -> Result<Vec<ObjectMeta>> {
        let trimmed = prefix.trim_matches('/');
        let path = self.location.object_path(trimmed);
        let listing = if trimmed.is_empty() {
            self.location.store().list(None)
        } else {
            self.location.store().list(Some(&path))
        };

        let mut objects: Vec<ObjectMeta> = match listing.try_collect::<Vec<ObjectMeta>>().await {
            Ok(objects) => objects,
            // A prefix that was never written is an empty listing
            Err(object_store::Error::NotFound { .. }) => Vec::new(),
            Err(e) => return Err(e.into()),
        };
        objects.sort_by(|a, b| a.location.as_ref().cmp(b.location.as_ref()));
        Ok(objects)
    }

    /// Read and decode one CSV object
    async fn read_object(
        &self,
        meta: &ObjectMeta,
        column_types: &ColumnTypes,
        date_columns: &[String],
    ) -> Result<Batch> {
        let key = meta.location.to_string();
        let object_url = self.location.display_path(&key);

        let bytes = self
            .location
            .store()
            .get(&meta.location)
            .await
            .map_err(|e| Error::storage_read(&object_url, e.to_string()))?
            .bytes()
            .await
            .map_err(|e| Error::storage_read(&object_url, e.to_string()))?;

        let body = String::from_utf8(bytes.to_vec())
            .map_err(|e| Error::storage_read(&object_url, format!("not valid UTF-8: {e}")))?;

        let raw = self
            .decoder
            .decode(&body)
            .map_err(|e| Error::storage_read(&object_url, e.to_string()))?;
        debug!("Decoded {} rows from {}", raw.num_rows(), object_url);

        apply_read_types(raw, column_types, date_columns)
            .map_err(|e| Error::storage_read(&object_url, e.to_string()))
    }
}

#[async_trait]
impl ObjectLister for ObjectStoreSource {
    async fn list_objects(&self, prefix: &str) -> Result<Vec<String>> {
        let objects = self.list_meta(prefix).await?;
        Ok(objects.into_iter().map(|m| m.location.to_string()).collect())
    }
}

#[async_trait]
impl TabularReader for ObjectStoreSource {
    async fn read_tabular(
        &self,
        path: &str,
        column_types: &ColumnTypes,
        date_columns: &[String],
    ) -> Result<Batch> {
        let objects = self
            .list_meta(path)
            .await
            .map_err(|e| Error::storage_read(self.location.display_path(path), e.to_string()))?;

        let mut batches = Vec::new();
        for meta in objects
            .iter()
            .filter(|m| m.location.as_ref().ends_with(CSV_SUFFIX))
        {
            batches.push(self.read_object(meta, column_types, date_columns).await?);
        }

        if batches.is_empty() {
            debug!("No extracts under {}", self.location.display_path(path));
            return Ok(Batch::new());
        }

        Batch::vconcat(batches)
    }
}
