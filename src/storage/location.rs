//! Object store locations (S3, R2, GCS, Azure, local)

use crate::error::{Error, Result};
use object_store::aws::AmazonS3Builder;
use object_store::azure::MicrosoftAzureBuilder;
use object_store::gcp::GoogleCloudStorageBuilder;
use object_store::local::LocalFileSystem;
use object_store::memory::InMemory;
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;
use std::sync::Arc;

/// A bucket (or local directory) plus the store that serves it
#[derive(Debug, Clone)]
pub struct StorageLocation {
    /// The object store implementation
    store: Arc<dyn ObjectStore>,
    /// Display root, e.g. `s3://bucket`
    root: String,
    /// URL scheme (s3, r2, gs, az, file, memory)
    scheme: String,
}

impl StorageLocation {
    /// Parse a bucket argument
    ///
    /// Supported formats:
    /// - `bucket-name` - AWS S3 bucket
    /// - `s3://bucket` - AWS S3
    /// - `r2://bucket` - Cloudflare R2 (S3-compatible)
    /// - `gs://bucket` - Google Cloud Storage
    /// - `az://container` - Azure Blob Storage
    /// - `file:///local/path`, `/local/path` or `./path` - Local filesystem
    pub fn parse(location: &str) -> Result<Self> {
        if let Some(bucket) = location.strip_prefix("s3://") {
            Self::s3(bucket, false)
        } else if let Some(bucket) = location.strip_prefix("r2://") {
            Self::s3(bucket, true)
        } else if let Some(bucket) = location.strip_prefix("gs://") {
            Self::gcs(bucket)
        } else if let Some(container) = location.strip_prefix("az://") {
            Self::azure(container)
        } else if location.starts_with("file://")
            || location.starts_with('/')
            || location.starts_with('.')
        {
            Self::local(location)
        } else {
            // Bare bucket name
            Self::s3(location, false)
        }
    }

    /// Wrap an existing store
    pub fn from_store(store: Arc<dyn ObjectStore>, root: impl Into<String>) -> Self {
        let root = root.into();
        let scheme = root.split("://").next().unwrap_or("custom").to_string();
        Self {
            store,
            root,
            scheme,
        }
    }

    /// An empty in-memory location
    pub fn in_memory() -> Self {
        Self::from_store(Arc::new(InMemory::new()), "memory://local")
    }

    /// Create an S3 or R2 location
    fn s3(bucket: &str, is_r2: bool) -> Result<Self> {
        let scheme = if is_r2 { "r2" } else { "s3" };
        let bucket = bucket.trim_end_matches('/');
        if bucket.is_empty() || bucket.contains('/') {
            return Err(Error::config(format!("Invalid {scheme} bucket: '{bucket}'")));
        }

        let mut builder = AmazonS3Builder::from_env().with_bucket_name(bucket);

        // R2 endpoint: https://<account_id>.r2.cloudflarestorage.com
        if is_r2 {
            if let Ok(endpoint) = std::env::var("R2_ENDPOINT_URL") {
                builder = builder.with_endpoint(endpoint);
            }
        }

        let store = builder
            .build()
            .map_err(|e| Error::config(format!("Failed to create {scheme} client: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            root: format!("{scheme}://{bucket}"),
            scheme: scheme.to_string(),
        })
    }

    /// Create a GCS location
    fn gcs(bucket: &str) -> Result<Self> {
        let bucket = bucket.trim_end_matches('/');
        let store = GoogleCloudStorageBuilder::from_env()
            .with_bucket_name(bucket)
            .build()
            .map_err(|e| Error::config(format!("Failed to create GCS client: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            root: format!("gs://{bucket}"),
            scheme: "gs".to_string(),
        })
    }

    /// Create an Azure Blob location
    fn azure(container: &str) -> Result<Self> {
        let container = container.trim_end_matches('/');
        let store = MicrosoftAzureBuilder::from_env()
            .with_container_name(container)
            .build()
            .map_err(|e| Error::config(format!("Failed to create Azure client: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            root: format!("az://{container}"),
            scheme: "az".to_string(),
        })
    }

    /// Create a local filesystem location
    fn local(path: &str) -> Result<Self> {
        let path = path.strip_prefix("file://").unwrap_or(path);

        // Create directory if it doesn't exist
        std::fs::create_dir_all(path)
            .map_err(|e| Error::config(format!("Failed to create directory {path}: {e}")))?;

        let store = LocalFileSystem::new_with_prefix(path)
            .map_err(|e| Error::config(format!("Failed to create local store: {e}")))?;

        Ok(Self {
            store: Arc::new(store),
            root: format!("file://{}", path.trim_end_matches('/')),
            scheme: "file".to_string(),
        })
    }

    /// The underlying object store
    pub fn store(&self) -> &Arc<dyn ObjectStore> {
        &self.store
    }

    /// Check if this is a cloud location (not local or in-memory)
    pub fn is_cloud(&self) -> bool {
        !matches!(self.scheme.as_str(), "file" | "memory")
    }

    /// Get the scheme (s3, r2, gs, az, file, memory)
    pub fn scheme(&self) -> &str {
        &self.scheme
    }

    /// Display root, e.g. `s3://bucket`
    pub fn root(&self) -> &str {
        &self.root
    }

    /// Object path for a key within this location
    pub fn object_path(&self, key: &str) -> ObjectPath {
        ObjectPath::from(key.trim_matches('/'))
    }

    /// Full display path of a key, for logging and results
    pub fn display_path(&self, key: &str) -> String {
        format!("{}/{}", self.root.trim_end_matches('/'), key.trim_matches('/'))
    }
}
