//! Local filesystem object store.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;
use tracing::debug;

use barkeep_core::config::storage::StorageConfig;
use barkeep_core::error::{AppError, ErrorKind};
use barkeep_core::result::AppResult;
use barkeep_core::traits::object_store::{ObjectStore, StoredObject};

/// Object store backed by a directory on the local filesystem.
///
/// Keys map to paths under the root; each stored object is served under
/// `public_base_url`, and URLs returned by [`ObjectStore::put`] resolve back
/// to their file for deletion and existence checks.
#[derive(Debug, Clone)]
pub struct LocalObjectStore {
    /// Root directory for all stored objects.
    root: PathBuf,
    /// Base URL prefix under which stored objects are served.
    public_base_url: String,
}

impl LocalObjectStore {
    /// Create a local object store rooted at the configured data directory.
    pub async fn new(config: &StorageConfig) -> AppResult<Self> {
        let root = PathBuf::from(&config.data_root);
        fs::create_dir_all(&root).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to create storage root: {}", root.display()),
                e,
            )
        })?;
        Ok(Self {
            root,
            public_base_url: config.public_base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Resolve a key to an absolute path within the root.
    fn resolve(&self, key: &str) -> PathBuf {
        let clean = key.trim_start_matches('/');
        self.root.join(clean)
    }

    /// Map a public URL back to the key it was issued for.
    fn key_for_url(&self, url: &str) -> AppResult<String> {
        let key = url
            .strip_prefix(&self.public_base_url)
            .map(|rest| rest.trim_start_matches('/'))
            .filter(|rest| !rest.is_empty() && !rest.contains(".."))
            .ok_or_else(|| {
                AppError::validation(format!("URL is not served by this store: {url}"))
            })?;
        Ok(key.to_string())
    }

    /// Ensure the parent directory of a path exists.
    async fn ensure_parent(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to create parent directory: {}", parent.display()),
                    e,
                )
            })?;
        }
        Ok(())
    }
}

#[async_trait]
impl ObjectStore for LocalObjectStore {
    fn provider_type(&self) -> &str {
        "local"
    }

    async fn health_check(&self) -> AppResult<bool> {
        Ok(self.root.exists() && self.root.is_dir())
    }

    async fn put(&self, key: &str, data: Bytes) -> AppResult<StoredObject> {
        let full_path = self.resolve(key);
        self.ensure_parent(&full_path).await?;

        fs::write(&full_path, &data).await.map_err(|e| {
            AppError::with_source(
                ErrorKind::Storage,
                format!("Failed to write object: {key}"),
                e,
            )
        })?;

        debug!(key, bytes = data.len(), "Stored object");
        Ok(StoredObject {
            url: format!("{}/{}", self.public_base_url, key.trim_start_matches('/')),
            size_bytes: data.len() as u64,
        })
    }

    async fn delete_by_url(&self, url: &str) -> AppResult<()> {
        let key = self.key_for_url(url)?;
        let full_path = self.resolve(&key);
        if full_path.exists() {
            fs::remove_file(&full_path).await.map_err(|e| {
                AppError::with_source(
                    ErrorKind::Storage,
                    format!("Failed to delete object: {key}"),
                    e,
                )
            })?;
            debug!(key, "Deleted object");
        }
        Ok(())
    }

    async fn exists_by_url(&self, url: &str) -> AppResult<bool> {
        let key = self.key_for_url(url)?;
        Ok(self.resolve(&key).exists())
    }
}
