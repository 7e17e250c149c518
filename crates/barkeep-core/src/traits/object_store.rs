//! Object store trait for pluggable blob storage backends.

use async_trait::async_trait;
use bytes::Bytes;

use crate::result::AppResult;

/// The result of storing an object.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct StoredObject {
    /// Public URL under which the object is served.
    pub url: String,
    /// Size of the stored object in bytes.
    pub size_bytes: u64,
}

/// Trait for key-addressed blob storage returning a public URL per object.
///
/// The [`ObjectStore`] trait is defined here in `barkeep-core` and
/// implemented in `barkeep-storage`. Keys are caller-chosen; the store maps
/// each key to a stable public URL and can resolve that URL back to the
/// object for deletion.
#[async_trait]
pub trait ObjectStore: Send + Sync + std::fmt::Debug + 'static {
    /// Return the provider type name (e.g., "local").
    fn provider_type(&self) -> &str;

    /// Check whether the provider is healthy and reachable.
    async fn health_check(&self) -> AppResult<bool>;

    /// Store an object under the given key and return its public URL.
    async fn put(&self, key: &str, data: Bytes) -> AppResult<StoredObject>;

    /// Delete the object behind a previously returned public URL.
    ///
    /// Deleting a URL that no longer resolves to an object is not an error.
    async fn delete_by_url(&self, url: &str) -> AppResult<()>;

    /// Check whether an object exists behind a public URL.
    async fn exists_by_url(&self, url: &str) -> AppResult<bool>;
}
