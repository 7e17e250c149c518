//! Background image manager.
//!
//! Owns the app-wide background image list: validated uploads into the
//! object store, the persisted URL list, and deletion across both.

use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tracing::{debug, warn};
use uuid::Uuid;

use barkeep_core::config::storage::StorageConfig;
use barkeep_core::error::AppError;
use barkeep_core::result::AppResult;
use barkeep_core::traits::object_store::ObjectStore;
use barkeep_entity::image::BackgroundImage;
use barkeep_store::repositories::BackgroundImageRepository;

/// Persisted list of background image URLs.
#[async_trait]
pub trait ImageList: Send + Sync + std::fmt::Debug + 'static {
    /// Append a URL to the list.
    async fn append(&self, url: &str) -> AppResult<BackgroundImage>;

    /// Remove a URL from the list. Returns `true` if it was present.
    async fn remove(&self, url: &str) -> AppResult<bool>;

    /// All images in upload order.
    async fn list(&self) -> AppResult<Vec<BackgroundImage>>;
}

#[async_trait]
impl ImageList for BackgroundImageRepository {
    async fn append(&self, url: &str) -> AppResult<BackgroundImage> {
        BackgroundImageRepository::append(self, url).await
    }

    async fn remove(&self, url: &str) -> AppResult<bool> {
        BackgroundImageRepository::remove(self, url).await
    }

    async fn list(&self) -> AppResult<Vec<BackgroundImage>> {
        BackgroundImageRepository::list(self).await
    }
}

/// Manager for uploading, listing and deleting background images.
///
/// Uploads are validated before the object store is touched: a rejected
/// file never causes a store call. Deletion spans the object store and the
/// URL list; the object is removed first, so a failed list update leaves a
/// dangling URL rather than an orphaned object reference.
#[derive(Debug, Clone)]
pub struct BackgroundImageManager {
    store: Arc<dyn ObjectStore>,
    list: Arc<dyn ImageList>,
    images_prefix: String,
    max_image_bytes: u64,
}

impl BackgroundImageManager {
    /// Create a manager over an object store and a URL list.
    pub fn new(store: Arc<dyn ObjectStore>, list: Arc<dyn ImageList>, config: &StorageConfig) -> Self {
        Self {
            store,
            list,
            images_prefix: config.images_prefix.trim_matches('/').to_string(),
            max_image_bytes: config.max_image_bytes,
        }
    }

    /// Validate and store an uploaded image, then append its URL to the list.
    pub async fn upload(
        &self,
        filename: &str,
        content_type: &str,
        data: Bytes,
    ) -> AppResult<BackgroundImage> {
        self.validate(content_type, data.len() as u64)?;

        let key = format!(
            "{}/{}-{}",
            self.images_prefix,
            Uuid::new_v4(),
            sanitize_filename(filename)
        );
        let stored = self.store.put(&key, data).await?;
        let image = self.list.append(&stored.url).await?;

        debug!(url = %image.url, bytes = stored.size_bytes, "Background image uploaded");
        Ok(image)
    }

    /// Delete an image from the object store and the URL list.
    pub async fn delete(&self, url: &str) -> AppResult<()> {
        self.store.delete_by_url(url).await?;
        if !self.list.remove(url).await? {
            warn!(url, "Deleted object was not in the image list");
        }
        Ok(())
    }

    /// All background images in upload order.
    pub async fn list(&self) -> AppResult<Vec<BackgroundImage>> {
        self.list.list().await
    }

    /// Reject non-image content and oversized payloads.
    fn validate(&self, content_type: &str, size_bytes: u64) -> AppResult<()> {
        if !content_type.starts_with("image/") {
            return Err(AppError::validation(format!(
                "Only image uploads are accepted, got {content_type}"
            )));
        }
        if size_bytes > self.max_image_bytes {
            return Err(AppError::validation(format!(
                "Image exceeds the {} byte limit ({size_bytes} bytes)",
                self.max_image_bytes
            )));
        }
        Ok(())
    }
}

/// Keep filenames safe for use as object keys.
fn sanitize_filename(name: &str) -> String {
    let cleaned: String = name
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '-'
            }
        })
        .collect();
    if cleaned.is_empty() {
        "upload".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tokio::sync::Mutex;

    use barkeep_core::error::ErrorKind;
    use barkeep_core::traits::object_store::StoredObject;

    #[derive(Debug, Default)]
    struct CountingStore {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ObjectStore for CountingStore {
        fn provider_type(&self) -> &str {
            "counting"
        }

        async fn health_check(&self) -> AppResult<bool> {
            Ok(true)
        }

        async fn put(&self, key: &str, data: Bytes) -> AppResult<StoredObject> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(StoredObject {
                url: format!("http://test/{key}"),
                size_bytes: data.len() as u64,
            })
        }

        async fn delete_by_url(&self, _url: &str) -> AppResult<()> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        async fn exists_by_url(&self, _url: &str) -> AppResult<bool> {
            Ok(true)
        }
    }

    #[derive(Debug, Default)]
    struct MemoryList {
        urls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ImageList for MemoryList {
        async fn append(&self, url: &str) -> AppResult<BackgroundImage> {
            self.urls.lock().await.push(url.to_string());
            Ok(BackgroundImage {
                url: url.to_string(),
                created_at: chrono::Utc::now(),
            })
        }

        async fn remove(&self, url: &str) -> AppResult<bool> {
            let mut urls = self.urls.lock().await;
            let before = urls.len();
            urls.retain(|u| u != url);
            Ok(urls.len() < before)
        }

        async fn list(&self) -> AppResult<Vec<BackgroundImage>> {
            Ok(self
                .urls
                .lock()
                .await
                .iter()
                .map(|u| BackgroundImage {
                    url: u.clone(),
                    created_at: chrono::Utc::now(),
                })
                .collect())
        }
    }

    fn manager(store: Arc<CountingStore>, list: Arc<MemoryList>) -> BackgroundImageManager {
        BackgroundImageManager::new(
            store,
            list,
            &StorageConfig {
                max_image_bytes: 10 * 1024 * 1024,
                ..StorageConfig::default()
            },
        )
    }

    #[tokio::test]
    async fn test_upload_appends_url() {
        let store = Arc::new(CountingStore::default());
        let list = Arc::new(MemoryList::default());
        let manager = manager(Arc::clone(&store), Arc::clone(&list));

        let image = manager
            .upload("night bar.png", "image/png", Bytes::from("png"))
            .await
            .unwrap();

        assert!(image.url.starts_with("http://test/backgrounds/"));
        assert!(image.url.ends_with("night-bar.png"));
        assert_eq!(manager.list().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_oversized_upload_never_reaches_store() {
        let store = Arc::new(CountingStore::default());
        let list = Arc::new(MemoryList::default());
        let manager = manager(Arc::clone(&store), Arc::clone(&list));

        let big = Bytes::from(vec![0u8; 15 * 1024 * 1024]);
        let err = manager.upload("huge.png", "image/png", big).await.unwrap_err();

        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
        assert!(list.urls.lock().await.is_empty());
    }

    #[tokio::test]
    async fn test_non_image_rejected_before_store() {
        let store = Arc::new(CountingStore::default());
        let list = Arc::new(MemoryList::default());
        let manager = manager(Arc::clone(&store), Arc::clone(&list));

        let err = manager
            .upload("notes.pdf", "application/pdf", Bytes::from("%PDF"))
            .await
            .unwrap_err();

        assert_eq!(err.kind, ErrorKind::Validation);
        assert_eq!(store.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_delete_removes_from_both() {
        let store = Arc::new(CountingStore::default());
        let list = Arc::new(MemoryList::default());
        let manager = manager(Arc::clone(&store), Arc::clone(&list));

        let image = manager
            .upload("a.png", "image/png", Bytes::from("a"))
            .await
            .unwrap();
        manager.delete(&image.url).await.unwrap();

        assert!(manager.list().await.unwrap().is_empty());
        // One put, one delete.
        assert_eq!(store.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("night bar.png"), "night-bar.png");
        assert_eq!(sanitize_filename("../../etc"), "..-..-etc");
        assert_eq!(sanitize_filename(""), "upload");
    }
}
