//! Background image upload and delete flows.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::Mutex;

use barkeep_core::config::storage::StorageConfig;
use barkeep_core::error::{AppError, ErrorKind};
use barkeep_core::result::AppResult;
use barkeep_core::traits::object_store::{ObjectStore, StoredObject};
use barkeep_entity::image::BackgroundImage;
use barkeep_storage::{BackgroundImageManager, ImageList, LocalObjectStore};

#[derive(Debug, Default)]
struct CountingStore {
    puts: AtomicUsize,
    deletes: AtomicUsize,
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
        self.puts.fetch_add(1, Ordering::SeqCst);
        Ok(StoredObject {
            url: format!("http://test/{key}"),
            size_bytes: data.len() as u64,
        })
    }

    async fn delete_by_url(&self, _url: &str) -> AppResult<()> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn exists_by_url(&self, _url: &str) -> AppResult<bool> {
        Ok(true)
    }
}

#[derive(Debug, Default)]
struct MemoryList {
    urls: Mutex<Vec<String>>,
    fail_removes: AtomicBool,
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
        if self.fail_removes.load(Ordering::SeqCst) {
            return Err(AppError::database("list unreachable"));
        }
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

fn config() -> StorageConfig {
    StorageConfig::default()
}

#[tokio::test]
async fn oversized_upload_never_contacts_store() {
    let store = Arc::new(CountingStore::default());
    let list = Arc::new(MemoryList::default());
    let manager = BackgroundImageManager::new(
        Arc::clone(&store) as _,
        Arc::clone(&list) as _,
        &config(),
    );

    let fifteen_mb = Bytes::from(vec![0u8; 15 * 1024 * 1024]);
    let err = manager
        .upload("huge.jpg", "image/jpeg", fifteen_mb)
        .await
        .unwrap_err();

    assert_eq!(err.kind, ErrorKind::Validation);
    assert_eq!(store.puts.load(Ordering::SeqCst), 0);
    assert!(list.urls.lock().await.is_empty());
}

#[tokio::test]
async fn upload_roundtrip_through_local_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(
        LocalObjectStore::new(&StorageConfig {
            data_root: dir.path().to_string_lossy().into_owned(),
            ..config()
        })
        .await
        .unwrap(),
    );
    let list = Arc::new(MemoryList::default());
    let manager = BackgroundImageManager::new(
        Arc::clone(&store) as _,
        Arc::clone(&list) as _,
        &config(),
    );

    let image = manager
        .upload("terrace.png", "image/png", Bytes::from("png bytes"))
        .await
        .unwrap();
    assert!(store.exists_by_url(&image.url).await.unwrap());
    assert_eq!(manager.list().await.unwrap().len(), 1);

    manager.delete(&image.url).await.unwrap();
    assert!(!store.exists_by_url(&image.url).await.unwrap());
    assert!(manager.list().await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_partial_failure_leaves_dangling_url() {
    let store = Arc::new(CountingStore::default());
    let list = Arc::new(MemoryList::default());
    let manager = BackgroundImageManager::new(
        Arc::clone(&store) as _,
        Arc::clone(&list) as _,
        &config(),
    );

    let image = manager
        .upload("bar.png", "image/png", Bytes::from("png"))
        .await
        .unwrap();

    // Object delete succeeds, list update fails: the URL stays listed and
    // no reconciliation happens.
    list.fail_removes.store(true, Ordering::SeqCst);
    assert!(manager.delete(&image.url).await.is_err());
    assert_eq!(store.deletes.load(Ordering::SeqCst), 1);
    assert_eq!(list.urls.lock().await.len(), 1);
}
