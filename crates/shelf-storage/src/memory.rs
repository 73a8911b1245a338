//! In-memory storage for testing

use std::collections::HashMap;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::RwLock;

use crate::storage::{
    public_object_url, validate_path, ObjectStorage, StorageError, StorageResult, UploadOptions,
};

/// A stored object
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredObject {
    pub data: Bytes,
    pub content_type: String,
}

/// In-memory storage using the same public URL scheme as Supabase
pub struct MemoryStorage {
    base_url: String,
    files: RwLock<HashMap<(String, String), StoredObject>>,
}

impl Default for MemoryStorage {
    fn default() -> Self {
        Self::new("http://localhost:54321")
    }
}

impl MemoryStorage {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            files: RwLock::new(HashMap::new()),
        }
    }

    pub async fn get(&self, bucket: &str, path: &str) -> Option<StoredObject> {
        let files = self.files.read().await;
        files.get(&(bucket.to_string(), path.to_string())).cloned()
    }

    pub async fn exists(&self, bucket: &str, path: &str) -> bool {
        self.get(bucket, path).await.is_some()
    }

    pub async fn len(&self) -> usize {
        self.files.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

#[async_trait]
impl ObjectStorage for MemoryStorage {
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        data: Bytes,
        options: UploadOptions,
    ) -> StorageResult<String> {
        validate_path(path)?;

        let key = (bucket.to_string(), path.to_string());
        let mut files = self.files.write().await;
        if !options.upsert && files.contains_key(&key) {
            return Err(StorageError::AlreadyExists(path.to_string()));
        }
        files.insert(
            key,
            StoredObject {
                data,
                content_type: options.content_type,
            },
        );

        Ok(path.to_string())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        public_object_url(&self.base_url, bucket, path)
    }

    async fn remove(&self, bucket: &str, paths: &[String]) -> StorageResult<()> {
        let mut files = self.files.write().await;
        for path in paths {
            validate_path(path)?;
            files.remove(&(bucket.to_string(), path.clone()));
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
