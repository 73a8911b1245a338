//! Storage Abstraction
//!
//! Provides a unified bucket/path interface for object storage backends.

use async_trait::async_trait;
use bytes::Bytes;
use shelf_core::error::{ShelfError, ValidationErrors};
use thiserror::Error;

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("File not found: {0}")]
    NotFound(String),
    #[error("File already exists: {0}")]
    AlreadyExists(String),
    #[error("Invalid path: {0}")]
    InvalidPath(String),
    #[error("Wrong url: {0}")]
    InvalidUrl(String),
    #[error("Unsupported content type: {0}")]
    UnsupportedContentType(String),
    #[error("File too large: {size} bytes (max: {max} bytes)")]
    TooLarge { size: usize, max: usize },
    #[error("Image processing failed: {0}")]
    Image(String),
    #[error("Upload stream failed: {0}")]
    Stream(String),
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("Storage backend error: {0}")]
    BackendError(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for ShelfError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::TooLarge { size, max } => ShelfError::PayloadTooLarge { size, max },
            StorageError::UnsupportedContentType(_) | StorageError::Image(_) => {
                ShelfError::Validation(ValidationErrors::single("file", err.to_string()))
            }
            StorageError::InvalidUrl(_) | StorageError::InvalidPath(_) => {
                let mut errors = ValidationErrors::new();
                errors.add_base(err.to_string());
                ShelfError::Validation(errors)
            }
            StorageError::NotFound(path) => ShelfError::NotFound { entity: "File", id: path },
            other => ShelfError::Storage(other.to_string()),
        }
    }
}

/// Options for a single upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOptions {
    pub content_type: String,
    /// Overwrite an existing object at the same path
    pub upsert: bool,
}

/// Storage trait - unified interface for storage backends
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    /// Store `data` at `path` inside `bucket`, returning the stored path
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        data: Bytes,
        options: UploadOptions,
    ) -> StorageResult<String>;

    /// Public URL of an object. Does not check that the object exists.
    fn public_url(&self, bucket: &str, path: &str) -> String;

    /// Remove objects by path
    async fn remove(&self, bucket: &str, paths: &[String]) -> StorageResult<()>;

    /// Get storage name for logging
    fn name(&self) -> &str;
}

/// Reject empty, absolute and traversing object paths
pub fn validate_path(path: &str) -> StorageResult<()> {
    if path.is_empty()
        || path.starts_with('/')
        || path.starts_with('\\')
        || path.split('/').any(|segment| segment == "..")
    {
        return Err(StorageError::InvalidPath(path.to_string()));
    }
    Ok(())
}

/// `{base}/storage/v1/object/public/{bucket}/{path}`
pub fn public_object_url(base_url: &str, bucket: &str, path: &str) -> String {
    format!(
        "{}/storage/v1/object/public/{}/{}",
        base_url.trim_end_matches('/'),
        bucket,
        path
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_path() {
        assert!(validate_path("u_1/profile-1.png").is_ok());
        assert!(validate_path("").is_err());
        assert!(validate_path("/etc/passwd").is_err());
        assert!(matches!(
            validate_path("u_1/../u_2/profile.png"),
            Err(StorageError::InvalidPath(_))
        ));
    }

    #[test]
    fn test_public_object_url() {
        assert_eq!(
            public_object_url("https://abc.supabase.co/", "profile-pictures", "u_1/p.png"),
            "https://abc.supabase.co/storage/v1/object/public/profile-pictures/u_1/p.png"
        );
    }

    #[test]
    fn test_error_mapping() {
        let err: ShelfError = StorageError::TooLarge { size: 10, max: 5 }.into();
        assert_eq!(err.status_code(), 413);

        let err: ShelfError = StorageError::BackendError("500".into()).into();
        assert_eq!(err.status_code(), 502);

        let err: ShelfError = StorageError::InvalidUrl("x".into()).into();
        assert_eq!(err.status_code(), 400);
    }
}
