//! Profile picture upload and removal
//!
//! Pictures live under `<userId>/profile-<unix seconds>.<subtype>` in the
//! profile pictures bucket and are referenced by their public URL.

use std::fmt::Display;
use std::sync::Arc;

use bytes::Bytes;
use chrono::{DateTime, Utc};
use futures::{Stream, StreamExt};
use tracing::{debug, info, instrument};

use crate::crop::{crop_image, CropOptions};
use crate::storage::{ObjectStorage, StorageError, StorageResult, UploadOptions};

/// One profile picture upload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadRequest {
    pub user_id: String,
    /// As declared by the client. Only checked to be an image type; the
    /// stored type and extension follow the decoded bytes.
    pub content_type: String,
    pub uploaded_at: DateTime<Utc>,
}

/// Object path for a new profile picture.
///
/// The extension is the content type's subtype, e.g. `image/png` gives `png`.
pub fn profile_picture_filename(user_id: &str, content_type: &str, now: DateTime<Utc>) -> String {
    let essence = content_type.split(';').next().unwrap_or_default().trim();
    let extension = essence
        .split_once('/')
        .map(|(_, subtype)| subtype)
        .filter(|s| !s.is_empty())
        .unwrap_or("bin");
    format!("{}/profile-{}.{}", user_id, now.timestamp(), extension)
}

/// Resolve the content type of an uploaded part, guessing from the file
/// name when the client did not send one
pub fn resolve_content_type(declared: Option<&str>, file_name: Option<&str>) -> String {
    match declared.map(str::trim).filter(|c| !c.is_empty()) {
        Some(content_type) => content_type.to_string(),
        None => file_name
            .map(|name| mime_guess::from_path(name).first_or_octet_stream().to_string())
            .unwrap_or_else(|| "application/octet-stream".to_string()),
    }
}

pub struct ProfilePictureService {
    storage: Arc<dyn ObjectStorage>,
    bucket: String,
    max_upload_bytes: usize,
    crop: CropOptions,
}

impl ProfilePictureService {
    pub fn new(
        storage: Arc<dyn ObjectStorage>,
        bucket: impl Into<String>,
        max_upload_bytes: usize,
    ) -> Self {
        Self {
            storage,
            bucket: bucket.into(),
            max_upload_bytes,
            crop: CropOptions::default(),
        }
    }

    pub fn with_crop(mut self, crop: CropOptions) -> Self {
        self.crop = crop;
        self
    }

    /// Every picture URL handed out by this service starts with this prefix
    pub fn public_prefix(&self) -> String {
        self.storage.public_url(&self.bucket, "")
    }

    /// Collect `stream`, crop it and upload with upsert. Returns the public URL.
    #[instrument(skip(self, stream), fields(storage = self.storage.name(), user_id = %request.user_id))]
    pub async fn upload_file<S, E>(&self, stream: S, request: UploadRequest) -> StorageResult<String>
    where
        S: Stream<Item = Result<Bytes, E>> + Send,
        E: Display,
    {
        if !request.content_type.starts_with("image/") {
            return Err(StorageError::UnsupportedContentType(request.content_type));
        }

        let data = self.collect(stream).await?;
        let size = data.len();

        let crop = self.crop;
        let cropped = tokio::task::spawn_blocking(move || crop_image(&data, crop))
            .await
            .map_err(|e| StorageError::Image(e.to_string()))??;

        let content_type = cropped.content_type();
        if content_type != request.content_type {
            debug!(declared = %request.content_type, detected = content_type, "Declared content type ignored");
        }
        let filename = profile_picture_filename(&request.user_id, content_type, request.uploaded_at);

        let path = self
            .storage
            .upload(
                &self.bucket,
                &filename,
                Bytes::from(cropped.data),
                UploadOptions {
                    content_type: content_type.to_string(),
                    upsert: true,
                },
            )
            .await?;

        let url = self.storage.public_url(&self.bucket, &path);
        info!(size, path = %path, "Profile picture uploaded");
        Ok(url)
    }

    async fn collect<S, E>(&self, stream: S) -> StorageResult<Vec<u8>>
    where
        S: Stream<Item = Result<Bytes, E>> + Send,
        E: Display,
    {
        let mut stream = std::pin::pin!(stream);
        let mut data = Vec::new();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(|e| StorageError::Stream(e.to_string()))?;
            if data.len() + chunk.len() > self.max_upload_bytes {
                return Err(StorageError::TooLarge {
                    size: data.len() + chunk.len(),
                    max: self.max_upload_bytes,
                });
            }
            data.extend_from_slice(&chunk);
        }

        if data.is_empty() {
            return Err(StorageError::Image("empty upload".to_string()));
        }
        Ok(data)
    }

    /// Remove a picture by its public URL.
    ///
    /// URLs outside this bucket's public prefix are rejected without
    /// contacting storage.
    #[instrument(skip(self))]
    pub async fn delete_profile_picture(&self, url: &str) -> StorageResult<()> {
        let prefix = self.public_prefix();
        let path = url
            .strip_prefix(prefix.as_str())
            .filter(|path| !path.is_empty())
            .ok_or_else(|| StorageError::InvalidUrl(url.to_string()))?;

        self.storage
            .remove(&self.bucket, &[path.to_string()])
            .await?;

        debug!(path, "Profile picture removed");
        Ok(())
    }
}
