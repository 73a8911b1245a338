//! Supabase storage backend
//!
//! Talks to the storage REST API with the service role key.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, instrument};

use crate::storage::{
    public_object_url, validate_path, ObjectStorage, StorageError, StorageResult, UploadOptions,
};

pub struct SupabaseStorage {
    client: Client,
    base_url: String,
    service_role_key: String,
}

/// Error body returned by the storage API
#[derive(Debug, Deserialize)]
struct ApiError {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl SupabaseStorage {
    pub fn new(base_url: impl Into<String>, service_role_key: impl Into<String>) -> Self {
        Self::with_client(Client::new(), base_url, service_role_key)
    }

    pub fn with_client(
        client: Client,
        base_url: impl Into<String>,
        service_role_key: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            service_role_key: service_role_key.into(),
        }
    }

    fn object_url(&self, bucket: &str, path: Option<&str>) -> String {
        match path {
            Some(path) => format!("{}/storage/v1/object/{}/{}", self.base_url, bucket, path),
            None => format!("{}/storage/v1/object/{}", self.base_url, bucket),
        }
    }

    async fn error_from(resp: reqwest::Response) -> StorageError {
        let status = resp.status();
        let body = resp.text().await.unwrap_or_default();
        let detail = serde_json::from_str::<ApiError>(&body)
            .ok()
            .and_then(|e| e.message.or(e.error))
            .unwrap_or(body);
        StorageError::BackendError(format!("supabase {}: {}", status.as_u16(), detail))
    }
}

#[async_trait]
impl ObjectStorage for SupabaseStorage {
    #[instrument(skip(self, data, options), fields(size = data.len()))]
    async fn upload(
        &self,
        bucket: &str,
        path: &str,
        data: Bytes,
        options: UploadOptions,
    ) -> StorageResult<String> {
        validate_path(path)?;

        let resp = self
            .client
            .post(self.object_url(bucket, Some(path)))
            .bearer_auth(&self.service_role_key)
            .header("apikey", &self.service_role_key)
            .header(reqwest::header::CONTENT_TYPE, &options.content_type)
            .header("cache-control", "max-age=3600")
            .header("x-upsert", if options.upsert { "true" } else { "false" })
            .body(data)
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(Self::error_from(resp).await);
        }

        debug!(bucket, path, "Uploaded object");
        Ok(path.to_string())
    }

    fn public_url(&self, bucket: &str, path: &str) -> String {
        public_object_url(&self.base_url, bucket, path)
    }

    #[instrument(skip(self))]
    async fn remove(&self, bucket: &str, paths: &[String]) -> StorageResult<()> {
        for path in paths {
            validate_path(path)?;
        }

        let resp = self
            .client
            .delete(self.object_url(bucket, None))
            .bearer_auth(&self.service_role_key)
            .header("apikey", &self.service_role_key)
            .json(&serde_json::json!({ "prefixes": paths }))
            .send()
            .await?;

        if !resp.status().is_success() {
            return Err(Self::error_from(resp).await);
        }

        debug!(bucket, count = paths.len(), "Removed objects");
        Ok(())
    }

    fn name(&self) -> &str {
        "supabase"
    }
}
