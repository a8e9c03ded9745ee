//! Blob storage for canonical specification documents.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};

use crate::error::BlobStoreError;
use crate::models::BlobStoreConfig;

/// Object storage holding one canonical document per storage key.
#[async_trait]
pub trait BlobStore: Send + Sync {
    async fn exists(&self, key: &str) -> Result<bool, BlobStoreError>;

    /// Download an object as UTF-8 text.
    async fn download(&self, key: &str) -> Result<String, BlobStoreError>;

    /// Upload text, fully overwriting any existing object at `key`.
    async fn upload(&self, key: &str, content: &str, content_type: &str)
        -> Result<(), BlobStoreError>;
}

/// GCS-style JSON object API backend.
pub struct GcsBackend {
    client: Client,
    base_url: String,
    bucket: String,
    token: String,
}

impl GcsBackend {
    pub fn new(config: &BlobStoreConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            bucket: config.bucket.clone(),
            token: config.token.clone(),
        }
    }

    /// Metadata/media URL of an object. Object names contain slashes, so the
    /// key is percent-encoded into a single path segment.
    fn object_url(&self, key: &str) -> String {
        format!(
            "{}/storage/v1/b/{}/o/{}",
            self.base_url,
            self.bucket,
            urlencoding::encode(key)
        )
    }

    /// Reachability probe against the bucket metadata endpoint.
    pub async fn check_bucket(&self) -> Result<bool, BlobStoreError> {
        let url = format!("{}/storage/v1/b/{}", self.base_url, self.bucket);
        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await?;
        Ok(response.status().is_success())
    }
}

#[async_trait]
impl BlobStore for GcsBackend {
    async fn exists(&self, key: &str) -> Result<bool, BlobStoreError> {
        let response = self
            .client
            .get(self.object_url(key))
            .bearer_auth(&self.token)
            .send()
            .await?;

        match response.status() {
            status if status.is_success() => Ok(true),
            StatusCode::NOT_FOUND => Ok(false),
            status => Err(BlobStoreError::Status {
                status,
                key: key.to_string(),
            }),
        }
    }

    async fn download(&self, key: &str) -> Result<String, BlobStoreError> {
        let response = self
            .client
            .get(self.object_url(key))
            .query(&[("alt", "media")])
            .bearer_auth(&self.token)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(BlobStoreError::Status {
                status: response.status(),
                key: key.to_string(),
            });
        }

        Ok(response.text().await?)
    }

    async fn upload(
        &self,
        key: &str,
        content: &str,
        content_type: &str,
    ) -> Result<(), BlobStoreError> {
        let url = format!("{}/upload/storage/v1/b/{}/o", self.base_url, self.bucket);
        let response = self
            .client
            .post(&url)
            .query(&[("uploadType", "media"), ("name", key)])
            .bearer_auth(&self.token)
            .header(reqwest::header::CONTENT_TYPE, content_type)
            .body(content.to_string())
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(BlobStoreError::Status {
                status: response.status(),
                key: key.to_string(),
            });
        }

        Ok(())
    }
}
