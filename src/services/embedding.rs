//! Embedding client for the hosted embedding service.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::error::EmbeddingError;
use crate::models::EmbeddingConfig;

/// Anything that can turn a batch of texts into vectors.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Embed one batch. Returns one vector per input text, in input order.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError>;
}

/// Request body for the `batchEmbedContents` endpoint.
#[derive(Debug, Serialize)]
struct BatchEmbedRequest<'a> {
    requests: Vec<EmbedContentRequest<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct EmbedContentRequest<'a> {
    model: String,
    content: Content<'a>,
    output_dimensionality: usize,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

/// Response from the `batchEmbedContents` endpoint.
#[derive(Debug, Deserialize)]
struct BatchEmbedResponse {
    #[serde(default)]
    embeddings: Vec<ContentEmbedding>,
}

#[derive(Debug, Deserialize)]
struct ContentEmbedding {
    values: Vec<f32>,
}

/// Client for a Gemini-style hosted embedding API.
#[derive(Debug, Clone)]
pub struct EmbeddingClient {
    client: Client,
    base_url: String,
    api_key: String,
    model: String,
    output_dimension: usize,
}

impl EmbeddingClient {
    /// Create a new embedding client with the given configuration.
    pub fn new(config: &EmbeddingConfig) -> Result<Self, EmbeddingError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| EmbeddingError::ConnectionError(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.model.clone(),
            output_dimension: config.output_dimension,
        })
    }

    /// Get the base URL of the embedding service.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

#[async_trait]
impl Embedder for EmbeddingClient {
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let url = format!("{}/models/{}:batchEmbedContents", self.base_url, self.model);
        let request = BatchEmbedRequest {
            requests: texts
                .iter()
                .map(|text| EmbedContentRequest {
                    model: format!("models/{}", self.model),
                    content: Content {
                        parts: vec![Part { text }],
                    },
                    output_dimensionality: self.output_dimension,
                })
                .collect(),
        };

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(EmbeddingError::RequestError)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(EmbeddingError::ServerError(format!(
                "status {}: {}",
                status, body
            )));
        }

        let embed_response: BatchEmbedResponse = response
            .json()
            .await
            .map_err(|e| EmbeddingError::InvalidResponse(e.to_string()))?;

        if embed_response.embeddings.len() != texts.len() {
            return Err(EmbeddingError::InvalidResponse(format!(
                "requested {} embeddings, got {}",
                texts.len(),
                embed_response.embeddings.len()
            )));
        }

        Ok(embed_response
            .embeddings
            .into_iter()
            .map(|e| e.values)
            .collect())
    }
}

/// Embed all chunks in batches, tolerating per-batch failures.
///
/// A failed batch contributes no vectors and is logged; the result may
/// therefore be shorter than `chunks`. Callers must compare lengths before
/// pairing vectors back up with chunks.
pub async fn embed_chunks(
    embedder: &dyn Embedder,
    chunks: &[String],
    batch_size: usize,
) -> Vec<Vec<f32>> {
    let batch_size = batch_size.max(1);
    let mut vectors = Vec::with_capacity(chunks.len());

    for (batch_index, batch) in chunks.chunks(batch_size).enumerate() {
        match embedder.embed_batch(batch).await {
            Ok(batch_vectors) => vectors.extend(batch_vectors),
            Err(e) => {
                tracing::warn!(
                    batch = batch_index,
                    size = batch.len(),
                    error = %e,
                    "embedding batch failed, continuing without it"
                );
            }
        }
    }

    vectors
}

/// A vector is usable only if it has the expected dimension and every
/// component is a finite number.
pub fn is_valid_vector(values: &[f32], expected_dimension: usize) -> bool {
    values.len() == expected_dimension && values.iter().all(|v| v.is_finite())
}
