//! Error types for the spec sync pipeline.

use thiserror::Error;

/// Errors related to configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("missing environment variable: {0}")]
    MissingVar(String),

    #[error("invalid value for {name}: {reason}")]
    InvalidVar { name: String, reason: String },
}

/// Errors related to the gateway control-plane catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("catalog returned status {status} for {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    #[error("invalid catalog response: {0}")]
    InvalidResponse(String),
}

/// Errors related to blob storage operations.
#[derive(Debug, Error)]
pub enum BlobStoreError {
    #[error("blob store request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("blob store returned status {status} for object {key}")]
    Status {
        status: reqwest::StatusCode,
        key: String,
    },
}

/// Errors related to embedding operations.
#[derive(Debug, Error)]
pub enum EmbeddingError {
    #[error("failed to connect to embedding service: {0}")]
    ConnectionError(String),

    #[error("embedding service error: {0}")]
    ServerError(String),

    #[error("embedding request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("invalid embedding response: {0}")]
    InvalidResponse(String),
}

/// Errors related to vector index operations.
#[derive(Debug, Error)]
pub enum VectorStoreError {
    #[error("failed to connect to Qdrant: {0}")]
    ConnectionError(String),

    #[error("collection error: {0}")]
    CollectionError(String),

    #[error("upsert error: {0}")]
    UpsertError(String),
}

/// Errors related to normalizing a fetched specification payload.
#[derive(Debug, Error)]
pub enum NormalizeError {
    #[error("specification payload is not valid JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("failed to render YAML: {0}")]
    YamlSerialize(#[from] serde_yaml::Error),
}

/// Errors that occur while indexing one document into the vector index.
#[derive(Debug, Error)]
pub enum IndexingError {
    #[error("embedded {vectors} of {chunks} chunks, refusing misaligned upsert")]
    CountMismatch { chunks: usize, vectors: usize },
}

/// Errors that abort a whole sync run.
///
/// Everything else is contained to a single API's outcome; see
/// [`crate::models::ApiOutcome`].
#[derive(Debug, Error)]
pub enum SyncError {
    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("catalog error: {0}")]
    Catalog(#[from] CatalogError),
}
