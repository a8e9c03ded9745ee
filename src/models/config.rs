use std::str::FromStr;

use crate::error::ConfigError;

pub const DEFAULT_BLOB_BASE_URL: &str = "https://storage.googleapis.com";
pub const DEFAULT_EMBEDDING_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-004";
pub const DEFAULT_EMBEDDING_DIMENSION: usize = 768;
pub const DEFAULT_QDRANT_URL: &str = "http://localhost:6334";
pub const DEFAULT_COLLECTION: &str = "api_specs";

/// Full runtime configuration, assembled from the process environment.
///
/// There is no config file; a scheduled job carries everything in its
/// environment. `.env` files are honored via dotenvy for local runs.
#[derive(Debug, Clone)]
pub struct Config {
    pub catalog: CatalogConfig,
    pub blob_store: BlobStoreConfig,
    pub embedding: EmbeddingConfig,
    pub vector_store: VectorStoreConfig,
    pub chunking: ChunkingConfig,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Self {
            catalog: CatalogConfig {
                base_url: require("CATALOG_BASE_URL")?,
                token: require("CATALOG_TOKEN")?,
            },
            blob_store: BlobStoreConfig {
                base_url: optional("BLOB_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_BLOB_BASE_URL.to_string()),
                bucket: require("BLOB_BUCKET")?,
                token: require("BLOB_TOKEN")?,
            },
            embedding: EmbeddingConfig {
                base_url: optional("EMBEDDING_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_EMBEDDING_BASE_URL.to_string()),
                api_key: require("EMBEDDING_API_KEY")?,
                model: optional("EMBEDDING_MODEL")
                    .unwrap_or_else(|| DEFAULT_EMBEDDING_MODEL.to_string()),
                output_dimension: parse_or("EMBEDDING_DIMENSION", DEFAULT_EMBEDDING_DIMENSION)?,
                batch_size: parse_or("EMBEDDING_BATCH_SIZE", default_embed_batch_size())?,
                timeout_secs: parse_or("EMBEDDING_TIMEOUT_SECS", default_timeout())?,
            },
            vector_store: VectorStoreConfig {
                url: optional("QDRANT_URL").unwrap_or_else(|| DEFAULT_QDRANT_URL.to_string()),
                api_key: optional("QDRANT_API_KEY"),
                collection: optional("QDRANT_COLLECTION")
                    .unwrap_or_else(|| DEFAULT_COLLECTION.to_string()),
            },
            chunking: ChunkingConfig {
                chunk_size: parse_or("CHUNK_SIZE", default_chunk_size())?,
                overlap: parse_or("CHUNK_OVERLAP", default_chunk_overlap())?,
            },
        })
    }
}

/// Gateway control-plane catalog access.
#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub base_url: String,
    pub token: String,
}

/// Blob store bucket holding the canonical YAML documents.
#[derive(Debug, Clone)]
pub struct BlobStoreConfig {
    pub base_url: String,
    pub bucket: String,
    pub token: String,
}

/// Hosted embedding service access.
#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub output_dimension: usize,
    pub batch_size: usize,
    pub timeout_secs: u64,
}

fn default_embed_batch_size() -> usize {
    5
}

fn default_timeout() -> u64 {
    120
}

/// Qdrant connection and target collection.
#[derive(Debug, Clone)]
pub struct VectorStoreConfig {
    pub url: String,
    pub api_key: Option<String>,
    pub collection: String,
}

impl Default for VectorStoreConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_QDRANT_URL.to_string(),
            api_key: None,
            collection: DEFAULT_COLLECTION.to_string(),
        }
    }
}

/// Chunking parameters, in characters.
#[derive(Debug, Clone)]
pub struct ChunkingConfig {
    pub chunk_size: usize,
    pub overlap: usize,
}

fn default_chunk_size() -> usize {
    512
}

fn default_chunk_overlap() -> usize {
    50
}

impl Default for ChunkingConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            overlap: default_chunk_overlap(),
        }
    }
}

fn require(name: &str) -> Result<String, ConfigError> {
    optional(name).ok_or_else(|| ConfigError::MissingVar(name.to_string()))
}

fn optional(name: &str) -> Option<String> {
    match std::env::var(name) {
        Ok(value) if !value.trim().is_empty() => Some(value),
        _ => None,
    }
}

fn parse_or<T: FromStr>(name: &str, default: T) -> Result<T, ConfigError> {
    match optional(name) {
        Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidVar {
            name: name.to_string(),
            reason: format!("cannot parse {:?}", raw),
        }),
        None => Ok(default),
    }
}
