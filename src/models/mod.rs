mod catalog;
mod config;
mod document;
mod report;

pub use catalog::{
    ApiListResponse, ApiSummary, ApiVersionDetail, ApiVersionSummary, SpecPayload,
    VersionListResponse,
};
pub use config::{
    BlobStoreConfig, CatalogConfig, ChunkingConfig, Config, EmbeddingConfig, VectorStoreConfig,
    DEFAULT_COLLECTION, DEFAULT_EMBEDDING_DIMENSION, DEFAULT_EMBEDDING_MODEL, DEFAULT_QDRANT_URL,
};
pub use document::{IndexRecord, RecordMetadata, SpecDocument};
pub use report::{
    ApiOutcome, ApiReport, DocumentStats, SyncReport, SyncStage, COMPLETION_MESSAGE,
};
