mod blob_store;
mod chunker;
mod embedding;
mod indexer;
mod sync;
mod vector_store;

pub use blob_store::{BlobStore, GcsBackend};
pub use chunker::LineChunker;
pub use embedding::{embed_chunks, is_valid_vector, Embedder, EmbeddingClient};
pub use indexer::index_document;
pub use sync::{SyncOptions, SyncPipeline, SPEC_CONTENT_TYPE};
pub use vector_store::{upsert_records, QdrantBackend, VectorIndex, UPSERT_BATCH_SIZE};
