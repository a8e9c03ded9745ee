//! Vector index backend and batched upsert.

use std::collections::HashMap;

use async_trait::async_trait;
use qdrant_client::qdrant::{
    CreateCollectionBuilder, Distance, PointStruct, UpsertPointsBuilder, VectorParamsBuilder,
};
use qdrant_client::Qdrant;

use crate::error::VectorStoreError;
use crate::models::{IndexRecord, VectorStoreConfig};

/// Documented per-call limit of the index service.
pub const UPSERT_BATCH_SIZE: usize = 100;

/// Write-only view of the vector index.
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Upsert records in a single call. Callers are responsible for batching.
    async fn upsert(&self, records: Vec<IndexRecord>) -> Result<(), VectorStoreError>;
}

/// Qdrant vector index backend.
pub struct QdrantBackend {
    client: Qdrant,
    collection: String,
    embedding_dim: u64,
}

impl QdrantBackend {
    /// Create a new Qdrant backend from configuration.
    pub fn new(config: &VectorStoreConfig, embedding_dim: u64) -> Result<Self, VectorStoreError> {
        let mut builder = Qdrant::from_url(&config.url);

        if let Some(ref api_key) = config.api_key {
            builder = builder.api_key(api_key.clone());
        }

        let client = builder
            .build()
            .map_err(|e| VectorStoreError::ConnectionError(e.to_string()))?;

        Ok(Self {
            client,
            collection: config.collection.clone(),
            embedding_dim,
        })
    }

    pub async fn health_check(&self) -> Result<bool, VectorStoreError> {
        self.client
            .health_check()
            .await
            .map(|_| true)
            .map_err(|e| VectorStoreError::ConnectionError(e.to_string()))
    }

    /// Create the collection if it does not exist yet.
    pub async fn ensure_collection(&self) -> Result<(), VectorStoreError> {
        match self.client.collection_info(&self.collection).await {
            Ok(_) => return Ok(()),
            Err(e) => {
                let msg = e.to_string();
                if !msg.contains("not found") && !msg.contains("doesn't exist") {
                    return Err(VectorStoreError::CollectionError(msg));
                }
            }
        }

        let create_collection = CreateCollectionBuilder::new(&self.collection).vectors_config(
            VectorParamsBuilder::new(self.embedding_dim, Distance::Cosine),
        );

        self.client
            .create_collection(create_collection)
            .await
            .map_err(|e| VectorStoreError::CollectionError(e.to_string()))?;

        Ok(())
    }
}

#[async_trait]
impl VectorIndex for QdrantBackend {
    async fn upsert(&self, records: Vec<IndexRecord>) -> Result<(), VectorStoreError> {
        if records.is_empty() {
            return Ok(());
        }

        let points: Vec<PointStruct> = records
            .into_iter()
            .map(|record| {
                let point_id = record.point_id();
                let mut payload: HashMap<String, qdrant_client::qdrant::Value> = HashMap::new();
                payload.insert("id".to_string(), record.id.into());
                payload.insert("text".to_string(), record.metadata.text.into());
                payload.insert("file".to_string(), record.metadata.file.into());
                payload.insert(
                    "chunk_index".to_string(),
                    (record.metadata.chunk_index as i64).into(),
                );
                payload.insert(
                    "total_chunks".to_string(),
                    (record.metadata.total_chunks as i64).into(),
                );
                PointStruct::new(point_id, record.values, payload)
            })
            .collect();

        let upsert = UpsertPointsBuilder::new(&self.collection, points);

        self.client
            .upsert_points(upsert)
            .await
            .map_err(|e| VectorStoreError::UpsertError(e.to_string()))?;

        Ok(())
    }
}

/// Write records in batches of at most [`UPSERT_BATCH_SIZE`].
///
/// Each batch is an independent call; a failed batch is logged and the rest
/// are still attempted. No rollback, no retry. Returns how many records were
/// written.
pub async fn upsert_records(index: &dyn VectorIndex, records: Vec<IndexRecord>) -> usize {
    let mut written = 0;

    for (batch_index, batch) in records.chunks(UPSERT_BATCH_SIZE).enumerate() {
        match index.upsert(batch.to_vec()).await {
            Ok(()) => {
                written += batch.len();
                tracing::debug!(batch = batch_index + 1, size = batch.len(), "upserted batch");
            }
            Err(e) => {
                tracing::warn!(
                    batch = batch_index + 1,
                    size = batch.len(),
                    error = %e,
                    "upsert batch failed, continuing"
                );
            }
        }
    }

    written
}
