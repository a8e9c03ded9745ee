//! Per-document chunk → embed → upsert pipeline.

use crate::error::IndexingError;
use crate::models::{DocumentStats, IndexRecord, RecordMetadata};
use crate::services::chunker::LineChunker;
use crate::services::embedding::{embed_chunks, is_valid_vector, Embedder};
use crate::services::vector_store::{upsert_records, VectorIndex};

/// Index one canonical document into the vector store.
///
/// Aborts (without upserting anything) when the embedder returned fewer
/// vectors than there are chunks, since pairing them back up positionally
/// would attach the wrong metadata. Chunks whose vector fails validation are
/// dropped individually.
pub async fn index_document(
    chunker: &LineChunker,
    embedder: &dyn Embedder,
    index: &dyn VectorIndex,
    key: &str,
    text: &str,
    batch_size: usize,
    expected_dimension: usize,
) -> Result<DocumentStats, IndexingError> {
    let chunks = chunker.chunk(text);
    if chunks.is_empty() {
        tracing::debug!(file = key, "no chunks generated, nothing to index");
        return Ok(DocumentStats {
            storage_key: key.to_string(),
            ..Default::default()
        });
    }

    let vectors = embed_chunks(embedder, &chunks, batch_size).await;
    if vectors.len() != chunks.len() {
        return Err(IndexingError::CountMismatch {
            chunks: chunks.len(),
            vectors: vectors.len(),
        });
    }

    let total_chunks = chunks.len();
    let mut records = Vec::with_capacity(total_chunks);
    let mut skipped_invalid = 0;

    for (chunk_index, (chunk, values)) in chunks.into_iter().zip(vectors).enumerate() {
        if !is_valid_vector(&values, expected_dimension) {
            tracing::warn!(file = key, chunk = chunk_index, "dropping chunk with invalid vector");
            skipped_invalid += 1;
            continue;
        }
        records.push(IndexRecord {
            id: IndexRecord::record_id(key, chunk_index),
            values,
            metadata: RecordMetadata {
                text: chunk,
                file: key.to_string(),
                chunk_index,
                total_chunks,
            },
        });
    }

    let upserted = upsert_records(index, records).await;

    Ok(DocumentStats {
        storage_key: key.to_string(),
        chunks: total_chunks,
        upserted,
        skipped_invalid,
    })
}
