use serde::Serialize;
use uuid::Uuid;

/// A canonical (YAML-normalized) specification document, keyed by API name
/// and version label.
#[derive(Debug, Clone)]
pub struct SpecDocument {
    pub api_name: String,
    pub version: String,
    /// YAML text, key order preserved as declared in the source JSON.
    pub content: String,
}

impl SpecDocument {
    pub fn new(api_name: impl Into<String>, version: impl Into<String>, content: String) -> Self {
        Self {
            api_name: api_name.into(),
            version: version.into(),
            content,
        }
    }

    /// Storage key of this document. At most one object exists per key.
    pub fn storage_key(&self) -> String {
        format!("specs/{}_v{}.yml", self.api_name, self.version)
    }
}

/// Retrievable payload stored alongside each embedding vector.
#[derive(Debug, Clone, Serialize)]
pub struct RecordMetadata {
    pub text: String,
    pub file: String,
    pub chunk_index: usize,
    pub total_chunks: usize,
}

/// One unit written to the vector index. Write-only from this system's
/// perspective; retrieval happens elsewhere.
#[derive(Debug, Clone)]
pub struct IndexRecord {
    pub id: String,
    pub values: Vec<f32>,
    pub metadata: RecordMetadata,
}

impl IndexRecord {
    /// Readable record identifier: `<storage-key>-chunk-<index>`.
    pub fn record_id(file: &str, chunk_index: usize) -> String {
        format!("{}-chunk-{}", file, chunk_index)
    }

    /// Deterministic point id for the index backend. Qdrant only accepts
    /// UUIDs or integers, so the readable id is hashed into a UUIDv5 and kept
    /// in the payload instead.
    pub fn point_id(&self) -> String {
        Uuid::new_v5(&Uuid::NAMESPACE_OID, self.id.as_bytes()).to_string()
    }
}
