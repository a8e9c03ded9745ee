//! Sync orchestrator: catalog → canonical document → vector index.
//!
//! One linear pass per API. Failures inside a single API's pipeline are
//! contained to that API's outcome; only catalog listing calls abort the run.

use crate::error::{BlobStoreError, SyncError};
use crate::models::{
    ApiOutcome, ApiSummary, ChunkingConfig, Config, SpecDocument, SyncReport, SyncStage,
    DEFAULT_EMBEDDING_DIMENSION,
};
use crate::services::blob_store::BlobStore;
use crate::services::chunker::LineChunker;
use crate::services::embedding::Embedder;
use crate::services::indexer::index_document;
use crate::services::vector_store::VectorIndex;
use crate::sources::ApiCatalog;
use crate::utils::json_to_yaml;

/// Content type of canonical documents in the blob store.
pub const SPEC_CONTENT_TYPE: &str = "text/yaml";

/// Tunables of the per-document pipeline.
#[derive(Debug, Clone)]
pub struct SyncOptions {
    pub chunking: ChunkingConfig,
    pub embed_batch_size: usize,
    pub embedding_dimension: usize,
}

impl Default for SyncOptions {
    fn default() -> Self {
        Self {
            chunking: ChunkingConfig::default(),
            embed_batch_size: 5,
            embedding_dimension: DEFAULT_EMBEDDING_DIMENSION,
        }
    }
}

impl From<&Config> for SyncOptions {
    fn from(config: &Config) -> Self {
        Self {
            chunking: config.chunking.clone(),
            embed_batch_size: config.embedding.batch_size,
            embedding_dimension: config.embedding.output_dimension,
        }
    }
}

enum Persistence {
    Written,
    Unchanged,
}

/// The full sync pipeline over explicitly injected clients.
pub struct SyncPipeline {
    catalog: Box<dyn ApiCatalog>,
    blob_store: Box<dyn BlobStore>,
    embedder: Box<dyn Embedder>,
    index: Box<dyn VectorIndex>,
    chunker: LineChunker,
    options: SyncOptions,
}

impl SyncPipeline {
    pub fn new(
        catalog: Box<dyn ApiCatalog>,
        blob_store: Box<dyn BlobStore>,
        embedder: Box<dyn Embedder>,
        index: Box<dyn VectorIndex>,
        options: SyncOptions,
    ) -> Self {
        Self {
            catalog,
            blob_store,
            embedder,
            index,
            chunker: LineChunker::new(&options.chunking),
            options,
        }
    }

    /// Run one full sync pass over the catalog.
    pub async fn run(&self) -> Result<SyncReport, SyncError> {
        let apis = self.catalog.list_apis().await?;
        tracing::info!(apis = apis.len(), "fetched API catalog");

        let mut report = SyncReport::default();
        for api in &apis {
            let outcome = self.sync_api(api).await?;
            if let ApiOutcome::Failed { stage, reason } = &outcome {
                tracing::warn!(api = %api.name, %stage, %reason, "api sync failed, continuing");
            }
            report.push(api.name.clone(), outcome);
        }

        tracing::info!(
            synced = report.synced(),
            unchanged = report.unchanged(),
            skipped = report.skipped(),
            failed = report.failed(),
            "sync pass complete"
        );
        Ok(report)
    }

    async fn sync_api(&self, api: &ApiSummary) -> Result<ApiOutcome, SyncError> {
        tracing::info!(api = %api.name, id = %api.id, "fetching versions");
        let versions = self.catalog.list_versions(&api.id).await?;

        let latest = match versions.into_iter().max_by_key(|v| v.created_at) {
            Some(latest) => latest,
            None => return Ok(ApiOutcome::NoVersions),
        };

        tracing::info!(api = %api.name, version = %latest.version, "fetching latest spec");
        let detail = match self.catalog.fetch_version(&api.id, &latest.id).await {
            Ok(detail) => detail,
            Err(e) => {
                return Ok(ApiOutcome::Failed {
                    stage: SyncStage::Fetch,
                    reason: e.to_string(),
                })
            }
        };

        let content = match detail.content() {
            Some(content) => content,
            None => {
                tracing::warn!(api = %api.name, version = %latest.version, "latest version has no spec content");
                return Ok(ApiOutcome::MissingContent);
            }
        };

        let yaml = match json_to_yaml(&content) {
            Ok(yaml) => yaml,
            Err(e) => {
                return Ok(ApiOutcome::Failed {
                    stage: SyncStage::Normalize,
                    reason: e.to_string(),
                })
            }
        };

        let document = SpecDocument::new(api.name.clone(), latest.version.clone(), yaml);
        let key = document.storage_key();

        match self.persist(&document, &key).await {
            Ok(Persistence::Written) => {}
            Ok(Persistence::Unchanged) => {
                tracing::info!(key = %key, "stored content identical, skipping upload and embedding");
                return Ok(ApiOutcome::Unchanged);
            }
            Err(e) => {
                return Ok(ApiOutcome::Failed {
                    stage: SyncStage::Storage,
                    reason: e.to_string(),
                })
            }
        }

        tracing::info!(key = %key, "embedding document");
        match index_document(
            &self.chunker,
            self.embedder.as_ref(),
            self.index.as_ref(),
            &key,
            &document.content,
            self.options.embed_batch_size,
            self.options.embedding_dimension,
        )
        .await
        {
            Ok(stats) => Ok(ApiOutcome::Synced(stats)),
            Err(e) => Ok(ApiOutcome::Failed {
                stage: SyncStage::Indexing,
                reason: e.to_string(),
            }),
        }
    }

    /// Upload the document unless the stored bytes already match.
    async fn persist(
        &self,
        document: &SpecDocument,
        key: &str,
    ) -> Result<Persistence, BlobStoreError> {
        if self.blob_store.exists(key).await? {
            let existing = self.blob_store.download(key).await?;
            if existing == document.content {
                return Ok(Persistence::Unchanged);
            }
        }

        tracing::info!(key = %key, "uploading canonical document");
        self.blob_store
            .upload(key, &document.content, SPEC_CONTENT_TYPE)
            .await?;
        Ok(Persistence::Written)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{CatalogError, EmbeddingError, VectorStoreError};
    use crate::models::{ApiVersionDetail, ApiVersionSummary, IndexRecord, SpecPayload};
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};
    use std::collections::HashMap;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    const DIM: usize = 4;

    #[derive(Clone, Default)]
    struct FakeCatalog {
        apis: Vec<ApiSummary>,
        versions: HashMap<String, Vec<ApiVersionSummary>>,
        /// version id → spec content
        contents: Arc<Mutex<HashMap<String, Option<String>>>>,
        fail_version_listing: bool,
    }

    #[async_trait]
    impl ApiCatalog for FakeCatalog {
        async fn list_apis(&self) -> Result<Vec<ApiSummary>, CatalogError> {
            Ok(self.apis.clone())
        }

        async fn list_versions(
            &self,
            api_id: &str,
        ) -> Result<Vec<ApiVersionSummary>, CatalogError> {
            if self.fail_version_listing {
                return Err(CatalogError::InvalidResponse("listing down".to_string()));
            }
            Ok(self.versions.get(api_id).cloned().unwrap_or_default())
        }

        async fn fetch_version(
            &self,
            _api_id: &str,
            version_id: &str,
        ) -> Result<ApiVersionDetail, CatalogError> {
            let contents = self.contents.lock().unwrap();
            let content = contents
                .get(version_id)
                .ok_or_else(|| {
                    CatalogError::InvalidResponse(format!("unexpected version {}", version_id))
                })?
                .clone();
            Ok(ApiVersionDetail {
                spec: Some(SpecPayload { content }),
            })
        }
    }

    #[derive(Clone, Default)]
    struct FakeBlobStore {
        objects: Arc<Mutex<HashMap<String, String>>>,
        uploads: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl BlobStore for FakeBlobStore {
        async fn exists(&self, key: &str) -> Result<bool, BlobStoreError> {
            Ok(self.objects.lock().unwrap().contains_key(key))
        }

        async fn download(&self, key: &str) -> Result<String, BlobStoreError> {
            Ok(self.objects.lock().unwrap().get(key).cloned().unwrap_or_default())
        }

        async fn upload(
            &self,
            key: &str,
            content: &str,
            _content_type: &str,
        ) -> Result<(), BlobStoreError> {
            self.uploads.fetch_add(1, Ordering::SeqCst);
            self.objects
                .lock()
                .unwrap()
                .insert(key.to_string(), content.to_string());
            Ok(())
        }
    }

    #[derive(Clone, Default)]
    struct FakeEmbedder {
        calls: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl Embedder for FakeEmbedder {
        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, EmbeddingError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(texts.iter().map(|_| vec![0.5; DIM]).collect())
        }
    }

    #[derive(Clone, Default)]
    struct FakeIndex {
        records: Arc<Mutex<Vec<IndexRecord>>>,
    }

    #[async_trait]
    impl VectorIndex for FakeIndex {
        async fn upsert(&self, records: Vec<IndexRecord>) -> Result<(), VectorStoreError> {
            self.records.lock().unwrap().extend(records);
            Ok(())
        }
    }

    fn version(id: &str, label: &str, timestamp: i64) -> ApiVersionSummary {
        ApiVersionSummary {
            id: id.to_string(),
            created_at: Utc.timestamp_opt(timestamp, 0).unwrap(),
            version: label.to_string(),
        }
    }

    fn spec_json() -> String {
        r#"{"openapi": "3.0.0", "info": {"title": "billing", "version": "2.0.0"}}"#.to_string()
    }

    struct Harness {
        catalog: FakeCatalog,
        blob_store: FakeBlobStore,
        embedder: FakeEmbedder,
        index: FakeIndex,
    }

    impl Harness {
        fn pipeline(&self) -> SyncPipeline {
            SyncPipeline::new(
                Box::new(self.catalog.clone()),
                Box::new(self.blob_store.clone()),
                Box::new(self.embedder.clone()),
                Box::new(self.index.clone()),
                SyncOptions {
                    chunking: ChunkingConfig::default(),
                    embed_batch_size: 5,
                    embedding_dimension: DIM,
                },
            )
        }
    }

    fn harness_with_two_versions() -> Harness {
        let mut catalog = FakeCatalog {
            apis: vec![ApiSummary {
                id: "api-1".to_string(),
                name: "billing".to_string(),
            }],
            ..Default::default()
        };
        catalog.versions.insert(
            "api-1".to_string(),
            vec![
                version("spec-old", "1.0.0", 1_000),
                version("spec-new", "2.0.0", 2_000),
            ],
        );
        // Only the latest version's payload is registered; fetching the old
        // one would error out.
        catalog
            .contents
            .lock()
            .unwrap()
            .insert("spec-new".to_string(), Some(spec_json()));

        Harness {
            catalog,
            blob_store: FakeBlobStore::default(),
            embedder: FakeEmbedder::default(),
            index: FakeIndex::default(),
        }
    }

    #[tokio::test]
    async fn test_only_latest_version_is_synced() {
        let harness = harness_with_two_versions();
        let report = harness.pipeline().run().await.unwrap();

        assert_eq!(report.synced(), 1);
        let objects = harness.blob_store.objects.lock().unwrap();
        assert_eq!(objects.len(), 1);
        // The key carries the latest version label, not the older one.
        let stored = objects.get("specs/billing_v2.0.0.yml").unwrap();
        assert!(stored.contains("openapi: 3.0.0"));
        assert!(harness.embedder.calls.load(Ordering::SeqCst) > 0);
        assert!(!harness.index.records.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_yaml_preserves_key_order() {
        let harness = harness_with_two_versions();
        harness.pipeline().run().await.unwrap();

        let objects = harness.blob_store.objects.lock().unwrap();
        let stored = objects.get("specs/billing_v2.0.0.yml").unwrap();
        let openapi_pos = stored.find("openapi:").unwrap();
        let info_pos = stored.find("info:").unwrap();
        assert!(openapi_pos < info_pos);
    }

    #[tokio::test]
    async fn test_api_without_versions_is_skipped_cleanly() {
        let catalog = FakeCatalog {
            apis: vec![ApiSummary {
                id: "api-1".to_string(),
                name: "empty".to_string(),
            }],
            ..Default::default()
        };
        let harness = Harness {
            catalog,
            blob_store: FakeBlobStore::default(),
            embedder: FakeEmbedder::default(),
            index: FakeIndex::default(),
        };

        let report = harness.pipeline().run().await.unwrap();

        assert_eq!(report.apis_seen(), 1);
        assert_eq!(report.skipped(), 1);
        assert!(harness.blob_store.objects.lock().unwrap().is_empty());
        assert_eq!(harness.embedder.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_missing_content_is_skipped_cleanly() {
        let harness = harness_with_two_versions();
        harness
            .catalog
            .contents
            .lock()
            .unwrap()
            .insert("spec-new".to_string(), None);

        let report = harness.pipeline().run().await.unwrap();

        assert_eq!(report.skipped(), 1);
        assert_eq!(report.failed(), 0);
        assert_eq!(harness.blob_store.uploads.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_resync_with_identical_content_is_a_no_op() {
        let harness = harness_with_two_versions();

        let first = harness.pipeline().run().await.unwrap();
        assert_eq!(first.synced(), 1);
        assert_eq!(harness.blob_store.uploads.load(Ordering::SeqCst), 1);
        let embed_calls = harness.embedder.calls.load(Ordering::SeqCst);

        let second = harness.pipeline().run().await.unwrap();
        assert_eq!(second.unchanged(), 1);
        assert_eq!(second.synced(), 0);
        // No second upload, no second embedding pass.
        assert_eq!(harness.blob_store.uploads.load(Ordering::SeqCst), 1);
        assert_eq!(harness.embedder.calls.load(Ordering::SeqCst), embed_calls);
    }

    #[tokio::test]
    async fn test_changed_content_overwrites_and_reembeds() {
        let harness = harness_with_two_versions();
        harness.pipeline().run().await.unwrap();

        harness.catalog.contents.lock().unwrap().insert(
            "spec-new".to_string(),
            Some(r#"{"openapi": "3.0.0", "info": {"title": "billing", "version": "2.0.1"}}"#.to_string()),
        );

        let report = harness.pipeline().run().await.unwrap();
        assert_eq!(report.synced(), 1);
        assert_eq!(harness.blob_store.uploads.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_invalid_spec_json_is_contained() {
        let harness = harness_with_two_versions();
        harness
            .catalog
            .contents
            .lock()
            .unwrap()
            .insert("spec-new".to_string(), Some("not json".to_string()));

        let report = harness.pipeline().run().await.unwrap();
        assert_eq!(report.failed(), 1);
        assert!(matches!(
            report.entries[0].outcome,
            ApiOutcome::Failed {
                stage: SyncStage::Normalize,
                ..
            }
        ));
    }

    #[tokio::test]
    async fn test_version_listing_error_aborts_the_run() {
        let mut harness = harness_with_two_versions();
        harness.catalog.fail_version_listing = true;

        let result = harness.pipeline().run().await;
        assert!(matches!(result, Err(SyncError::Catalog(_))));
    }
}
