//! Sync command implementation.

use anyhow::{Context, Result};

use crate::models::Config;
use crate::services::{EmbeddingClient, GcsBackend, QdrantBackend, SyncOptions, SyncPipeline};
use crate::sources::CatalogClient;

/// Build the clients from the environment and run one sync pass.
pub async fn handle_sync() -> Result<()> {
    let config = Config::from_env().context("failed to load configuration")?;

    let catalog = CatalogClient::new(&config.catalog);
    let blob_store = GcsBackend::new(&config.blob_store);
    let embedder =
        EmbeddingClient::new(&config.embedding).context("failed to build embedding client")?;
    let index = QdrantBackend::new(&config.vector_store, config.embedding.output_dimension as u64)
        .context("failed to build vector store client")?;
    index
        .ensure_collection()
        .await
        .context("failed to ensure vector collection")?;

    let pipeline = SyncPipeline::new(
        Box::new(catalog),
        Box::new(blob_store),
        Box::new(embedder),
        Box::new(index),
        SyncOptions::from(&config),
    );

    let report = pipeline.run().await?;

    print!("{}", report.render());
    println!("{}", report.completion_message());
    Ok(())
}
