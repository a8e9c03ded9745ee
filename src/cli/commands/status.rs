//! Status command implementation.

use anyhow::{Context, Result};

use crate::models::Config;
use crate::services::{GcsBackend, QdrantBackend};
use crate::sources::CatalogClient;

/// Probe each configured service and print one line per dependency.
pub async fn handle_status() -> Result<()> {
    let config = Config::from_env().context("failed to load configuration")?;

    let catalog = CatalogClient::new(&config.catalog);
    match catalog.probe().await {
        Ok(()) => println!("catalog:      ok ({})", config.catalog.base_url),
        Err(e) => println!("catalog:      unreachable: {}", e),
    }

    let blob_store = GcsBackend::new(&config.blob_store);
    match blob_store.check_bucket().await {
        Ok(true) => println!("blob store:   ok (bucket {})", config.blob_store.bucket),
        Ok(false) => println!(
            "blob store:   bucket {} not accessible",
            config.blob_store.bucket
        ),
        Err(e) => println!("blob store:   unreachable: {}", e),
    }

    match QdrantBackend::new(&config.vector_store, config.embedding.output_dimension as u64) {
        Ok(index) => match index.health_check().await {
            Ok(_) => println!("vector index: ok ({})", config.vector_store.url),
            Err(e) => println!("vector index: unreachable: {}", e),
        },
        Err(e) => println!("vector index: {}", e),
    }

    Ok(())
}
