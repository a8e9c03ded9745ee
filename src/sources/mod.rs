//! External data sources.

mod catalog;

pub use catalog::{CatalogClient, CATALOG_PAGE_SIZE};

use async_trait::async_trait;

use crate::error::CatalogError;
use crate::models::{ApiSummary, ApiVersionDetail, ApiVersionSummary};

/// The gateway control plane's catalog of APIs and their versioned
/// specifications.
#[async_trait]
pub trait ApiCatalog: Send + Sync {
    /// All APIs, accumulated across listing pages.
    async fn list_apis(&self) -> Result<Vec<ApiSummary>, CatalogError>;

    /// Version records of one API. May be empty.
    async fn list_versions(&self, api_id: &str) -> Result<Vec<ApiVersionSummary>, CatalogError>;

    /// Full version record, including the specification payload.
    async fn fetch_version(
        &self,
        api_id: &str,
        version_id: &str,
    ) -> Result<ApiVersionDetail, CatalogError>;
}
