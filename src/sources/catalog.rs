//! HTTP client for the control-plane catalog.

use async_trait::async_trait;
use reqwest::Client;
use serde::de::DeserializeOwned;

use crate::error::CatalogError;
use crate::models::{
    ApiListResponse, ApiSummary, ApiVersionDetail, ApiVersionSummary, CatalogConfig,
    VersionListResponse,
};
use crate::sources::ApiCatalog;

/// Page size used when listing the catalog.
pub const CATALOG_PAGE_SIZE: u32 = 100;

/// Bearer-token catalog client.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: Client,
    base_url: String,
    token: String,
}

impl CatalogClient {
    pub fn new(config: &CatalogConfig) -> Self {
        Self {
            client: Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            token: config.token.clone(),
        }
    }

    /// Cheap reachability probe: request the first catalog page.
    pub async fn probe(&self) -> Result<(), CatalogError> {
        let url = format!("{}/apis", self.base_url);
        self.get_json::<ApiListResponse>(&url, &[("page[size]".to_string(), "1".to_string())])
            .await?;
        Ok(())
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: &str,
        query: &[(String, String)],
    ) -> Result<T, CatalogError> {
        let response = self
            .client
            .get(url)
            .bearer_auth(&self.token)
            .query(query)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(CatalogError::Status {
                status,
                url: url.to_string(),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| CatalogError::InvalidResponse(e.to_string()))
    }
}

#[async_trait]
impl ApiCatalog for CatalogClient {
    async fn list_apis(&self) -> Result<Vec<ApiSummary>, CatalogError> {
        let url = format!("{}/apis", self.base_url);
        let mut apis = Vec::new();
        let mut page: u32 = 1;

        loop {
            let response: ApiListResponse = self
                .get_json(
                    &url,
                    &[
                        ("page[number]".to_string(), page.to_string()),
                        ("page[size]".to_string(), CATALOG_PAGE_SIZE.to_string()),
                    ],
                )
                .await?;

            apis.extend(response.data);

            match response.next_page {
                Some(ref next) if !next.is_empty() => page += 1,
                _ => break,
            }
        }

        Ok(apis)
    }

    async fn list_versions(&self, api_id: &str) -> Result<Vec<ApiVersionSummary>, CatalogError> {
        let url = format!("{}/apis/{}/versions", self.base_url, api_id);
        let response: VersionListResponse = self.get_json(&url, &[]).await?;
        Ok(response.data)
    }

    async fn fetch_version(
        &self,
        api_id: &str,
        version_id: &str,
    ) -> Result<ApiVersionDetail, CatalogError> {
        let url = format!("{}/apis/{}/versions/{}", self.base_url, api_id, version_id);
        self.get_json(&url, &[]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn client(base_url: String) -> CatalogClient {
        CatalogClient::new(&CatalogConfig {
            base_url,
            token: "catalog-token".to_string(),
        })
    }

    #[tokio::test]
    async fn test_list_apis_accumulates_pages() {
        let server = MockServer::start_async().await;
        let first = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/apis")
                    .query_param("page[number]", "1")
                    .query_param("page[size]", "100")
                    .header("authorization", "Bearer catalog-token");
                then.status(200).json_body(json!({
                    "data": [{"id": "a", "name": "alpha"}],
                    "next_page": "2"
                }));
            })
            .await;
        let second = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/apis")
                    .query_param("page[number]", "2");
                then.status(200).json_body(json!({
                    "data": [{"id": "b", "name": "beta"}],
                    "next_page": null
                }));
            })
            .await;

        let apis = client(server.base_url()).list_apis().await.unwrap();

        first.assert_async().await;
        second.assert_async().await;
        assert_eq!(apis.len(), 2);
        assert_eq!(apis[0].name, "alpha");
        assert_eq!(apis[1].name, "beta");
    }

    #[tokio::test]
    async fn test_list_apis_propagates_http_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/apis");
                then.status(502);
            })
            .await;

        let result = client(server.base_url()).list_apis().await;
        assert!(matches!(result, Err(CatalogError::Status { .. })));
    }

    #[tokio::test]
    async fn test_list_versions_parses_records() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/apis/api-1/versions");
                then.status(200).json_body(json!({
                    "data": [
                        {"id": "v1", "created_at": "2024-01-01T00:00:00Z", "version": "1.0.0"},
                        {"id": "v2", "created_at": "2024-06-01T00:00:00Z", "version": "2.0.0"}
                    ]
                }));
            })
            .await;

        let versions = client(server.base_url())
            .list_versions("api-1")
            .await
            .unwrap();
        assert_eq!(versions.len(), 2);
        assert!(versions[0].created_at < versions[1].created_at);
    }

    #[tokio::test]
    async fn test_fetch_version_extracts_spec() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/apis/api-1/versions/v2");
                then.status(200).json_body(json!({
                    "spec": {"content": "{\"openapi\": \"3.0.0\"}"}
                }));
            })
            .await;

        let detail = client(server.base_url())
            .fetch_version("api-1", "v2")
            .await
            .unwrap();
        assert_eq!(detail.content().unwrap(), "{\"openapi\": \"3.0.0\"}");
    }

    #[tokio::test]
    async fn test_malformed_body_is_a_parse_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/apis/api-1/versions");
                then.status(200).body("[not json");
            })
            .await;

        let result = client(server.base_url()).list_versions("api-1").await;
        assert!(matches!(result, Err(CatalogError::InvalidResponse(_))));
    }
}
