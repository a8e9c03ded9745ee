//! Typed schemas for catalog responses.
//!
//! The control plane is paged with `page[number]`/`page[size]` parameters and
//! nests the actual specification text as a JSON-encoded string under
//! `spec.content`. Shape mismatches surface as deserialization errors at the
//! boundary instead of failing deep inside the pipeline.

use chrono::{DateTime, Utc};
use serde::Deserialize;

/// One API entry from the catalog listing.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiSummary {
    pub id: String,
    pub name: String,
}

/// A page of the API listing.
#[derive(Debug, Deserialize)]
pub struct ApiListResponse {
    #[serde(default)]
    pub data: Vec<ApiSummary>,
    #[serde(default)]
    pub next_page: Option<String>,
}

/// One version record of an API. "Latest" is the max `created_at`.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiVersionSummary {
    pub id: String,
    pub created_at: DateTime<Utc>,
    pub version: String,
}

/// Response of the per-API version listing.
#[derive(Debug, Deserialize)]
pub struct VersionListResponse {
    #[serde(default)]
    pub data: Vec<ApiVersionSummary>,
}

/// Full version record, carrying the specification payload.
#[derive(Debug, Deserialize)]
pub struct ApiVersionDetail {
    #[serde(default)]
    pub spec: Option<SpecPayload>,
}

impl ApiVersionDetail {
    /// The JSON-encoded specification text, if the record carries one.
    pub fn content(self) -> Option<String> {
        self.spec.and_then(|s| s.content).filter(|c| !c.is_empty())
    }
}

#[derive(Debug, Deserialize)]
pub struct SpecPayload {
    #[serde(default)]
    pub content: Option<String>,
}
