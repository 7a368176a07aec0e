//! External book catalog client (Google Books volumes API)

use std::time::Duration;

use async_trait::async_trait;

use crate::{
    config::CatalogConfig,
    error::{AppError, AppResult},
    models::catalog::{CatalogBook, VolumesResponse},
};

/// Look up bibliographic metadata for an ISBN
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BookLookup: Send + Sync {
    async fn lookup(&self, isbn: &str) -> AppResult<CatalogBook>;
}

#[derive(Clone)]
pub struct GoogleBooksClient {
    http: reqwest::Client,
    base_url: String,
    api_key: Option<String>,
}

impl GoogleBooksClient {
    pub fn new(config: &CatalogConfig) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("bookshelf-server/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AppError::Internal(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        })
    }
}

#[async_trait]
impl BookLookup for GoogleBooksClient {
    async fn lookup(&self, isbn: &str) -> AppResult<CatalogBook> {
        let query = format!("isbn:{}", isbn);
        let mut request = self.http.get(&self.base_url).query(&[("q", query.as_str())]);
        if let Some(ref key) = self.api_key {
            request = request.query(&[("key", key.as_str())]);
        }

        tracing::debug!("Catalog lookup for ISBN {}", isbn);

        let response = request
            .send()
            .await
            .map_err(|e| AppError::Catalog(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Catalog(format!("catalog answered {}", status)));
        }

        let volumes: VolumesResponse = response
            .json()
            .await
            .map_err(|e| AppError::Catalog(format!("malformed catalog response: {}", e)))?;

        tracing::debug!("Catalog returned {} volume(s) for ISBN {}", volumes.total_items, isbn);

        volumes.into_catalog_book(isbn)
    }
}
