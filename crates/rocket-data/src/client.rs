//! HTTP client for the storefront API.

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::lookup::{CatalogLookup, ProductRecord, StockLookup, StockRecord};
use crate::{FetchError, Response};

/// HTTP client for a json-server style storefront API.
///
/// Requests carry no timeout and are never retried; a failed lookup is
/// reported to the caller as-is.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client rooted at `base_url` (e.g. `http://localhost:3333`).
    pub fn new(base_url: impl Into<String>) -> Result<Self, FetchError> {
        let base_url = base_url.into();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(FetchError::InvalidUrl(base_url));
        }
        let http = reqwest::Client::builder().build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the full URL for an API path.
    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn get(&self, path: &str) -> Result<Response, FetchError> {
        let url = self.url(path);
        debug!(%url, "GET");
        let resp = self.http.get(&url).send().await?;
        let status = resp.status().as_u16();
        let body = resp.bytes().await?;
        Ok(Response::new(status, body.to_vec(), url))
    }

    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, FetchError> {
        self.get(path).await?.error_for_status()?.json()
    }
}

/// Reject a record whose id does not match the one requested.
fn check_id(requested: u64, got: u64) -> Result<(), FetchError> {
    if requested == got {
        Ok(())
    } else {
        Err(FetchError::ParseError(format!(
            "requested id {} but response carried id {}",
            requested, got
        )))
    }
}

#[async_trait]
impl CatalogLookup for ApiClient {
    async fn product(&self, id: u64) -> Result<ProductRecord, FetchError> {
        let product: ProductRecord = self.get_json(&format!("products/{}", id)).await?;
        check_id(id, product.id)?;
        Ok(product)
    }

    async fn products(&self) -> Result<Vec<ProductRecord>, FetchError> {
        self.get_json("products").await
    }
}

#[async_trait]
impl StockLookup for ApiClient {
    async fn stock(&self, id: u64) -> Result<StockRecord, FetchError> {
        let stock: StockRecord = self.get_json(&format!("stock/{}", id)).await?;
        check_id(id, stock.id)?;
        Ok(stock)
    }
}
