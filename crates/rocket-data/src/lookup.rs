//! Collaborator contracts and their wire records.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::FetchError;

/// Product metadata as served by `GET /products/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: u64,
    pub title: String,
    /// Unit price in major currency units.
    pub price: f64,
    /// Image URL.
    pub image: String,
}

/// Stock level as served by `GET /stock/{id}`.
///
/// A negative amount fails to deserialize and surfaces as a malformed
/// response.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockRecord {
    pub id: u64,
    pub amount: u32,
}

/// Fetch product metadata by id.
#[async_trait]
pub trait CatalogLookup: Send + Sync {
    /// Fetch a single product. Unknown ids fail with [`FetchError::NotFound`].
    async fn product(&self, id: u64) -> Result<ProductRecord, FetchError>;

    /// Fetch the full product listing.
    async fn products(&self) -> Result<Vec<ProductRecord>, FetchError>;
}

/// Fetch available stock by product id.
#[async_trait]
pub trait StockLookup: Send + Sync {
    /// Fetch the stock level. Unknown ids fail with [`FetchError::NotFound`].
    async fn stock(&self, id: u64) -> Result<StockRecord, FetchError>;
}
