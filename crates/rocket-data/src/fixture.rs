//! In-memory storefront API.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use serde::Deserialize;

use crate::lookup::{CatalogLookup, ProductRecord, StockLookup, StockRecord};
use crate::FetchError;

/// Layout of a json-server `db.json` file.
#[derive(Debug, Default, Deserialize)]
struct Database {
    #[serde(default)]
    products: Vec<ProductRecord>,
    #[serde(default)]
    stock: Vec<StockRecord>,
}

#[derive(Debug, Default)]
struct Tables {
    products: BTreeMap<u64, ProductRecord>,
    stock: BTreeMap<u64, u32>,
}

/// Storefront API served from memory.
///
/// Useful offline and in tests. Stock levels can be changed after
/// construction to simulate other shoppers.
#[derive(Debug, Default)]
pub struct FixtureApi {
    tables: RwLock<Tables>,
}

impl FixtureApi {
    /// Create an empty API.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a json-server `db.json` document.
    pub fn from_json(json: &str) -> Result<Self, FetchError> {
        let db: Database = serde_json::from_str(json)?;
        let tables = Tables {
            products: db.products.into_iter().map(|p| (p.id, p)).collect(),
            stock: db.stock.into_iter().map(|s| (s.id, s.amount)).collect(),
        };
        Ok(Self {
            tables: RwLock::new(tables),
        })
    }

    /// Load a json-server `db.json` file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, FetchError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| FetchError::RequestError(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }

    /// Add a product with its stock level.
    pub fn with_product(self, product: ProductRecord, amount: u32) -> Self {
        if let Ok(mut tables) = self.tables.write() {
            tables.stock.insert(product.id, amount);
            tables.products.insert(product.id, product);
        }
        self
    }

    /// Change the stock level of a product.
    pub fn set_stock(&self, id: u64, amount: u32) {
        if let Ok(mut tables) = self.write() {
            tables.stock.insert(id, amount);
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>, FetchError> {
        self.tables
            .read()
            .map_err(|_| FetchError::RequestError("fixture lock poisoned".to_string()))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>, FetchError> {
        self.tables
            .write()
            .map_err(|_| FetchError::RequestError("fixture lock poisoned".to_string()))
    }
}

#[async_trait]
impl CatalogLookup for FixtureApi {
    async fn product(&self, id: u64) -> Result<ProductRecord, FetchError> {
        self.read()?
            .products
            .get(&id)
            .cloned()
            .ok_or_else(|| FetchError::NotFound(format!("products/{}", id)))
    }

    async fn products(&self) -> Result<Vec<ProductRecord>, FetchError> {
        Ok(self.read()?.products.values().cloned().collect())
    }
}

#[async_trait]
impl StockLookup for FixtureApi {
    async fn stock(&self, id: u64) -> Result<StockRecord, FetchError> {
        self.read()?
            .stock
            .get(&id)
            .map(|&amount| StockRecord { id, amount })
            .ok_or_else(|| FetchError::NotFound(format!("stock/{}", id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DB: &str = r#"{
        "products": [
            {"id": 1, "title": "Tênis de Caminhada Leve Confortável", "price": 179.9, "image": "https://example.com/1.jpg"},
            {"id": 2, "title": "Tênis VR Caminhada Confortável Detalhes Couro Masculino", "price": 139.9, "image": "https://example.com/2.jpg"}
        ],
        "stock": [
            {"id": 1, "amount": 3},
            {"id": 2, "amount": 0}
        ]
    }"#;

    #[tokio::test]
    async fn test_lookups_from_db_json() {
        let api = FixtureApi::from_json(DB).unwrap();

        let product = api.product(2).await.unwrap();
        assert_eq!(product.price, 139.9);
        assert_eq!(api.stock(1).await.unwrap().amount, 3);
        assert_eq!(api.stock(2).await.unwrap().amount, 0);
        assert_eq!(api.products().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_id_is_not_found() {
        let api = FixtureApi::from_json(DB).unwrap();
        assert!(matches!(api.product(9).await, Err(FetchError::NotFound(_))));
        assert!(matches!(api.stock(9).await, Err(FetchError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_set_stock() {
        let api = FixtureApi::new().with_product(
            ProductRecord {
                id: 7,
                title: "Sneaker".to_string(),
                price: 10.0,
                image: String::new(),
            },
            1,
        );
        api.set_stock(7, 4);
        assert_eq!(api.stock(7).await.unwrap().amount, 4);
    }

    #[test]
    fn test_malformed_db() {
        assert!(matches!(
            FixtureApi::from_json(r#"{"stock": [{"id": 1}]}"#),
            Err(FetchError::ParseError(_))
        ));
    }
}
