//! End-to-end cart behaviour against an in-memory storefront.

use std::sync::Arc;

use async_trait::async_trait;
use rocket_cache::{Cache, MemoryStore, Persistence};
use rocket_cart::prelude::*;
use rocket_data::{CatalogLookup, FetchError, FixtureApi, ProductRecord, StockLookup, StockRecord};

const DB: &str = r#"{
    "products": [
        {"id": 1, "title": "Tênis de Caminhada Leve Confortável", "price": 179.9, "image": "https://example.com/1.jpg"},
        {"id": 2, "title": "Tênis VR Caminhada Confortável Detalhes Couro Masculino", "price": 139.9, "image": "https://example.com/2.jpg"}
    ],
    "stock": [
        {"id": 1, "amount": 5},
        {"id": 2, "amount": 2}
    ]
}"#;

fn open(api: Arc<FixtureApi>, backend: Arc<MemoryStore>) -> CartStore {
    CartStore::open(
        StoreConfig::default(),
        api.clone(),
        api,
        Cache::from_shared(backend),
    )
}

fn reload(backend: &Arc<MemoryStore>) -> Cart {
    let raw = backend
        .read("@RocketShoes:cart")
        .unwrap()
        .expect("snapshot written");
    serde_json::from_str(&raw).unwrap()
}

#[tokio::test]
async fn add_increment_reject_remove() {
    let api = Arc::new(FixtureApi::from_json(DB).unwrap());
    let backend = Arc::new(MemoryStore::new());
    let store = open(api, backend.clone());
    let a = ProductId::new(1);

    store.add_product(a).await.unwrap();
    assert_eq!(store.cart().await.quantity_of(a), 1);

    store.add_product(a).await.unwrap();
    assert_eq!(store.cart().await.quantity_of(a), 2);

    let err = store.update_product_amount(a, 10).await.unwrap_err();
    assert!(matches!(err, CartError::OutOfStock { .. }));
    assert_eq!(store.cart().await.quantity_of(a), 2);

    store.remove_product(a).await.unwrap();
    assert!(store.cart().await.is_empty());
    assert!(reload(&backend).is_empty());
}

#[tokio::test]
async fn snapshot_reconstructs_cart_after_every_mutation() {
    let api = Arc::new(FixtureApi::from_json(DB).unwrap());
    let backend = Arc::new(MemoryStore::new());
    let store = open(api, backend.clone());

    store.add_product(ProductId::new(1)).await.unwrap();
    assert_eq!(reload(&backend), store.cart().await);

    store.add_product(ProductId::new(2)).await.unwrap();
    assert_eq!(reload(&backend), store.cart().await);

    store
        .update_product_amount(ProductId::new(1), 4)
        .await
        .unwrap();
    assert_eq!(reload(&backend), store.cart().await);

    store.remove_product(ProductId::new(2)).await.unwrap();
    assert_eq!(reload(&backend), store.cart().await);
}

#[tokio::test]
async fn cart_survives_a_new_session() {
    let api = Arc::new(FixtureApi::from_json(DB).unwrap());
    let backend = Arc::new(MemoryStore::new());

    {
        let store = open(api.clone(), backend.clone());
        store.add_product(ProductId::new(2)).await.unwrap();
        store.add_product(ProductId::new(1)).await.unwrap();
        store.add_product(ProductId::new(1)).await.unwrap();
    }

    let store = open(api, backend);
    let cart = store.cart().await;
    let ids: Vec<u64> = cart.iter().map(|i| i.product_id.get()).collect();
    assert_eq!(ids, vec![2, 1]);
    assert_eq!(cart.quantity_of(ProductId::new(1)), 2);
    assert_eq!(cart.total().unwrap().display(Currency::BRL), "R$ 499,70");
}

#[tokio::test]
async fn stock_is_checked_on_every_change() {
    let api = Arc::new(FixtureApi::from_json(DB).unwrap());
    let store = open(api.clone(), Arc::new(MemoryStore::new()));
    let b = ProductId::new(2);

    store.add_product(b).await.unwrap();
    api.set_stock(2, 0);

    let err = store.add_product(b).await.unwrap_err();
    assert!(matches!(err, CartError::OutOfStock { available: 0, .. }));
    assert_eq!(store.cart().await.quantity_of(b), 1);
}

/// Yields to the scheduler before every lookup so concurrent operations
/// interleave at their await points.
struct SlowApi(FixtureApi);

#[async_trait]
impl CatalogLookup for SlowApi {
    async fn product(&self, id: u64) -> Result<ProductRecord, FetchError> {
        tokio::task::yield_now().await;
        self.0.product(id).await
    }

    async fn products(&self) -> Result<Vec<ProductRecord>, FetchError> {
        self.0.products().await
    }
}

#[async_trait]
impl StockLookup for SlowApi {
    async fn stock(&self, id: u64) -> Result<StockRecord, FetchError> {
        tokio::task::yield_now().await;
        self.0.stock(id).await
    }
}

#[tokio::test]
async fn concurrent_adds_do_not_lose_updates() {
    let api = Arc::new(SlowApi(FixtureApi::from_json(DB).unwrap()));
    let store = Arc::new(CartStore::open(
        StoreConfig::default(),
        api.clone(),
        api,
        Cache::new(MemoryStore::new()),
    ));
    let a = ProductId::new(1);

    let (r1, r2, r3) = tokio::join!(
        store.add_product(a),
        store.add_product(a),
        store.add_product(a)
    );
    r1.unwrap();
    r2.unwrap();
    r3.unwrap();

    let cart = store.cart().await;
    assert_eq!(cart.len(), 1);
    assert_eq!(cart.quantity_of(a), 3);
}

#[tokio::test]
async fn concurrent_adds_across_tasks_respect_stock() {
    let api = Arc::new(SlowApi(FixtureApi::from_json(DB).unwrap()));
    let store = Arc::new(CartStore::open(
        StoreConfig::default(),
        api.clone(),
        api,
        Cache::new(MemoryStore::new()),
    ));

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let store = store.clone();
            tokio::spawn(async move { store.add_product(ProductId::new(2)).await })
        })
        .collect();

    let mut ok = 0;
    let mut out_of_stock = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(()) => ok += 1,
            Err(CartError::OutOfStock { .. }) => out_of_stock += 1,
            Err(other) => panic!("unexpected error: {}", other),
        }
    }

    assert_eq!(ok, 2);
    assert_eq!(out_of_stock, 2);
    assert_eq!(store.cart().await.quantity_of(ProductId::new(2)), 2);
}
