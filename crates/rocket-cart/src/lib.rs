//! Shopping cart state for the RocketShoes storefront.
//!
//! This crate owns the shopper's cart:
//!
//! - **Cart**: ordered line items keyed by product, with totals and
//!   per-product badge counts
//! - **Store**: add, remove and set-quantity operations validated against
//!   remote stock, with the whole cart written back to local storage after
//!   every successful change
//! - **Notices**: shopper-facing messages for rejected operations
//!
//! # Example
//!
//! ```rust,ignore
//! use rocket_cart::prelude::*;
//! use rocket_cache::{Cache, FileStore};
//! use rocket_data::ApiClient;
//!
//! let api = Arc::new(ApiClient::new("http://localhost:3333")?);
//! let cache = Cache::new(FileStore::open(".rocket/storage.json")?);
//! let store = CartStore::open(StoreConfig::default(), api.clone(), api, cache);
//!
//! store.add_product(ProductId::new(1)).await?;
//! let cart = store.cart().await;
//! println!("Total: {}", cart.total()?.display(Currency::BRL));
//! ```

pub mod cart;
pub mod config;
pub mod error;
pub mod ids;
pub mod money;
pub mod notify;
pub mod store;

pub use cart::{Cart, CartLineItem};
pub use config::StoreConfig;
pub use error::CartError;
pub use ids::ProductId;
pub use money::{Currency, Money};
pub use notify::{Notice, NoticeLog, Notifier, TracingNotifier};
pub use store::CartStore;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::cart::{Cart, CartLineItem};
    pub use crate::config::StoreConfig;
    pub use crate::error::CartError;
    pub use crate::ids::ProductId;
    pub use crate::money::{Currency, Money};
    pub use crate::notify::{Notice, NoticeLog, Notifier, TracingNotifier};
    pub use crate::store::CartStore;
}
