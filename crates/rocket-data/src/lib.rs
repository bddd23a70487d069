//! Catalog and stock lookups for the RocketShoes storefront API.
//!
//! The cart core depends on two remote collaborators, both modeled as
//! asynchronous request/response calls:
//!
//! - [`CatalogLookup`] - product metadata by id (`GET /products/{id}`)
//! - [`StockLookup`] - available quantity by id (`GET /stock/{id}`)
//!
//! Two implementations are provided: [`ApiClient`], which talks HTTP to a
//! json-server style API, and [`FixtureApi`], which serves the same data
//! from memory.
//!
//! # Example
//!
//! ```rust,ignore
//! use rocket_data::{ApiClient, StockLookup};
//!
//! let api = ApiClient::new("http://localhost:3333")?;
//! let stock = api.stock(3).await?;
//! println!("{} left", stock.amount);
//! ```

mod client;
mod error;
mod fixture;
mod lookup;
mod response;

pub use client::ApiClient;
pub use error::FetchError;
pub use fixture::FixtureApi;
pub use lookup::{CatalogLookup, ProductRecord, StockLookup, StockRecord};
pub use response::Response;
