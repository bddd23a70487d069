//! Type-safe key-value persistence for the RocketShoes cart.
//!
//! Provides a small, synchronous string store (the browser `localStorage`
//! model) behind the [`Persistence`] trait, plus a [`Cache`] wrapper with
//! automatic JSON serialization.
//!
//! # Example
//!
//! ```rust,ignore
//! use rocket_cache::{cache_key, Cache, MemoryStore};
//!
//! let cache = Cache::new(MemoryStore::new());
//! let key = cache_key!("@RocketShoes", "cart");
//!
//! cache.set(&key, &vec![1, 2, 3])?;
//! let items: Option<Vec<u32>> = cache.get(&key)?;
//! ```

mod error;
mod kv;
mod store;

pub use error::CacheError;
pub use kv::Cache;
pub use store::{FileStore, MemoryStore, Persistence};
