//! The cart store: stock-validated mutations with write-back persistence.
//!
//! Every public operation follows the same shape:
//!
//! 1. take the cart lock (mutations on one cart are serialized, including
//!    across the remote lookups they await)
//! 2. validate against the Stock lookup, and fetch catalog metadata when a
//!    new line item is needed
//! 3. mutate the in-memory cart, or leave it untouched on any failure
//! 4. on success, rewrite the persisted snapshot; on failure, notify the
//!    shopper
//!
//! Persistence is fire-and-forget: a failed write is logged and does not
//! fail the operation.

use std::sync::Arc;

use rocket_cache::Cache;
use rocket_data::{CatalogLookup, StockLookup};
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use crate::cart::{Cart, CartLineItem};
use crate::config::StoreConfig;
use crate::error::CartError;
use crate::ids::ProductId;
use crate::notify::{Notice, Notifier, TracingNotifier};

/// Whether an operation changed the cart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Outcome {
    Changed,
    Unchanged,
}

/// Owns a shopper's cart.
///
/// Created from the persisted snapshot, mutated only through
/// [`add_product`](Self::add_product),
/// [`remove_product`](Self::remove_product) and
/// [`update_product_amount`](Self::update_product_amount).
pub struct CartStore {
    cart: Mutex<Cart>,
    catalog: Arc<dyn CatalogLookup>,
    stock: Arc<dyn StockLookup>,
    cache: Cache,
    notifier: Arc<dyn Notifier>,
    config: StoreConfig,
}

impl CartStore {
    /// Open a store, loading the cart from `cache`.
    ///
    /// A missing snapshot yields an empty cart. An unreadable one is logged
    /// and also yields an empty cart; it stays on disk until the next
    /// successful mutation overwrites it.
    pub fn open(
        config: StoreConfig,
        catalog: Arc<dyn CatalogLookup>,
        stock: Arc<dyn StockLookup>,
        cache: Cache,
    ) -> Self {
        let cart = load_snapshot(&cache, &config.storage_key);
        debug!(key = %config.storage_key, items = cart.len(), "cart loaded");
        Self {
            cart: Mutex::new(cart),
            catalog,
            stock,
            cache,
            notifier: Arc::new(TracingNotifier),
            config,
        }
    }

    /// Route failure notices to `notifier`.
    pub fn with_notifier(mut self, notifier: Arc<dyn Notifier>) -> Self {
        self.notifier = notifier;
        self
    }

    /// Key the snapshot is stored under.
    pub fn storage_key(&self) -> &str {
        &self.config.storage_key
    }

    /// Current cart contents.
    ///
    /// Waits for any in-flight mutation to settle.
    pub async fn cart(&self) -> Cart {
        self.cart.lock().await.clone()
    }

    /// Add one unit of a product.
    ///
    /// A product not yet in the cart gets a new quantity-1 line item if any
    /// stock is available. A product already in the cart is incremented
    /// through [`update_product_amount`](Self::update_product_amount), so
    /// failures on that path are reported as `UpdateFailed`.
    #[instrument(skip(self, product_id), fields(product_id = %product_id))]
    pub async fn add_product(&self, product_id: ProductId) -> Result<(), CartError> {
        let mut cart = self.cart.lock().await;
        let result = self.add_locked(&mut cart, product_id).await;
        self.settle(&cart, result)
    }

    /// Remove a product's line item.
    ///
    /// Fails with `RemoveFailed` if the cart has no line item for it.
    #[instrument(skip(self, product_id), fields(product_id = %product_id))]
    pub async fn remove_product(&self, product_id: ProductId) -> Result<(), CartError> {
        let mut cart = self.cart.lock().await;
        let result = match cart.remove(product_id) {
            Some(_) => Ok(Outcome::Changed),
            None => Err(CartError::remove_failed(product_id, "not in cart")),
        };
        self.settle(&cart, result)
    }

    /// Set a product's quantity to `amount`.
    ///
    /// `amount <= 0` is ignored: the cart is left as is and nothing is
    /// written. Items are never removed here; use
    /// [`remove_product`](Self::remove_product).
    #[instrument(skip(self, product_id), fields(product_id = %product_id))]
    pub async fn update_product_amount(
        &self,
        product_id: ProductId,
        amount: i64,
    ) -> Result<(), CartError> {
        let mut cart = self.cart.lock().await;
        let result = self.update_locked(&mut cart, product_id, amount).await;
        self.settle(&cart, result)
    }

    async fn add_locked(
        &self,
        cart: &mut Cart,
        product_id: ProductId,
    ) -> Result<Outcome, CartError> {
        let available = self
            .stock
            .stock(product_id.get())
            .await
            .map_err(|e| CartError::add_failed(product_id, e))?
            .amount;

        if let Some(current) = cart.get(product_id).map(|i| i.quantity) {
            if current >= available {
                return Err(CartError::OutOfStock {
                    product_id,
                    requested: u64::from(current) + 1,
                    available,
                });
            }
            return self
                .update_locked(cart, product_id, i64::from(current) + 1)
                .await;
        }

        if available < 1 {
            return Err(CartError::OutOfStock {
                product_id,
                requested: 1,
                available,
            });
        }

        let record = self
            .catalog
            .product(product_id.get())
            .await
            .map_err(|e| CartError::add_failed(product_id, e))?;
        if record.id != product_id.get() {
            return Err(CartError::add_failed(
                product_id,
                format!("catalog returned product {}", record.id),
            ));
        }
        let item = CartLineItem::from_record(record)?;

        // The lock is held across the lookups, so nothing can have added it.
        if !cart.push(item) {
            return Err(CartError::add_failed(product_id, "already in cart"));
        }
        info!(quantity = 1, "product added to cart");
        Ok(Outcome::Changed)
    }

    async fn update_locked(
        &self,
        cart: &mut Cart,
        product_id: ProductId,
        amount: i64,
    ) -> Result<Outcome, CartError> {
        let requested = match u64::try_from(amount) {
            Ok(n) if n > 0 => n,
            _ => {
                debug!(amount, "ignoring non-positive amount");
                return Ok(Outcome::Unchanged);
            }
        };

        if !cart.contains(product_id) {
            return Err(CartError::update_failed(product_id, "not in cart"));
        }

        let available = self
            .stock
            .stock(product_id.get())
            .await
            .map_err(|e| CartError::update_failed(product_id, e))?
            .amount;

        if requested > u64::from(available) {
            return Err(CartError::OutOfStock {
                product_id,
                requested,
                available,
            });
        }

        let quantity = u32::try_from(requested).unwrap_or(available);
        if !cart.set_quantity(product_id, quantity) {
            return Err(CartError::update_failed(product_id, "not in cart"));
        }
        info!(quantity, "cart quantity updated");
        Ok(Outcome::Changed)
    }

    /// Persist on change, notify on failure.
    fn settle(&self, cart: &Cart, result: Result<Outcome, CartError>) -> Result<(), CartError> {
        match result {
            Ok(Outcome::Changed) => {
                self.persist(cart);
                Ok(())
            }
            Ok(Outcome::Unchanged) => Ok(()),
            Err(err) => {
                warn!(error = %err, "cart operation rejected");
                self.notifier.notify(&Notice::from(&err));
                Err(err)
            }
        }
    }

    fn persist(&self, cart: &Cart) {
        match self.cache.set(&self.config.storage_key, cart) {
            Ok(()) => debug!(key = %self.config.storage_key, items = cart.len(), "cart snapshot written"),
            Err(e) => warn!(key = %self.config.storage_key, error = %e, "failed to write cart snapshot"),
        }
    }
}

impl std::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CartStore")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

fn load_snapshot(cache: &Cache, key: &str) -> Cart {
    match cache.get::<Cart>(key) {
        Ok(Some(cart)) => cart,
        Ok(None) => Cart::new(),
        Err(e) => {
            warn!(%key, error = %e, "discarding unreadable cart snapshot");
            Cart::new()
        }
    }
}
