//! Cart line item.

use rocket_data::ProductRecord;
use serde::{Deserialize, Serialize};

use crate::error::CartError;
use crate::ids::ProductId;
use crate::money::Money;

/// One product entry in the cart with its quantity.
///
/// Serialized with the storefront's field names (`id`, `price`, `amount`),
/// which is also the persisted snapshot layout.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CartLineItem {
    /// Product being purchased; unique within a cart.
    #[serde(rename = "id")]
    pub product_id: ProductId,
    /// Product title (denormalized for display).
    pub title: String,
    /// Unit price.
    #[serde(rename = "price")]
    pub unit_price: Money,
    /// Image URL.
    pub image: String,
    /// Quantity, always at least 1 inside a cart.
    #[serde(rename = "amount")]
    pub quantity: u32,
}

impl CartLineItem {
    /// Create a line item with quantity 1.
    pub fn new(
        product_id: ProductId,
        title: impl Into<String>,
        unit_price: Money,
        image: impl Into<String>,
    ) -> Self {
        Self {
            product_id,
            title: title.into(),
            unit_price,
            image: image.into(),
            quantity: 1,
        }
    }

    /// Build a quantity-1 line item from catalog metadata.
    ///
    /// Fails with [`CartError::AddFailed`] when the record carries an
    /// unusable price.
    pub fn from_record(record: ProductRecord) -> Result<Self, CartError> {
        let product_id = ProductId::new(record.id);
        let unit_price = Money::from_decimal(record.price).ok_or_else(|| {
            CartError::add_failed(product_id, format!("invalid price {}", record.price))
        })?;
        Ok(Self::new(product_id, record.title, unit_price, record.image))
    }

    /// Unit price times quantity.
    pub fn subtotal(&self) -> Result<Money, CartError> {
        self.unit_price
            .try_multiply(self.quantity)
            .ok_or(CartError::Overflow)
    }
}
