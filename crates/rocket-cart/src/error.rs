//! Cart error types.

use thiserror::Error;

use crate::ids::ProductId;

/// Errors that can occur in cart operations.
///
/// Every variant leaves the cart untouched: operations validate against
/// the remote lookups before mutating anything.
#[derive(Error, Debug)]
pub enum CartError {
    /// Requested quantity exceeds available stock.
    #[error("Out of stock for product {product_id}: requested {requested}, available {available}")]
    OutOfStock {
        product_id: ProductId,
        requested: u64,
        available: u32,
    },

    /// Adding a product failed (lookup error or malformed response).
    #[error("Failed to add product {product_id}: {reason}")]
    AddFailed { product_id: ProductId, reason: String },

    /// Removing a product failed (no such line item).
    #[error("Failed to remove product {product_id}: {reason}")]
    RemoveFailed { product_id: ProductId, reason: String },

    /// Changing a quantity failed (lookup error, malformed response, or no
    /// such line item).
    #[error("Failed to update product {product_id}: {reason}")]
    UpdateFailed { product_id: ProductId, reason: String },

    /// Arithmetic overflow in a price calculation.
    #[error("Arithmetic overflow in price calculation")]
    Overflow,
}

impl CartError {
    pub(crate) fn add_failed(product_id: ProductId, reason: impl ToString) -> Self {
        CartError::AddFailed {
            product_id,
            reason: reason.to_string(),
        }
    }

    pub(crate) fn remove_failed(product_id: ProductId, reason: impl ToString) -> Self {
        CartError::RemoveFailed {
            product_id,
            reason: reason.to_string(),
        }
    }

    pub(crate) fn update_failed(product_id: ProductId, reason: impl ToString) -> Self {
        CartError::UpdateFailed {
            product_id,
            reason: reason.to_string(),
        }
    }

    /// The product the failed operation targeted, if any.
    pub fn product_id(&self) -> Option<ProductId> {
        match self {
            CartError::OutOfStock { product_id, .. }
            | CartError::AddFailed { product_id, .. }
            | CartError::RemoveFailed { product_id, .. }
            | CartError::UpdateFailed { product_id, .. } => Some(*product_id),
            CartError::Overflow => None,
        }
    }

    /// Short message suitable for showing to the shopper.
    pub fn user_message(&self) -> &'static str {
        match self {
            CartError::OutOfStock { .. } => "Requested quantity is out of stock",
            CartError::AddFailed { .. } => "Failed to add product",
            CartError::RemoveFailed { .. } => "Failed to remove product",
            CartError::UpdateFailed { .. } => "Failed to change product quantity",
            CartError::Overflow => "Cart total is too large",
        }
    }
}
