//! CLI command implementations.

pub mod cart;
pub mod products;

use clap::Args;
use rocket_cart::{CartError, ProductId};

/// Arguments naming a single product.
#[derive(Args)]
pub struct ProductArgs {
    /// Product ID.
    pub id: ProductId,
}

/// Arguments for setting a quantity.
#[derive(Args)]
pub struct AmountArgs {
    /// Product ID.
    pub id: ProductId,

    /// New quantity. Zero or less is ignored.
    #[arg(allow_hyphen_values = true)]
    pub amount: i64,
}

/// A cart operation the store rejected. The shopper has already been shown
/// a toast for it.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct Rejected(#[from] pub CartError);
