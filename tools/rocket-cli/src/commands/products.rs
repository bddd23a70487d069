//! Product listing.

use anyhow::{Context as _, Result};
use rocket_cart::{Currency, Money, ProductId};
use rocket_data::ProductRecord;
use serde::Serialize;
use tracing::debug;

use crate::context::Context;
use crate::output::truncate;

/// A product as shown in the listing.
#[derive(Debug, Serialize)]
struct ListedProduct {
    id: u64,
    title: String,
    price: f64,
    price_formatted: String,
    in_cart: u32,
}

impl ListedProduct {
    fn new(product: ProductRecord, in_cart: u32, currency: Currency) -> Self {
        let price_formatted = Money::from_decimal(product.price)
            .map(|m| m.display(currency))
            .unwrap_or_else(|| "-".to_string());
        Self {
            id: product.id,
            title: product.title,
            price: product.price,
            price_formatted,
            in_cart,
        }
    }
}

/// Run the products command.
pub async fn run(ctx: &Context) -> Result<()> {
    let store = ctx.open_store()?;
    let products = ctx
        .catalog()
        .products()
        .await
        .context("Failed to load products")?;
    let in_cart = store.cart().await.items_amount();
    debug!(products = products.len(), in_cart = in_cart.len(), "loaded listing");

    let listed: Vec<ListedProduct> = products
        .into_iter()
        .map(|p| {
            let count = in_cart.get(&ProductId::new(p.id)).copied().unwrap_or(0);
            ListedProduct::new(p, count, ctx.config.display.currency)
        })
        .collect();

    if ctx.output.is_json() {
        ctx.output.json(&listed);
        return Ok(());
    }

    if listed.is_empty() {
        ctx.output.info("No products available.");
        return Ok(());
    }

    ctx.output.header("Products");
    let widths = [4, 40, 14, 7];
    ctx.output
        .table_row(&["ID", "PRODUCT", "PRICE", "IN CART"], &widths);
    for product in &listed {
        let id = product.id.to_string();
        let title = truncate(&product.title, widths[1]);
        let badge = product.in_cart.to_string();
        ctx.output.table_row(
            &[&id, &title, &product.price_formatted, &badge],
            &widths,
        );
    }

    Ok(())
}
