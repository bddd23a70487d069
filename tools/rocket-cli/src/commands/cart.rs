//! Cart commands.

use anyhow::Result;
use rocket_cart::{Cart, CartStore, Currency, ProductId};
use serde::Serialize;
use tracing::debug;

use super::{AmountArgs, ProductArgs, Rejected};
use crate::context::Context;
use crate::output::truncate;

/// Run the add command.
pub async fn add(args: ProductArgs, ctx: &Context) -> Result<()> {
    let store = ctx.open_store()?;
    store.add_product(args.id).await.map_err(Rejected)?;

    let quantity = store.cart().await.quantity_of(args.id);
    ctx.output
        .success(&format!("Product {} in cart (quantity {})", args.id, quantity));
    Ok(())
}

/// Run the remove command.
pub async fn remove(args: ProductArgs, ctx: &Context) -> Result<()> {
    let store = ctx.open_store()?;
    store.remove_product(args.id).await.map_err(Rejected)?;

    ctx.output
        .success(&format!("Product {} removed from cart", args.id));
    Ok(())
}

/// Run the set command.
pub async fn set(args: AmountArgs, ctx: &Context) -> Result<()> {
    let store = ctx.open_store()?;
    if args.amount <= 0 {
        ctx.output.warn(&format!(
            "Ignoring quantity {}; use `rocket remove {}` to drop the product",
            args.amount, args.id
        ));
    }
    update(&store, args.id, args.amount, ctx).await
}

/// Run the inc/dec commands.
///
/// Decrementing stops at 1, like the cart page's disabled decrement button.
pub async fn step(args: ProductArgs, delta: i64, ctx: &Context) -> Result<()> {
    let store = ctx.open_store()?;
    let current = i64::from(store.cart().await.quantity_of(args.id));
    debug!(product_id = %args.id, current, delta, "stepping quantity");

    if delta < 0 && current <= 1 {
        ctx.output.warn(&format!(
            "Product {} is already at the minimum quantity; use `rocket remove {}`",
            args.id, args.id
        ));
        return Ok(());
    }

    update(&store, args.id, current + delta, ctx).await
}

async fn update(store: &CartStore, id: ProductId, amount: i64, ctx: &Context) -> Result<()> {
    store
        .update_product_amount(id, amount)
        .await
        .map_err(Rejected)?;

    if amount > 0 {
        let quantity = store.cart().await.quantity_of(id);
        ctx.output
            .success(&format!("Product {} quantity is now {}", id, quantity));
    }
    Ok(())
}

/// A cart line as shown in the cart view.
#[derive(Debug, PartialEq, Serialize)]
struct CartRow {
    id: u64,
    title: String,
    price: String,
    quantity: u32,
    subtotal: String,
}

/// The cart view.
#[derive(Debug, PartialEq, Serialize)]
struct CartView {
    items: Vec<CartRow>,
    item_count: u64,
    total: String,
}

impl CartView {
    fn build(cart: &Cart, currency: Currency) -> Result<Self> {
        let items = cart
            .iter()
            .map(|item| -> Result<CartRow> {
                Ok(CartRow {
                    id: item.product_id.get(),
                    title: item.title.clone(),
                    price: item.unit_price.display(currency),
                    quantity: item.quantity,
                    subtotal: item.subtotal()?.display(currency),
                })
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self {
            items,
            item_count: cart.item_count(),
            total: cart.total()?.display(currency),
        })
    }
}

/// Run the show command.
pub async fn show(ctx: &Context) -> Result<()> {
    let store = ctx.open_store()?;
    let cart = store.cart().await;
    let view = CartView::build(&cart, ctx.config.display.currency)?;

    if ctx.output.is_json() {
        ctx.output.json(&view);
        return Ok(());
    }

    if view.items.is_empty() {
        ctx.output.info("Your cart is empty.");
        ctx.output.info("Run `rocket products` to browse and `rocket add <id>` to add one.");
        return Ok(());
    }

    ctx.output.header("Cart");
    let widths = [4, 40, 14, 4, 14];
    ctx.output
        .table_row(&["ID", "PRODUCT", "PRICE", "QTY", "SUBTOTAL"], &widths);
    for row in &view.items {
        let id = row.id.to_string();
        let title = truncate(&row.title, widths[1]);
        let quantity = row.quantity.to_string();
        ctx.output.table_row(
            &[&id, &title, &row.price, &quantity, &row.subtotal],
            &widths,
        );
    }
    println!();
    ctx.output.kv("Items", &view.item_count.to_string());
    ctx.output.kv("Total", &view.total);

    Ok(())
}
