//! Cart type.

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::cart::CartLineItem;
use crate::error::CartError;
use crate::ids::ProductId;
use crate::money::Money;

/// An ordered sequence of line items, keyed by product id.
///
/// Insertion order is kept for display. Outside this crate a `Cart` is
/// read-only; it only changes through [`CartStore`](crate::CartStore)
/// operations. Serializes as a plain JSON array of line items.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<CartLineItem>", into = "Vec<CartLineItem>")]
pub struct Cart {
    items: Vec<CartLineItem>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Iterate over line items.
    pub fn iter(&self) -> std::slice::Iter<'_, CartLineItem> {
        self.items.iter()
    }

    /// Get the line item for a product.
    pub fn get(&self, product_id: ProductId) -> Option<&CartLineItem> {
        self.items.iter().find(|i| i.product_id == product_id)
    }

    /// Check whether a line item exists for a product.
    pub fn contains(&self, product_id: ProductId) -> bool {
        self.items.iter().any(|i| i.product_id == product_id)
    }

    /// Quantity of a product in the cart, 0 when absent.
    pub fn quantity_of(&self, product_id: ProductId) -> u32 {
        self.get(product_id).map_or(0, |i| i.quantity)
    }

    /// Per-product quantities, for "already in cart" badges.
    pub fn items_amount(&self) -> BTreeMap<ProductId, u32> {
        self.items
            .iter()
            .map(|i| (i.product_id, i.quantity))
            .collect()
    }

    /// Get total item count (sum of quantities).
    pub fn item_count(&self) -> u64 {
        self.items.iter().map(|i| u64::from(i.quantity)).sum()
    }

    /// Get number of line items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if cart is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Sum of line item subtotals.
    pub fn total(&self) -> Result<Money, CartError> {
        self.items.iter().try_fold(Money::zero(), |acc, item| {
            acc.try_add(&item.subtotal()?).ok_or(CartError::Overflow)
        })
    }

    /// Append a new line item. Returns false, leaving the cart untouched,
    /// if the product is already present or the quantity is zero.
    pub(crate) fn push(&mut self, item: CartLineItem) -> bool {
        if item.quantity == 0 || self.contains(item.product_id) {
            return false;
        }
        self.items.push(item);
        true
    }

    /// Replace a line item's quantity. Returns false if the product is
    /// absent or the quantity is zero.
    pub(crate) fn set_quantity(&mut self, product_id: ProductId, quantity: u32) -> bool {
        if quantity == 0 {
            return false;
        }
        match self.items.iter_mut().find(|i| i.product_id == product_id) {
            Some(item) => {
                item.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Remove a line item, returning it if it existed.
    pub(crate) fn remove(&mut self, product_id: ProductId) -> Option<CartLineItem> {
        let index = self.items.iter().position(|i| i.product_id == product_id)?;
        Some(self.items.remove(index))
    }
}

impl From<Vec<CartLineItem>> for Cart {
    /// Build a cart from raw line items, dropping any that break the cart
    /// invariants (zero quantity, repeated product id). First occurrence wins.
    fn from(raw: Vec<CartLineItem>) -> Self {
        let mut seen = HashSet::with_capacity(raw.len());
        let mut items = Vec::with_capacity(raw.len());
        for item in raw {
            if item.quantity == 0 {
                warn!(product_id = %item.product_id, "dropping line item with zero quantity");
                continue;
            }
            if !seen.insert(item.product_id) {
                warn!(product_id = %item.product_id, "dropping duplicate line item");
                continue;
            }
            items.push(item);
        }
        Self { items }
    }
}

impl From<Cart> for Vec<CartLineItem> {
    fn from(cart: Cart) -> Self {
        cart.items
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartLineItem;
    type IntoIter = std::slice::Iter<'a, CartLineItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: u64, cents: u64, quantity: u32) -> CartLineItem {
        let mut item = CartLineItem::new(ProductId::new(id), format!("Product {}", id), Money::new(cents), "");
        item.quantity = quantity;
        item
    }

    #[test]
    fn test_cart_creation() {
        let cart = Cart::new();
        assert!(cart.is_empty());
        assert_eq!(cart.total().unwrap(), Money::zero());
    }

    #[test]
    fn test_push_rejects_duplicates() {
        let mut cart = Cart::new();
        assert!(cart.push(item(1, 1000, 1)));
        assert!(!cart.push(item(1, 1000, 1)));
        assert!(!cart.push(item(2, 1000, 0)));
        assert_eq!(cart.len(), 1);
    }

    #[test]
    fn test_set_quantity_touches_only_target() {
        let mut cart = Cart::from(vec![item(1, 1000, 1), item(2, 2000, 4)]);
        assert!(cart.set_quantity(ProductId::new(1), 3));
        assert_eq!(cart.quantity_of(ProductId::new(1)), 3);
        assert_eq!(cart.quantity_of(ProductId::new(2)), 4);

        assert!(!cart.set_quantity(ProductId::new(1), 0));
        assert!(!cart.set_quantity(ProductId::new(9), 2));
        assert_eq!(cart.quantity_of(ProductId::new(1)), 3);
    }

    #[test]
    fn test_remove_item() {
        let mut cart = Cart::from(vec![item(1, 1000, 1), item(2, 2000, 1), item(3, 3000, 1)]);
        let removed = cart.remove(ProductId::new(2)).unwrap();
        assert_eq!(removed.product_id, ProductId::new(2));
        let ids: Vec<u64> = cart.iter().map(|i| i.product_id.get()).collect();
        assert_eq!(ids, vec![1, 3]);
        assert!(cart.remove(ProductId::new(2)).is_none());
    }

    #[test]
    fn test_totals() {
        let cart = Cart::from(vec![item(1, 1000, 2), item(2, 2000, 1)]);
        assert_eq!(cart.total().unwrap().amount_cents, 4000);
        assert_eq!(cart.item_count(), 3);
        assert_eq!(
            cart.items_amount().into_iter().collect::<Vec<_>>(),
            vec![(ProductId::new(1), 2), (ProductId::new(2), 1)]
        );
    }

    #[test]
    fn test_total_overflow() {
        let cart = Cart::from(vec![item(1, u64::MAX, 1), item(2, 1, 1)]);
        assert!(matches!(cart.total(), Err(CartError::Overflow)));
    }

    #[test]
    fn test_from_raw_drops_invalid_items() {
        let cart = Cart::from(vec![item(1, 1000, 2), item(2, 500, 0), item(1, 1000, 7)]);
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.quantity_of(ProductId::new(1)), 2);
    }

    #[test]
    fn test_serializes_as_array() {
        let cart = Cart::from(vec![item(1, 17990, 2)]);
        let json = serde_json::to_string(&cart).unwrap();
        assert_eq!(
            json,
            r#"[{"id":1,"title":"Product 1","price":179.9,"image":"","amount":2}]"#
        );
        let back: Cart = serde_json::from_str(&json).unwrap();
        assert_eq!(back, cart);
    }
}
