//! Cart store.
//!
//! A cart is an ordered list of lines, one per `(product, colour)` pair.
//! Adding a product that is already in the cart in the same colour merges into
//! the existing line; the same product in another colour is a separate line.
//! Quantities never drop below one: removing a line is an explicit operation.
//! They never exceed [`MAX_QUANTITY`], the largest value the order table stores.
//!
//! The cart itself has no persistence. Callers save it under
//! [`CART_STORAGE_KEY`] after every mutation.

use serde::{Deserialize, Serialize};

use crate::{Email, Price, ProductId, UserId};

/// Storage key holding the serialized cart.
pub const CART_STORAGE_KEY: &str = "cart";

/// Largest quantity a cart line can hold.
pub const MAX_QUANTITY: u32 = i32::MAX.unsigned_abs();

/// Uniqueness key of a cart line.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CartKey {
    pub product_id: ProductId,
    pub color: Option<String>,
}

impl CartKey {
    #[must_use]
    pub const fn new(product_id: ProductId, color: Option<String>) -> Self {
        Self { product_id, color }
    }
}

/// One cart line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartItem {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    pub image_url: Option<String>,
    pub color: Option<String>,
    pub quantity: u32,
    pub seller_id: UserId,
    pub seller_email: Option<Email>,
}

impl CartItem {
    #[must_use]
    pub fn key(&self) -> CartKey {
        CartKey::new(self.id, self.color.clone())
    }

    fn matches(&self, key: &CartKey) -> bool {
        self.id == key.product_id && self.color == key.color
    }

    #[must_use]
    pub fn line_total(&self) -> Price {
        self.price.times(self.quantity)
    }
}

/// The cart: insertion-ordered lines with unique keys.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    items: Vec<CartItem>,
}

impl Cart {
    #[must_use]
    pub const fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Add a line, merging into an existing line with the same key.
    ///
    /// A quantity of zero is treated as one. Quantities are capped at
    /// [`MAX_QUANTITY`].
    pub fn add(&mut self, mut item: CartItem) {
        item.quantity = item.quantity.clamp(1, MAX_QUANTITY);

        let key = item.key();
        if let Some(existing) = self.items.iter_mut().find(|ci| ci.matches(&key)) {
            existing.quantity = existing
                .quantity
                .saturating_add(item.quantity)
                .min(MAX_QUANTITY);
        } else {
            self.items.push(item);
        }
    }

    /// Set the quantity of a line, floored at one and capped at [`MAX_QUANTITY`].
    ///
    /// Returns `false` (and changes nothing) when no line has this key.
    pub fn update_quantity(&mut self, key: &CartKey, quantity: i64) -> bool {
        let quantity = u32::try_from(quantity.clamp(1, i64::from(MAX_QUANTITY)))
            .unwrap_or(MAX_QUANTITY);
        match self.items.iter_mut().find(|ci| ci.matches(key)) {
            Some(item) => {
                item.quantity = quantity;
                true
            }
            None => false,
        }
    }

    /// Remove a line. Returns whether a line was removed.
    pub fn remove(&mut self, key: &CartKey) -> bool {
        let before = self.items.len();
        self.items.retain(|ci| !ci.matches(key));
        self.items.len() != before
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    #[must_use]
    pub fn items(&self) -> &[CartItem] {
        &self.items
    }

    #[must_use]
    pub fn get(&self, key: &CartKey) -> Option<&CartItem> {
        self.items.iter().find(|ci| ci.matches(key))
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct lines.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Total units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items
            .iter()
            .fold(0_u32, |acc, ci| acc.saturating_add(ci.quantity))
    }

    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.items.iter().map(CartItem::line_total).sum()
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartItem;
    type IntoIter = std::slice::Iter<'a, CartItem>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    fn item(id: i32, color: Option<&str>, quantity: u32) -> CartItem {
        CartItem {
            id: ProductId::new(id),
            title: format!("Cake {id}"),
            price: Price::new(Decimal::new(25_000, 2)).unwrap(),
            image_url: None,
            color: color.map(String::from),
            quantity,
            seller_id: UserId::new(9),
            seller_email: None,
        }
    }

    #[test]
    fn test_add_same_key_merges_quantities() {
        let mut cart = Cart::new();
        cart.add(item(1, Some("pink"), 2));
        cart.add(item(1, Some("pink"), 3));

        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].quantity, 5);
    }

    #[test]
    fn test_add_other_color_is_separate_line() {
        let mut cart = Cart::new();
        cart.add(item(1, Some("pink"), 1));
        cart.add(item(1, Some("blue"), 1));
        cart.add(item(1, None, 1));

        assert_eq!(cart.len(), 3);
        assert_eq!(cart.item_count(), 3);
    }

    #[test]
    fn test_add_zero_quantity_counts_as_one() {
        let mut cart = Cart::new();
        cart.add(item(4, None, 0));
        assert_eq!(cart.items()[0].quantity, 1);
    }

    #[test]
    fn test_update_quantity_is_floored_at_one() {
        let mut cart = Cart::new();
        cart.add(item(2, None, 4));
        let key = CartKey::new(ProductId::new(2), None);

        for requested in [0, -3, 1] {
            assert!(cart.update_quantity(&key, requested));
            assert_eq!(cart.get(&key).unwrap().quantity, 1);
        }

        assert!(cart.update_quantity(&key, 7));
        assert_eq!(cart.get(&key).unwrap().quantity, 7);
    }

    #[test]
    fn test_quantities_fit_the_order_table() {
        let mut cart = Cart::new();
        let key = CartKey::new(ProductId::new(6), None);

        cart.add(item(6, None, u32::MAX));
        assert_eq!(cart.get(&key).unwrap().quantity, MAX_QUANTITY);

        cart.update_quantity(&key, 10);
        cart.add(item(6, None, MAX_QUANTITY));
        assert_eq!(cart.get(&key).unwrap().quantity, MAX_QUANTITY);

        assert!(cart.update_quantity(&key, 3_000_000_000));
        let quantity = cart.get(&key).unwrap().quantity;
        assert_eq!(quantity, MAX_QUANTITY);
        assert!(i32::try_from(quantity).is_ok());
    }

    #[test]
    fn test_update_unknown_key_is_noop() {
        let mut cart = Cart::new();
        cart.add(item(2, Some("red"), 4));
        let before = cart.clone();

        assert!(!cart.update_quantity(&CartKey::new(ProductId::new(2), None), 9));
        assert_eq!(cart, before);
    }

    #[test]
    fn test_remove_only_matching_color() {
        let mut cart = Cart::new();
        cart.add(item(3, Some("white"), 1));
        cart.add(item(3, Some("dark"), 1));

        assert!(cart.remove(&CartKey::new(ProductId::new(3), Some("dark".into()))));
        assert!(!cart.remove(&CartKey::new(ProductId::new(3), Some("dark".into()))));
        assert_eq!(cart.len(), 1);
        assert_eq!(cart.items()[0].color.as_deref(), Some("white"));
    }

    #[test]
    fn test_subtotal_and_clear() {
        let mut cart = Cart::new();
        cart.add(item(1, None, 2));
        cart.add(item(2, None, 1));
        assert_eq!(cart.subtotal(), Price::new(Decimal::new(75_000, 2)).unwrap());

        cart.clear();
        assert!(cart.is_empty());
        assert_eq!(cart.subtotal(), Price::zero());
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let mut cart = Cart::new();
        cart.add(item(1, None, 1));
        let value = serde_json::to_value(&cart).unwrap();
        assert!(value.is_array());

        let restored: Cart = serde_json::from_value(value).unwrap();
        assert_eq!(restored, cart);
    }
}
