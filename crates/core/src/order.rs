//! Order records.
//!
//! Checkout writes one order per cart line. Orders are immutable once written.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{CartItem, Email, OrderId, OrderStatus, ProductId, TxnId, UserId};

/// The buyer placing an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuyerIdentity {
    pub id: UserId,
    pub email: Email,
    pub display_name: Option<String>,
}

impl BuyerIdentity {
    /// Name recorded on the order: the display name, else the email.
    #[must_use]
    pub fn display_name(&self) -> String {
        self.display_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
            .map_or_else(|| self.email.to_string(), String::from)
    }
}

/// An order that has not been stored yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewOrder {
    pub product_id: ProductId,
    pub buyer_id: UserId,
    pub buyer_name: String,
    pub seller_id: UserId,
    pub product_title: String,
    pub quantity: u32,
    pub txn_id: TxnId,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl NewOrder {
    /// Build the order record for one cart line.
    #[must_use]
    pub fn for_cart_item(
        item: &CartItem,
        buyer: &BuyerIdentity,
        txn_id: &TxnId,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            product_id: item.id,
            buyer_id: buyer.id,
            buyer_name: buyer.display_name(),
            seller_id: item.seller_id,
            product_title: item.title.clone(),
            quantity: item.quantity,
            txn_id: txn_id.clone(),
            status: OrderStatus::Paid,
            created_at,
        }
    }
}

/// A stored order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    pub id: OrderId,
    pub product_id: ProductId,
    pub buyer_id: UserId,
    pub buyer_name: String,
    pub seller_id: UserId,
    pub product_title: String,
    pub quantity: u32,
    pub txn_id: TxnId,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl Order {
    /// Attach the ID assigned by storage.
    #[must_use]
    pub fn from_new(id: OrderId, order: NewOrder) -> Self {
        Self {
            id,
            product_id: order.product_id,
            buyer_id: order.buyer_id,
            buyer_name: order.buyer_name,
            seller_id: order.seller_id,
            product_title: order.product_title,
            quantity: order.quantity,
            txn_id: order.txn_id,
            status: order.status,
            created_at: order.created_at,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::Price;

    fn buyer(display_name: Option<&str>) -> BuyerIdentity {
        BuyerIdentity {
            id: UserId::new(3),
            email: Email::parse("asha@example.com").unwrap(),
            display_name: display_name.map(String::from),
        }
    }

    #[test]
    fn test_buyer_name_falls_back_to_email() {
        assert_eq!(buyer(Some("Asha")).display_name(), "Asha");
        assert_eq!(buyer(Some("  ")).display_name(), "asha@example.com");
        assert_eq!(buyer(None).display_name(), "asha@example.com");
    }

    #[test]
    fn test_order_for_cart_item_is_paid() {
        let item = CartItem {
            id: ProductId::new(11),
            title: "Sourdough".into(),
            price: Price::new(Decimal::new(180, 0)).unwrap(),
            image_url: None,
            color: None,
            quantity: 2,
            seller_id: UserId::new(5),
            seller_email: None,
        };
        let txn = TxnId::parse("UPI-778").unwrap();
        let now = Utc::now();

        let order = NewOrder::for_cart_item(&item, &buyer(None), &txn, now);

        assert_eq!(order.status, OrderStatus::Paid);
        assert_eq!(order.product_id, ProductId::new(11));
        assert_eq!(order.seller_id, UserId::new(5));
        assert_eq!(order.quantity, 2);
        assert_eq!(order.buyer_name, "asha@example.com");
        assert_eq!(order.created_at, now);
    }
}
