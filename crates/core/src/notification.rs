//! Webhook payloads.
//!
//! Both payloads are consumed by external automations that read fields by
//! their camelCase names, so the field names are part of the contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{CartItem, Email, NewOrder, Order, OrderStatus, ProductId};

/// Seller email used when the order's seller has no account record.
pub const UNKNOWN_SELLER_EMAIL: &str = "unknown@example.com";

/// Sent by checkout to the relay, once per placed order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderNotification {
    pub product_id: ProductId,
    pub product_title: String,
    pub quantity: u32,
    pub buyer_name: String,
    pub buyer_email: Email,
    pub seller_email: Option<Email>,
    pub txn_id: String,
}

impl OrderNotification {
    /// Build the relay payload for an order placed from `item`.
    ///
    /// `fallback_seller_email` is used when the cart line carries no seller email.
    #[must_use]
    pub fn for_order(
        order: &NewOrder,
        item: &CartItem,
        buyer_email: &Email,
        fallback_seller_email: Option<&Email>,
    ) -> Self {
        Self {
            product_id: order.product_id,
            product_title: order.product_title.clone(),
            quantity: order.quantity,
            buyer_name: order.buyer_name.clone(),
            buyer_email: buyer_email.clone(),
            seller_email: item
                .seller_email
                .clone()
                .or_else(|| fallback_seller_email.cloned()),
            txn_id: order.txn_id.to_string(),
        }
    }
}

/// Sent by the order trigger to the seller-notification webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SellerOrderNotice {
    pub seller_email: String,
    pub product_title: String,
    pub quantity: u32,
    pub buyer_name: String,
    pub txn_id: String,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl SellerOrderNotice {
    /// Derive the notice from a stored order and its seller's email, if known.
    #[must_use]
    pub fn from_order(order: &Order, seller_email: Option<&Email>) -> Self {
        Self {
            seller_email: seller_email
                .map_or_else(|| UNKNOWN_SELLER_EMAIL.to_owned(), ToString::to_string),
            product_title: order.product_title.clone(),
            quantity: order.quantity,
            buyer_name: order.buyer_name.clone(),
            txn_id: order.txn_id.to_string(),
            status: order.status,
            created_at: order.created_at,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rust_decimal::Decimal;
    use serde_json::json;

    use super::*;
    use crate::{BuyerIdentity, OrderId, Price, TxnId, UserId};

    fn cart_item(seller_email: Option<&str>) -> CartItem {
        CartItem {
            id: ProductId::new(8),
            title: "Rose Cupcake".into(),
            price: Price::new(Decimal::new(60, 0)).unwrap(),
            image_url: None,
            color: Some("pink".into()),
            quantity: 6,
            seller_id: UserId::new(2),
            seller_email: seller_email.map(|e| Email::parse(e).unwrap()),
        }
    }

    fn new_order(item: &CartItem) -> NewOrder {
        let buyer = BuyerIdentity {
            id: UserId::new(4),
            email: Email::parse("ravi@example.com").unwrap(),
            display_name: Some("Ravi".into()),
        };
        NewOrder::for_cart_item(item, &buyer, &TxnId::parse("4411@upi").unwrap(), Utc::now())
    }

    #[test]
    fn test_relay_payload_field_names() {
        let item = cart_item(Some("oven@example.com"));
        let order = new_order(&item);
        let buyer_email = Email::parse("ravi@example.com").unwrap();

        let payload = OrderNotification::for_order(&order, &item, &buyer_email, None);
        let value = serde_json::to_value(&payload).unwrap();

        assert_eq!(
            value,
            json!({
                "productId": 8,
                "productTitle": "Rose Cupcake",
                "quantity": 6,
                "buyerName": "Ravi",
                "buyerEmail": "ravi@example.com",
                "sellerEmail": "oven@example.com",
                "txnId": "4411@upi",
            })
        );
    }

    #[test]
    fn test_relay_payload_uses_fallback_seller_email() {
        let item = cart_item(None);
        let order = new_order(&item);
        let buyer_email = Email::parse("ravi@example.com").unwrap();
        let fallback = Email::parse("orders@bakehouse.example").unwrap();

        let payload = OrderNotification::for_order(&order, &item, &buyer_email, Some(&fallback));
        assert_eq!(payload.seller_email, Some(fallback));

        let payload = OrderNotification::for_order(&order, &item, &buyer_email, None);
        assert_eq!(payload.seller_email, None);
    }

    #[test]
    fn test_seller_notice_falls_back_to_unknown_email() {
        let item = cart_item(None);
        let order = Order::from_new(OrderId::new(1), new_order(&item));

        let notice = SellerOrderNotice::from_order(&order, None);
        assert_eq!(notice.seller_email, UNKNOWN_SELLER_EMAIL);

        let seller = Email::parse("oven@example.com").unwrap();
        let notice = SellerOrderNotice::from_order(&order, Some(&seller));
        assert_eq!(notice.seller_email, "oven@example.com");

        let value = serde_json::to_value(&notice).unwrap();
        assert_eq!(value["status"], "Paid");
        assert_eq!(value["buyerName"], "Ravi");
        assert!(value.get("createdAt").is_some());
    }
}
