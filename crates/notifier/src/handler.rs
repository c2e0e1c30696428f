//! Handling of one `order_created` event.
//!
//! Each new order produces at most one webhook call. Failures are logged and
//! reported, never retried.

use tracing::{error, info, instrument, warn};

use bakehouse_core::{OrderId, SellerOrderNotice};

use crate::db::OrderSource;
use crate::webhook::WebhookClient;

/// What happened to one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The webhook accepted the notice.
    Sent,
    /// No order has this ID.
    MissingOrder,
    /// The order could not be read.
    LookupFailed,
    /// The webhook call failed.
    WebhookFailed,
}

/// Notify the seller of order `order_id`.
///
/// When the seller's email cannot be found the notice goes out with
/// [`bakehouse_core::UNKNOWN_SELLER_EMAIL`].
#[instrument(skip(source, webhook), fields(order_id = %order_id))]
pub async fn handle_order_created<S>(source: &S, webhook: &WebhookClient, order_id: OrderId) -> Outcome
where
    S: OrderSource + Sync,
{
    let order = match source.order(order_id).await {
        Ok(Some(order)) => order,
        Ok(None) => {
            error!("Order not found");
            return Outcome::MissingOrder;
        }
        Err(e) => {
            let event_id = sentry::capture_error(&e);
            error!(error = %e, sentry_event_id = %event_id, "Failed to load order");
            return Outcome::LookupFailed;
        }
    };

    let seller_email = match source.seller_email(order.seller_id).await {
        Ok(email) => {
            if email.is_none() {
                warn!(seller_id = %order.seller_id, "Seller has no account, using fallback email");
            }
            email
        }
        Err(e) => {
            warn!(seller_id = %order.seller_id, error = %e, "Seller lookup failed, using fallback email");
            None
        }
    };

    let notice = SellerOrderNotice::from_order(&order, seller_email.as_ref());

    match webhook.send(&notice).await {
        Ok(()) => {
            info!(seller_email = %notice.seller_email, "Seller notified");
            Outcome::Sent
        }
        Err(e) => {
            let event_id = sentry::capture_error(&e);
            error!(error = %e, sentry_event_id = %event_id, "Webhook call failed");
            Outcome::WebhookFailed
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use axum::{Json, Router, http::StatusCode, routing::post};
    use bakehouse_core::{Email, Order, OrderStatus, ProductId, TxnId, UNKNOWN_SELLER_EMAIL, UserId};
    use chrono::Utc;
    use url::Url;

    use super::*;
    use crate::db::SourceError;

    #[derive(Default)]
    struct FakeSource {
        orders: HashMap<OrderId, Order>,
        emails: HashMap<UserId, Email>,
        broken_orders: bool,
        broken_users: bool,
    }

    impl OrderSource for FakeSource {
        async fn order(&self, id: OrderId) -> Result<Option<Order>, SourceError> {
            if self.broken_orders {
                return Err(SourceError::DataCorruption("bad row".into()));
            }
            Ok(self.orders.get(&id).cloned())
        }

        async fn seller_email(&self, seller_id: UserId) -> Result<Option<Email>, SourceError> {
            if self.broken_users {
                return Err(SourceError::DataCorruption("bad row".into()));
            }
            Ok(self.emails.get(&seller_id).cloned())
        }
    }

    type Seen = Arc<Mutex<Vec<serde_json::Value>>>;

    async fn fake_webhook(status: StatusCode) -> (WebhookClient, Seen) {
        let seen: Seen = Arc::default();
        let recorder = Arc::clone(&seen);
        let app = Router::new().route(
            "/hook",
            post(move |Json(body): Json<serde_json::Value>| {
                recorder.lock().unwrap().push(body);
                async move { status }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await });

        let url = Url::parse(&format!("http://{addr}/hook")).unwrap();
        (WebhookClient::new(url, Duration::from_secs(5)).unwrap(), seen)
    }

    fn order() -> Order {
        Order {
            id: OrderId::new(31),
            product_id: ProductId::new(5),
            buyer_id: UserId::new(8),
            buyer_name: "Zoya".into(),
            seller_id: UserId::new(2),
            product_title: "Red velvet".into(),
            quantity: 3,
            txn_id: TxnId::parse("556677@upi").unwrap(),
            status: OrderStatus::Paid,
            created_at: Utc::now(),
        }
    }

    fn source_with_order() -> FakeSource {
        let order = order();
        FakeSource {
            orders: HashMap::from([(order.id, order)]),
            emails: HashMap::from([(UserId::new(2), Email::parse("bakes@example.com").unwrap())]),
            ..FakeSource::default()
        }
    }

    #[tokio::test]
    async fn test_sends_notice_to_webhook() {
        let (webhook, seen) = fake_webhook(StatusCode::OK).await;

        let outcome = handle_order_created(&source_with_order(), &webhook, OrderId::new(31)).await;

        assert_eq!(outcome, Outcome::Sent);
        let bodies = seen.lock().unwrap();
        assert_eq!(bodies.len(), 1);
        assert_eq!(bodies[0]["sellerEmail"], "bakes@example.com");
        assert_eq!(bodies[0]["productTitle"], "Red velvet");
        assert_eq!(bodies[0]["quantity"], 3);
        assert_eq!(bodies[0]["buyerName"], "Zoya");
        assert_eq!(bodies[0]["txnId"], "556677@upi");
        assert_eq!(bodies[0]["status"], "Paid");
    }

    #[tokio::test]
    async fn test_missing_seller_uses_fallback_email() {
        let (webhook, seen) = fake_webhook(StatusCode::OK).await;
        let mut source = source_with_order();
        source.emails.clear();

        let outcome = handle_order_created(&source, &webhook, OrderId::new(31)).await;

        assert_eq!(outcome, Outcome::Sent);
        assert_eq!(seen.lock().unwrap()[0]["sellerEmail"], UNKNOWN_SELLER_EMAIL);
    }

    #[tokio::test]
    async fn test_broken_seller_lookup_uses_fallback_email() {
        let (webhook, seen) = fake_webhook(StatusCode::OK).await;
        let source = FakeSource {
            broken_users: true,
            ..source_with_order()
        };

        let outcome = handle_order_created(&source, &webhook, OrderId::new(31)).await;

        assert_eq!(outcome, Outcome::Sent);
        assert_eq!(seen.lock().unwrap()[0]["sellerEmail"], UNKNOWN_SELLER_EMAIL);
    }

    #[tokio::test]
    async fn test_missing_order_sends_nothing() {
        let (webhook, seen) = fake_webhook(StatusCode::OK).await;

        let outcome = handle_order_created(&source_with_order(), &webhook, OrderId::new(99)).await;

        assert_eq!(outcome, Outcome::MissingOrder);
        assert!(seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_order_lookup_failure() {
        let (webhook, seen) = fake_webhook(StatusCode::OK).await;
        let source = FakeSource {
            broken_orders: true,
            ..FakeSource::default()
        };

        let outcome = handle_order_created(&source, &webhook, OrderId::new(31)).await;

        assert_eq!(outcome, Outcome::LookupFailed);
        assert!(seen.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_webhook_error_is_reported_once() {
        let (webhook, seen) = fake_webhook(StatusCode::SERVICE_UNAVAILABLE).await;

        let outcome = handle_order_created(&source_with_order(), &webhook, OrderId::new(31)).await;

        assert_eq!(outcome, Outcome::WebhookFailed);
        assert_eq!(seen.lock().unwrap().len(), 1);
    }
}
