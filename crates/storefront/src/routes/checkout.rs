//! Checkout route handlers.
//!
//! `GET` shows what to pay and where; `POST` records the buyer's UPI
//! reference and places the orders. The cart is cleared only when every order
//! was stored.

use axum::{Json, extract::State};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::{error, instrument};

use bakehouse_core::{BuyerIdentity, TxnId};

use crate::db::OrderRepository;
use crate::error::{AppError, Result};
use crate::middleware::{OptionalAuth, RequireAuth};
use crate::services::cart as cart_store;
use crate::services::checkout::{
    CheckoutError, CheckoutReceipt, CheckoutService, OrderNotifier, OrderSink, PaymentSummary,
};
use crate::state::AppState;

/// Checkout submission body.
#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    #[serde(default)]
    pub txn_id: String,
}

/// Payment summary for the current cart.
pub async fn summary(
    State(state): State<AppState>,
    RequireAuth(_user): RequireAuth,
    session: Session,
) -> Json<PaymentSummary> {
    let cart = cart_store::load(&session).await;
    Json(PaymentSummary::from_cart(
        &cart,
        state.config().upi_id.as_deref(),
    ))
}

/// Place one order per cart line.
///
/// The transaction reference is checked before the login, so a blank
/// reference is reported even to anonymous visitors.
#[instrument(skip_all)]
pub async fn submit(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
    session: Session,
    Json(body): Json<CheckoutRequest>,
) -> Result<Json<CheckoutReceipt>> {
    let txn_id = TxnId::parse(&body.txn_id).map_err(|e| AppError::BadRequest(e.to_string()))?;
    let user = user.ok_or_else(|| AppError::Unauthorized("Please login".to_string()))?;

    let service = CheckoutService::new(
        OrderRepository::new(state.pool()),
        state.relay().clone(),
        state.config().notify.fallback_seller_email.clone(),
    );

    let receipt = place_orders(&service, &session, &user.as_buyer(), &txn_id).await?;
    Ok(Json(receipt))
}

/// Check out the session's cart, emptying it only when checkout succeeds.
async fn place_orders<S: OrderSink, N: OrderNotifier>(
    service: &CheckoutService<S, N>,
    session: &Session,
    buyer: &BuyerIdentity,
    txn_id: &TxnId,
) -> Result<CheckoutReceipt> {
    let cart = cart_store::load(session).await;

    let receipt = match service.submit(buyer, &cart, txn_id).await {
        Ok(receipt) => receipt,
        Err(err) => {
            if let CheckoutError::Persist { failed_index, .. }
            | CheckoutError::Notify { failed_index, .. } = &err
            {
                error!(
                    buyer_id = %buyer.id,
                    failed_index,
                    placed = err.placed().len(),
                    "Checkout stopped part way; earlier orders remain"
                );
            }
            return Err(err.into());
        }
    };

    cart_store::clear(session).await?;

    Ok(receipt)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicI32, Ordering};

    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use rust_decimal::Decimal;
    use tower_sessions::MemoryStore;

    use bakehouse_core::{
        Cart, CartItem, Email, NewOrder, Order, OrderId, OrderNotification, Price, ProductId,
        UserId,
    };

    use super::*;
    use crate::db::RepositoryError;
    use crate::services::relay::NotifyError;

    struct CountingSink {
        attempts: AtomicI32,
        fail_at: Option<i32>,
    }

    impl OrderSink for CountingSink {
        async fn insert(&self, order: NewOrder) -> std::result::Result<Order, RepositoryError> {
            let attempt = self.attempts.fetch_add(1, Ordering::SeqCst);
            if self.fail_at == Some(attempt) {
                return Err(RepositoryError::NotFound);
            }
            Ok(Order::from_new(OrderId::new(attempt + 1), order))
        }
    }

    struct QuietRelay;

    impl OrderNotifier for QuietRelay {
        async fn notify(&self, _: &OrderNotification) -> std::result::Result<(), NotifyError> {
            Ok(())
        }
    }

    fn service(fail_at: Option<i32>) -> CheckoutService<CountingSink, QuietRelay> {
        CheckoutService::new(
            CountingSink {
                attempts: AtomicI32::new(0),
                fail_at,
            },
            QuietRelay,
            None,
        )
    }

    async fn session_with_cart(lines: i32) -> Session {
        let session = Session::new(None, Arc::new(MemoryStore::default()), None);
        let mut cart = Cart::new();
        for i in 1..=lines {
            cart.add(CartItem {
                id: ProductId::new(i),
                title: format!("Macaron box {i}"),
                price: Price::new(Decimal::new(300, 0)).unwrap(),
                image_url: None,
                color: None,
                quantity: 1,
                seller_id: UserId::new(40),
                seller_email: None,
            });
        }
        cart_store::save(&session, &cart).await.unwrap();
        session
    }

    fn buyer() -> BuyerIdentity {
        BuyerIdentity {
            id: UserId::new(12),
            email: Email::parse("meera@example.com").unwrap(),
            display_name: None,
        }
    }

    fn txn() -> TxnId {
        TxnId::parse("UPI-5150").unwrap()
    }

    #[tokio::test]
    async fn test_successful_checkout_clears_cart() {
        let session = session_with_cart(2).await;

        let receipt = place_orders(&service(None), &session, &buyer(), &txn())
            .await
            .unwrap();

        assert_eq!(receipt.orders.len(), 2);
        assert!(cart_store::load(&session).await.is_empty());
    }

    #[tokio::test]
    async fn test_failed_checkout_keeps_cart() {
        let session = session_with_cart(3).await;

        let err = place_orders(&service(Some(1)), &session, &buyer(), &txn())
            .await
            .unwrap_err();

        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(cart_store::load(&session).await.len(), 3);
    }

    #[tokio::test]
    async fn test_empty_cart_is_bad_request() {
        let session = session_with_cart(0).await;

        let err = place_orders(&service(None), &session, &buyer(), &txn())
            .await
            .unwrap_err();

        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }
}
