//! UPI checkout.
//!
//! Payment happens outside the system: the buyer pays the shop's UPI ID and
//! reports the transaction reference. Submitting checkout then writes one
//! order per cart line, in cart order, and tells the relay about each one.
//!
//! Placement is not atomic. If storing line `k` fails, lines before `k` stay
//! stored and later lines are never attempted; the error carries the orders
//! that were placed. The same holds when the relay cannot be reached after
//! line `k` was stored. A relay that answers with an error status is only
//! logged and counted.

use std::future::Future;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::{info, instrument, warn};

use bakehouse_core::{
    BuyerIdentity, Cart, CartItem, Email, NewOrder, Order, OrderNotification, Price, TxnId,
};

use crate::db::RepositoryError;
use crate::services::relay::NotifyError;

/// Where placed orders are stored.
pub trait OrderSink {
    fn insert(
        &self,
        order: NewOrder,
    ) -> impl Future<Output = Result<Order, RepositoryError>> + Send;
}

/// Who hears about placed orders.
pub trait OrderNotifier {
    fn notify(
        &self,
        notification: &OrderNotification,
    ) -> impl Future<Output = Result<(), NotifyError>> + Send;
}

/// Errors that stop a checkout.
#[derive(Debug, Error)]
pub enum CheckoutError {
    #[error("cart is empty")]
    EmptyCart,

    /// Storing the order for cart line `failed_index` failed.
    #[error("failed to store order for cart line {failed_index}: {source}")]
    Persist {
        failed_index: usize,
        placed: Vec<Order>,
        #[source]
        source: RepositoryError,
    },

    /// The relay could not be reached after storing cart line `failed_index`.
    ///
    /// `placed` includes the order for that line.
    #[error("failed to notify relay for cart line {failed_index}: {source}")]
    Notify {
        failed_index: usize,
        placed: Vec<Order>,
        #[source]
        source: NotifyError,
    },
}

impl CheckoutError {
    /// Orders stored before the checkout stopped.
    #[must_use]
    pub fn placed(&self) -> &[Order] {
        match self {
            Self::EmptyCart => &[],
            Self::Persist { placed, .. } | Self::Notify { placed, .. } => placed,
        }
    }
}

/// Result of a completed checkout.
#[derive(Debug, Clone, Serialize)]
pub struct CheckoutReceipt {
    pub orders: Vec<Order>,
    pub total: Price,
    /// Orders the relay answered with an error status.
    pub notifications_failed: usize,
}

/// Places orders for a cart.
pub struct CheckoutService<S, N> {
    sink: S,
    notifier: N,
    fallback_seller_email: Option<Email>,
}

impl<S: OrderSink, N: OrderNotifier> CheckoutService<S, N> {
    #[must_use]
    pub const fn new(sink: S, notifier: N, fallback_seller_email: Option<Email>) -> Self {
        Self {
            sink,
            notifier,
            fallback_seller_email,
        }
    }

    /// Place one order per cart line, stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns `CheckoutError::EmptyCart` without touching storage when the cart
    /// has no lines, `CheckoutError::Persist` when an order cannot be stored and
    /// `CheckoutError::Notify` when the relay cannot be reached.
    pub async fn submit(
        &self,
        buyer: &BuyerIdentity,
        cart: &Cart,
        txn_id: &TxnId,
    ) -> Result<CheckoutReceipt, CheckoutError> {
        self.submit_at(buyer, cart, txn_id, Utc::now()).await
    }

    /// Place one order per cart line, all stamped with `created_at`.
    ///
    /// # Errors
    ///
    /// See [`CheckoutService::submit`].
    #[instrument(skip_all, fields(buyer_id = %buyer.id, lines = cart.len()))]
    pub async fn submit_at(
        &self,
        buyer: &BuyerIdentity,
        cart: &Cart,
        txn_id: &TxnId,
        created_at: DateTime<Utc>,
    ) -> Result<CheckoutReceipt, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        let mut placed = Vec::with_capacity(cart.len());
        let mut notifications_failed = 0;

        for (index, item) in cart.items().iter().enumerate() {
            let new_order = NewOrder::for_cart_item(item, buyer, txn_id, created_at);
            let notification = OrderNotification::for_order(
                &new_order,
                item,
                &buyer.email,
                self.fallback_seller_email.as_ref(),
            );

            let order = match self.sink.insert(new_order).await {
                Ok(order) => order,
                Err(source) => {
                    return Err(CheckoutError::Persist {
                        failed_index: index,
                        placed,
                        source,
                    });
                }
            };

            match self.notifier.notify(&notification).await {
                Ok(()) => placed.push(order),
                Err(e @ NotifyError::Status { .. }) => {
                    notifications_failed += 1;
                    warn!(order_id = %order.id, error = %e, "Relay rejected order notification");
                    placed.push(order);
                }
                Err(source @ NotifyError::Http(_)) => {
                    placed.push(order);
                    return Err(CheckoutError::Notify {
                        failed_index: index,
                        placed,
                        source,
                    });
                }
            }
        }

        info!(
            orders = placed.len(),
            notifications_failed, "Checkout completed"
        );

        Ok(CheckoutReceipt {
            orders: placed,
            total: cart.subtotal(),
            notifications_failed,
        })
    }
}

/// One line of the payment summary.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentLine {
    pub title: String,
    pub color: Option<String>,
    pub quantity: u32,
    pub line_total: Price,
}

impl From<&CartItem> for PaymentLine {
    fn from(item: &CartItem) -> Self {
        Self {
            title: item.title.clone(),
            color: item.color.clone(),
            quantity: item.quantity,
            line_total: item.line_total(),
        }
    }
}

/// What the buyer sees before paying.
#[derive(Debug, Clone, Serialize)]
pub struct PaymentSummary {
    pub upi_id: Option<String>,
    pub lines: Vec<PaymentLine>,
    pub total: Price,
}

impl PaymentSummary {
    #[must_use]
    pub fn from_cart(cart: &Cart, upi_id: Option<&str>) -> Self {
        Self {
            upi_id: upi_id.map(String::from),
            lines: cart.items().iter().map(PaymentLine::from).collect(),
            total: cart.subtotal(),
        }
    }
}
