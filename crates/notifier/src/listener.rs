//! `PostgreSQL` `LISTEN` loop.
//!
//! Inserting into `bakehouse.order` fires `pg_notify('order_created', id)`
//! from a table trigger. The listener turns each notification into one call
//! to [`handle_order_created`], one at a time, in arrival order.
//!
//! `PgListener` reconnects on its own after a dropped connection; orders
//! inserted while disconnected are not replayed.

use std::future::Future;

use sqlx::PgPool;
use sqlx::postgres::PgListener;
use tracing::{debug, info, warn};

use bakehouse_core::OrderId;

use crate::db::OrderSource;
use crate::handler::{Outcome, handle_order_created};
use crate::webhook::WebhookClient;

/// Channel the order trigger notifies on.
pub const ORDER_CREATED_CHANNEL: &str = "order_created";

/// Parse a notification payload into an order ID.
#[must_use]
pub fn parse_order_id(payload: &str) -> Option<OrderId> {
    payload.parse().ok()
}

/// Handle one notification payload.
///
/// Returns `None` when the payload is not an order ID. Failures are already
/// logged and reported by [`handle_order_created`], so the outcome is only
/// traced here.
pub async fn handle_payload<S>(source: &S, webhook: &WebhookClient, payload: &str) -> Option<Outcome>
where
    S: OrderSource + Sync,
{
    let Some(order_id) = parse_order_id(payload) else {
        warn!(payload, "Ignoring notification with unparseable order ID");
        return None;
    };

    let outcome = handle_order_created(source, webhook, order_id).await;
    debug!(order_id = %order_id, ?outcome, "Order event handled");
    Some(outcome)
}

/// Listen for new orders until `shutdown` resolves.
///
/// # Errors
///
/// Returns `sqlx::Error` if the listener cannot connect or subscribe, or if
/// receiving fails for a reason other than a dropped connection.
pub async fn listen<S, F>(
    pool: &PgPool,
    source: &S,
    webhook: &WebhookClient,
    shutdown: F,
) -> Result<(), sqlx::Error>
where
    S: OrderSource + Sync,
    F: Future<Output = ()>,
{
    let mut listener = PgListener::connect_with(pool).await?;
    listener.listen(ORDER_CREATED_CHANNEL).await?;
    info!(channel = ORDER_CREATED_CHANNEL, "Listening for new orders");

    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            () = &mut shutdown => {
                info!("Shutdown signal received, stopping listener");
                return Ok(());
            }
            notification = listener.recv() => {
                let notification = notification?;
                handle_payload(source, webhook, notification.payload()).await;
            }
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use bakehouse_core::{Email, Order, UserId};
    use url::Url;

    use super::*;
    use crate::db::SourceError;

    /// A source with no orders at all.
    struct EmptySource;

    impl OrderSource for EmptySource {
        async fn order(&self, _: OrderId) -> Result<Option<Order>, SourceError> {
            Ok(None)
        }

        async fn seller_email(&self, _: UserId) -> Result<Option<Email>, SourceError> {
            Ok(None)
        }
    }

    /// Shared buffer the test subscriber writes formatted events to.
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_failed_event_is_reported_once() {
        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let webhook = WebhookClient::new(
            Url::parse("http://127.0.0.1:9/never-called").unwrap(),
            Duration::from_secs(1),
        )
        .unwrap();

        let outcome = handle_payload(&EmptySource, &webhook, "17").await;
        assert_eq!(outcome, Some(Outcome::MissingOrder));

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert_eq!(output.matches("ERROR").count(), 1);
        assert_eq!(output.matches("WARN").count(), 0);
    }

    #[tokio::test]
    async fn test_unparseable_payload_is_skipped() {
        let webhook = WebhookClient::new(
            Url::parse("http://127.0.0.1:9/never-called").unwrap(),
            Duration::from_secs(1),
        )
        .unwrap();

        assert_eq!(handle_payload(&EmptySource, &webhook, "not-an-id").await, None);
    }

    #[test]
    fn test_parse_order_id() {
        assert_eq!(parse_order_id("42"), Some(OrderId::new(42)));
        assert_eq!(parse_order_id(" 7 "), Some(OrderId::new(7)));
        assert_eq!(parse_order_id(""), None);
        assert_eq!(parse_order_id("order-42"), None);
    }
}
