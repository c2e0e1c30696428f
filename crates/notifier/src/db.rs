//! Order and seller lookups for the notifier.

use std::future::Future;
use std::time::Duration;

use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use thiserror::Error;

use bakehouse_core::{Email, Order, OrderId, OrderStatus, ProductId, TxnId, UserId};

/// Errors returned by order lookups.
#[derive(Debug, Error)]
pub enum SourceError {
    /// Database error from sqlx.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Data in the database is corrupted or invalid.
    #[error("data corruption: {0}")]
    DataCorruption(String),
}

/// Where the notifier reads orders and seller emails from.
pub trait OrderSource {
    fn order(
        &self,
        id: OrderId,
    ) -> impl Future<Output = Result<Option<Order>, SourceError>> + Send;

    fn seller_email(
        &self,
        seller_id: UserId,
    ) -> impl Future<Output = Result<Option<Email>, SourceError>> + Send;
}

/// Create a small `PostgreSQL` pool; the notifier handles one order at a time.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(3)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

#[derive(sqlx::FromRow)]
struct OrderRow {
    id: i32,
    product_id: i32,
    buyer_id: i32,
    buyer_name: String,
    seller_id: i32,
    product_title: String,
    quantity: i32,
    txn_id: String,
    status: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<OrderRow> for Order {
    type Error = SourceError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let corrupt = |what: &str, e: &dyn std::fmt::Display| {
            SourceError::DataCorruption(format!("invalid {what} for order {}: {e}", row.id))
        };

        Ok(Self {
            id: OrderId::new(row.id),
            product_id: ProductId::new(row.product_id),
            buyer_id: UserId::new(row.buyer_id),
            quantity: u32::try_from(row.quantity).map_err(|e| corrupt("quantity", &e))?,
            txn_id: TxnId::parse(&row.txn_id).map_err(|e| corrupt("txn_id", &e))?,
            status: row
                .status
                .parse::<OrderStatus>()
                .map_err(|e| corrupt("status", &e))?,
            buyer_name: row.buyer_name,
            seller_id: UserId::new(row.seller_id),
            product_title: row.product_title,
            created_at: row.created_at,
        })
    }
}

/// [`OrderSource`] backed by the marketplace database.
#[derive(Clone)]
pub struct PgOrderSource {
    pool: PgPool,
}

impl PgOrderSource {
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl OrderSource for PgOrderSource {
    async fn order(&self, id: OrderId) -> Result<Option<Order>, SourceError> {
        sqlx::query_as::<_, OrderRow>(
            r"
            SELECT id, product_id, buyer_id, buyer_name, seller_id, product_title,
                   quantity, txn_id, status, created_at
            FROM bakehouse.order
            WHERE id = $1
            ",
        )
        .bind(id.as_i32())
        .fetch_optional(&self.pool)
        .await?
        .map(Order::try_from)
        .transpose()
    }

    async fn seller_email(&self, seller_id: UserId) -> Result<Option<Email>, SourceError> {
        let email: Option<String> =
            sqlx::query_scalar("SELECT email FROM bakehouse.user WHERE id = $1")
                .bind(seller_id.as_i32())
                .fetch_optional(&self.pool)
                .await?;

        email
            .map(|raw| {
                Email::parse(&raw).map_err(|e| {
                    SourceError::DataCorruption(format!("invalid email for user {seller_id}: {e}"))
                })
            })
            .transpose()
    }
}
