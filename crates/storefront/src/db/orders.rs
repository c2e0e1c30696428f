//! Order repository for database operations.
//!
//! Every insert fires the `order_created` notification through a table
//! trigger, which the notifier service listens for.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use bakehouse_core::{NewOrder, Order, OrderId, OrderStatus, ProductId, TxnId, UserId};

use super::RepositoryError;
use crate::services::checkout::OrderSink;

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
    type Error = RepositoryError;

    fn try_from(row: OrderRow) -> Result<Self, Self::Error> {
        let corrupt = |what: &str, e: &dyn std::fmt::Display| {
            RepositoryError::DataCorruption(format!("invalid {what} for order {}: {e}", row.id))
        };

        let quantity = u32::try_from(row.quantity).map_err(|e| corrupt("quantity", &e))?;
        let txn_id = TxnId::parse(&row.txn_id).map_err(|e| corrupt("txn_id", &e))?;
        let status = row
            .status
            .parse::<OrderStatus>()
            .map_err(|e| corrupt("status", &e))?;

        Ok(Self {
            id: OrderId::new(row.id),
            product_id: ProductId::new(row.product_id),
            buyer_id: UserId::new(row.buyer_id),
            buyer_name: row.buyer_name,
            seller_id: UserId::new(row.seller_id),
            product_title: row.product_title,
            quantity,
            txn_id,
            status,
            created_at: row.created_at,
        })
    }
}

/// Repository for order database operations.
pub struct OrderRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> OrderRepository<'a> {
    /// Create a new order repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Store one order.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    /// Returns `RepositoryError::DataCorruption` if the quantity does not fit the column.
    pub async fn create(&self, order: NewOrder) -> Result<Order, RepositoryError> {
        let quantity = i32::try_from(order.quantity).map_err(|_| {
            RepositoryError::DataCorruption(format!("quantity {} out of range", order.quantity))
        })?;

        let id: i32 = sqlx::query_scalar(
            r"
            INSERT INTO bakehouse.order
                (product_id, buyer_id, buyer_name, seller_id, product_title,
                 quantity, txn_id, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING id
            ",
        )
        .bind(order.product_id.as_i32())
        .bind(order.buyer_id.as_i32())
        .bind(&order.buyer_name)
        .bind(order.seller_id.as_i32())
        .bind(&order.product_title)
        .bind(quantity)
        .bind(order.txn_id.as_str())
        .bind(order.status.as_str())
        .bind(order.created_at)
        .fetch_one(self.pool)
        .await?;

        Ok(Order::from_new(OrderId::new(id), order))
    }

    /// List the orders placed for one seller's products, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if a stored row is invalid.
    pub async fn list_by_seller(&self, seller_id: UserId) -> Result<Vec<Order>, RepositoryError> {
        sqlx::query_as::<_, OrderRow>(
            r"
            SELECT id, product_id, buyer_id, buyer_name, seller_id, product_title,
                   quantity, txn_id, status, created_at
            FROM bakehouse.order
            WHERE seller_id = $1
            ORDER BY created_at DESC, id DESC
            ",
        )
        .bind(seller_id.as_i32())
        .fetch_all(self.pool)
        .await?
        .into_iter()
        .map(Order::try_from)
        .collect()
    }

    /// Count all orders.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bakehouse.order")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}

impl OrderSink for OrderRepository<'_> {
    async fn insert(&self, order: NewOrder) -> Result<Order, RepositoryError> {
        self.create(order).await
    }
}
