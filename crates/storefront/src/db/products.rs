//! Product repository for database operations.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use bakehouse_core::{Price, ProductId, UserId};

use super::RepositoryError;
use crate::models::{NewProduct, Product};

#[derive(sqlx::FromRow)]
struct ProductRow {
    id: i32,
    title: String,
    price: Decimal,
    description: String,
    image_url: Option<String>,
    seller_id: i32,
    seller_name: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<ProductRow> for Product {
    type Error = RepositoryError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let price = Price::new(row.price).map_err(|e| {
            RepositoryError::DataCorruption(format!("invalid price for product {}: {e}", row.id))
        })?;

        Ok(Self {
            id: ProductId::new(row.id),
            title: row.title,
            price,
            description: row.description,
            image_url: row.image_url,
            seller_id: UserId::new(row.seller_id),
            seller_name: row.seller_name,
            created_at: row.created_at,
        })
    }
}

const PRODUCT_COLUMNS: &str =
    "id, title, price, description, image_url, seller_id, seller_name, created_at";

/// Repository for product database operations.
pub struct ProductRepository<'a> {
    pool: &'a PgPool,
}

impl<'a> ProductRepository<'a> {
    /// Create a new product repository.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }

    /// Store a new listing.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the insert fails.
    pub async fn create(&self, product: &NewProduct) -> Result<Product, RepositoryError> {
        let sql = format!(
            r"
            INSERT INTO bakehouse.product
                (title, price, description, image_url, seller_id, seller_name)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {PRODUCT_COLUMNS}
            "
        );

        let row = sqlx::query_as::<_, ProductRow>(&sql)
            .bind(&product.title)
            .bind(product.price.amount())
            .bind(&product.description)
            .bind(product.image_url.as_deref())
            .bind(product.seller_id.as_i32())
            .bind(&product.seller_name)
            .fetch_one(self.pool)
            .await?;

        Product::try_from(row)
    }

    /// Get a listing by ID.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    /// Returns `RepositoryError::DataCorruption` if the stored price is invalid.
    pub async fn get_by_id(&self, id: ProductId) -> Result<Option<Product>, RepositoryError> {
        let sql = format!("SELECT {PRODUCT_COLUMNS} FROM bakehouse.product WHERE id = $1");

        sqlx::query_as::<_, ProductRow>(&sql)
            .bind(id.as_i32())
            .fetch_optional(self.pool)
            .await?
            .map(Product::try_from)
            .transpose()
    }

    /// List every listing, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_all(&self) -> Result<Vec<Product>, RepositoryError> {
        let sql = format!(
            "SELECT {PRODUCT_COLUMNS} FROM bakehouse.product ORDER BY created_at DESC, id DESC"
        );

        sqlx::query_as::<_, ProductRow>(&sql)
            .fetch_all(self.pool)
            .await?
            .into_iter()
            .map(Product::try_from)
            .collect()
    }

    /// List one seller's listings, newest first.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn list_by_seller(&self, seller_id: UserId) -> Result<Vec<Product>, RepositoryError> {
        let sql = format!(
            r"
            SELECT {PRODUCT_COLUMNS} FROM bakehouse.product
            WHERE seller_id = $1
            ORDER BY created_at DESC, id DESC
            "
        );

        sqlx::query_as::<_, ProductRow>(&sql)
            .bind(seller_id.as_i32())
            .fetch_all(self.pool)
            .await?
            .into_iter()
            .map(Product::try_from)
            .collect()
    }

    /// Count all listings.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError::Database` if the query fails.
    pub async fn count(&self) -> Result<i64, RepositoryError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bakehouse.product")
            .fetch_one(self.pool)
            .await?;
        Ok(count)
    }
}
