//! Product route handlers.
//!
//! The marketplace listing, product detail, seller profiles and product
//! upload for sellers.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{info, instrument};

use bakehouse_core::{Price, ProductId, Role, UserId};

use crate::db::ProductRepository;
use crate::error::{AppError, Result};
use crate::middleware::{RequireAuth, require_role};
use crate::models::{NewProduct, Product, ProductFilter};
use crate::state::AppState;

/// Product upload body.
#[derive(Debug, Deserialize)]
pub struct CreateProductRequest {
    pub title: String,
    pub price: Decimal,
    #[serde(default)]
    pub description: String,
    pub image_url: Option<String>,
}

/// A seller's public listings.
#[derive(Debug, Serialize)]
pub struct SellerProducts {
    pub seller_id: UserId,
    pub products: Vec<Product>,
}

/// Marketplace listing, newest first, narrowed by `search`, `min` and `max`.
#[instrument(skip(state))]
pub async fn index(
    State(state): State<AppState>,
    Query(filter): Query<ProductFilter>,
) -> Result<Json<Vec<Product>>> {
    let products = ProductRepository::new(state.pool()).list_all().await?;
    Ok(Json(filter.apply(products)))
}

/// A single product.
#[instrument(skip(state), fields(product_id = %id))]
pub async fn show(
    State(state): State<AppState>,
    Path(id): Path<ProductId>,
) -> Result<Json<Product>> {
    ProductRepository::new(state.pool())
        .get_by_id(id)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("product {id}")))
}

/// Every listing of one seller.
#[instrument(skip(state), fields(seller_id = %seller_id))]
pub async fn by_seller(
    State(state): State<AppState>,
    Path(seller_id): Path<UserId>,
) -> Result<Json<SellerProducts>> {
    let products = ProductRepository::new(state.pool())
        .list_by_seller(seller_id)
        .await?;

    Ok(Json(SellerProducts {
        seller_id,
        products,
    }))
}

/// Upload a product as the logged-in seller.
///
/// The listing's seller name is the seller's display name, else their email.
#[instrument(skip(state, user, body), fields(seller_id = %user.id, title = %body.title))]
pub async fn create(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    Json(body): Json<CreateProductRequest>,
) -> Result<(StatusCode, Json<Product>)> {
    require_role(&user, Role::Seller)?;

    let title = body.title.trim();
    if title.is_empty() {
        return Err(AppError::BadRequest("Title is required".to_string()));
    }
    let price = Price::new(body.price).map_err(|e| AppError::BadRequest(e.to_string()))?;

    let product = NewProduct {
        title: title.to_string(),
        price,
        description: body.description.trim().to_string(),
        image_url: body
            .image_url
            .map(|url| url.trim().to_string())
            .filter(|url| !url.is_empty()),
        seller_id: user.id,
        seller_name: user.as_buyer().display_name(),
    };

    let product = ProductRepository::new(state.pool()).create(&product).await?;

    info!(product_id = %product.id, "Product uploaded");

    Ok((StatusCode::CREATED, Json(product)))
}
