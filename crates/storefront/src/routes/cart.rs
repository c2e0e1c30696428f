//! Cart route handlers.
//!
//! The cart is kept in the session (see [`crate::services::cart`]) and saved
//! after every mutation. Each mutation answers with the updated cart.

use axum::{Json, extract::State};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::{debug, instrument};

use bakehouse_core::{Cart, CartItem, CartKey, Price, ProductId};

use crate::db::{ProductRepository, UserRepository};
use crate::error::{AppError, Result};
use crate::services::cart as cart_store;
use crate::state::AppState;

/// Cart contents with totals.
#[derive(Debug, Serialize)]
pub struct CartView {
    pub items: Vec<CartItem>,
    pub subtotal: Price,
    pub item_count: u32,
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.items().to_vec(),
            subtotal: cart.subtotal(),
            item_count: cart.item_count(),
        }
    }
}

/// Badge count.
#[derive(Debug, Serialize)]
pub struct CartCount {
    pub count: u32,
}

/// Add to cart body.
#[derive(Debug, Deserialize)]
pub struct AddToCartRequest {
    pub product_id: ProductId,
    pub quantity: Option<u32>,
    pub color: Option<String>,
}

/// Update quantity body.
#[derive(Debug, Deserialize)]
pub struct UpdateCartRequest {
    pub product_id: ProductId,
    pub color: Option<String>,
    pub quantity: i64,
}

/// Remove line body.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartRequest {
    pub product_id: ProductId,
    pub color: Option<String>,
}

/// Blank colours mean "no colour".
fn normalize_color(color: Option<String>) -> Option<String> {
    color
        .map(|c| c.trim().to_string())
        .filter(|c| !c.is_empty())
}

/// Show the cart.
pub async fn show(session: Session) -> Json<CartView> {
    let cart = cart_store::load(&session).await;
    Json(CartView::from(&cart))
}

/// Total units in the cart.
pub async fn count(session: Session) -> Json<CartCount> {
    let cart = cart_store::load(&session).await;
    Json(CartCount {
        count: cart.item_count(),
    })
}

/// Add a product to the cart.
///
/// Title, price and seller come from the stored product, never the client.
#[instrument(skip(state, session, body), fields(product_id = %body.product_id))]
pub async fn add(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<AddToCartRequest>,
) -> Result<Json<CartView>> {
    let product = ProductRepository::new(state.pool())
        .get_by_id(body.product_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("product {}", body.product_id)))?;

    let seller_email = UserRepository::new(state.pool())
        .get_by_id(product.seller_id)
        .await?
        .map(|seller| seller.email);

    let mut cart = cart_store::load(&session).await;
    cart.add(CartItem {
        id: product.id,
        title: product.title,
        price: product.price,
        image_url: product.image_url,
        color: normalize_color(body.color),
        quantity: body.quantity.unwrap_or(1),
        seller_id: product.seller_id,
        seller_email,
    });
    cart_store::save(&session, &cart).await?;

    debug!(lines = cart.len(), "Cart updated");
    Ok(Json(CartView::from(&cart)))
}

/// Set a line's quantity (floored at one). Unknown lines are left alone.
pub async fn update(
    session: Session,
    Json(body): Json<UpdateCartRequest>,
) -> Result<Json<CartView>> {
    let mut cart = cart_store::load(&session).await;
    let key = CartKey::new(body.product_id, normalize_color(body.color));

    if cart.update_quantity(&key, body.quantity) {
        cart_store::save(&session, &cart).await?;
    }
    Ok(Json(CartView::from(&cart)))
}

/// Remove a line.
pub async fn remove(
    session: Session,
    Json(body): Json<RemoveFromCartRequest>,
) -> Result<Json<CartView>> {
    let mut cart = cart_store::load(&session).await;
    let key = CartKey::new(body.product_id, normalize_color(body.color));

    if cart.remove(&key) {
        cart_store::save(&session, &cart).await?;
    }
    Ok(Json(CartView::from(&cart)))
}

/// Empty the cart.
pub async fn clear(session: Session) -> Result<Json<CartView>> {
    cart_store::clear(&session).await?;
    Ok(Json(CartView::from(&Cart::new())))
}
