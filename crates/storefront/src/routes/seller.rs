//! Seller dashboard.

use axum::{Json, extract::State};
use tracing::instrument;

use bakehouse_core::Role;

use crate::db::{OrderRepository, ProductRepository};
use crate::error::Result;
use crate::middleware::{RequireAuth, require_role};
use crate::services::dashboard::SellerDashboard;
use crate::state::AppState;

/// The logged-in seller's products, orders and sales figures.
#[instrument(skip(state, user), fields(seller_id = %user.id))]
pub async fn dashboard(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<SellerDashboard>> {
    require_role(&user, Role::Seller)?;

    let products = ProductRepository::new(state.pool())
        .list_by_seller(user.id)
        .await?;
    let orders = OrderRepository::new(state.pool())
        .list_by_seller(user.id)
        .await?;

    Ok(Json(SellerDashboard::build(products, orders)))
}
