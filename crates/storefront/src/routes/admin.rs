//! Admin overview and user management.

use axum::{Json, extract::State};
use serde::Serialize;
use tracing::instrument;

use bakehouse_core::{Email, Role, UserId};

use crate::db::{OrderRepository, ProductRepository, UserRepository};
use crate::error::Result;
use crate::middleware::{RequireAuth, require_role};
use crate::models::User;
use crate::state::AppState;

/// Marketplace totals.
#[derive(Debug, Serialize)]
pub struct AdminDashboard {
    pub users: i64,
    pub products: i64,
    pub orders: i64,
}

/// One row of the user list.
#[derive(Debug, Serialize)]
pub struct UserSummary {
    pub uid: UserId,
    pub email: Email,
    pub role: Role,
}

impl From<User> for UserSummary {
    fn from(user: User) -> Self {
        Self {
            uid: user.id,
            email: user.email,
            role: user.role,
        }
    }
}

/// Counts of users, products and orders.
#[instrument(skip(state, user), fields(admin_id = %user.id))]
pub async fn dashboard(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<AdminDashboard>> {
    require_role(&user, Role::Admin)?;

    let pool = state.pool();
    let (user_repo, product_repo, order_repo) = (
        UserRepository::new(pool),
        ProductRepository::new(pool),
        OrderRepository::new(pool),
    );
    let (users, products, orders) = tokio::try_join!(
        user_repo.count(),
        product_repo.count(),
        order_repo.count(),
    )?;

    Ok(Json(AdminDashboard {
        users,
        products,
        orders,
    }))
}

/// Every account with its role.
#[instrument(skip(state, user), fields(admin_id = %user.id))]
pub async fn users(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
) -> Result<Json<Vec<UserSummary>>> {
    require_role(&user, Role::Admin)?;

    let users = UserRepository::new(state.pool()).list_all().await?;
    Ok(Json(users.into_iter().map(UserSummary::from).collect()))
}
