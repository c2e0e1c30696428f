//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /health                      - Liveness
//! GET  /health/ready                - Database check
//!
//! # Auth
//! POST /api/auth/signup             - Create a customer or seller account
//! POST /api/auth/login              - Login, answers with the role's landing path
//! POST /api/auth/logout             - Logout
//! GET  /api/auth/me                 - Current user or null
//!
//! # Products
//! GET  /api/products                - Marketplace (?search=&min=&max=)
//! POST /api/products                - Upload (seller)
//! GET  /api/products/{id}           - Product detail
//! GET  /api/sellers/{id}/products   - Seller profile
//!
//! # Cart (session)
//! GET  /api/cart                    - Cart with subtotal
//! GET  /api/cart/count              - Units in cart
//! POST /api/cart/add                - Add a product
//! POST /api/cart/update             - Set a line's quantity
//! POST /api/cart/remove             - Remove a line
//! POST /api/cart/clear              - Empty the cart
//!
//! # Checkout (requires auth)
//! GET  /api/checkout                - UPI payment summary
//! POST /api/checkout                - Submit the UPI reference and place orders
//!
//! # Dashboards
//! GET  /api/seller/dashboard        - Seller sales figures
//! GET  /api/admin/dashboard         - Marketplace totals
//! GET  /api/admin/users             - User list
//! ```

pub mod admin;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod products;
pub mod seller;

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index).post(products::create))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/count", get(cart::count))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
}

/// Create the admin routes router.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(admin::dashboard))
        .route("/users", get(admin::users))
}

/// Create all API routes, nested under `/api`.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .nest("/products", product_routes())
        .route("/sellers/{id}/products", get(products::by_seller))
        .nest("/cart", cart_routes())
        .route("/checkout", get(checkout::summary).post(checkout::submit))
        .route("/seller/dashboard", get(seller::dashboard))
        .nest("/admin", admin_routes())
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .nest("/api", api_routes())
}

/// Liveness health check endpoint.
///
/// Returns "ok" if the server is running. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness health check endpoint.
///
/// Returns 503 Service Unavailable if the database is not reachable.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(_) => StatusCode::SERVICE_UNAVAILABLE,
    }
}
