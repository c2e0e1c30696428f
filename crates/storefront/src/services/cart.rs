//! Session-backed cart persistence.
//!
//! The cart lives in the visitor's session under [`session_keys::CART`] and is
//! written back after every mutation, so it survives logins and restarts of
//! the storefront (sessions are stored in `PostgreSQL`).

use tower_sessions::Session;
use tracing::warn;

use bakehouse_core::Cart;

use crate::models::session_keys;

/// Load the cart from the session.
///
/// A missing or undecodable cart is treated as empty.
pub async fn load(session: &Session) -> Cart {
    match session.get::<Cart>(session_keys::CART).await {
        Ok(cart) => cart.unwrap_or_default(),
        Err(e) => {
            warn!(error = %e, "Discarding unreadable cart from session");
            Cart::new()
        }
    }
}

/// Write the cart to the session.
///
/// # Errors
///
/// Returns an error if the session store rejects the write.
pub async fn save(session: &Session, cart: &Cart) -> Result<(), tower_sessions::session::Error> {
    session.insert(session_keys::CART, cart).await
}

/// Empty the cart.
///
/// # Errors
///
/// Returns an error if the session store rejects the write.
pub async fn clear(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove_value(session_keys::CART)
        .await
        .map(|_| ())
}
