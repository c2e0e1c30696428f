//! End-to-end tests for Bakehouse.
//!
//! The tests talk to already running services over HTTP and are ignored by
//! default.
//!
//! # Running Tests
//!
//! ```bash
//! cargo run -p bakehouse-cli -- migrate
//! cargo run -p bakehouse-relay &
//! cargo run -p bakehouse-storefront &
//! cargo test -p bakehouse-integration-tests -- --ignored
//! ```
//!
//! # Environment Variables
//!
//! - `STOREFRONT_TEST_URL` - Storefront base URL (default: `http://localhost:3000`)
//! - `RELAY_TEST_URL` - Relay base URL (default: `http://localhost:5000`)

use reqwest::Client;
use uuid::Uuid;

/// Storefront base URL.
#[must_use]
pub fn storefront_url() -> String {
    std::env::var("STOREFRONT_TEST_URL").unwrap_or_else(|_| "http://localhost:3000".to_string())
}

/// Relay base URL.
#[must_use]
pub fn relay_url() -> String {
    std::env::var("RELAY_TEST_URL").unwrap_or_else(|_| "http://localhost:5000".to_string())
}

/// A client that keeps the session cookie between requests.
///
/// # Panics
///
/// Panics if the TLS backend cannot be initialised.
#[must_use]
#[allow(clippy::expect_used)]
pub fn session_client() -> Client {
    Client::builder()
        .cookie_store(true)
        .build()
        .expect("Failed to create HTTP client")
}

/// A fresh email address so runs never collide on the unique index.
#[must_use]
pub fn unique_email(prefix: &str) -> String {
    format!("{prefix}-{}@example.com", Uuid::new_v4().simple())
}
