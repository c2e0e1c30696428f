//! Business logic services for the storefront.
//!
//! # Services
//!
//! - `auth` - Email/password accounts
//! - `cart` - Session-backed cart persistence
//! - `checkout` - UPI checkout: order placement and relay notification
//! - `dashboard` - Seller sales figures
//! - `relay` - HTTP client for the order relay

pub mod auth;
pub mod cart;
pub mod checkout;
pub mod dashboard;
pub mod relay;
