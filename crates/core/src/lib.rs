//! Bakehouse Core - Shared types library.
//!
//! This crate provides the types used across all Bakehouse components:
//! - `storefront` - Marketplace API (auth, products, cart, checkout)
//! - `relay` - Order notification forwarding relay
//! - `notifier` - Order-created trigger that notifies sellers
//! - `cli` - Command-line tools for migrations and management
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no database
//! access, no HTTP clients. The cart store lives here because its merge and
//! quantity rules are shared by every surface that touches a cart.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, emails, transaction IDs and statuses
//! - [`cart`] - Cart store keyed by product and colour variant
//! - [`order`] - Order records created at checkout
//! - [`notification`] - Webhook payloads sent to external automations

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod notification;
pub mod order;
pub mod types;

pub use cart::{CART_STORAGE_KEY, Cart, CartItem, CartKey, MAX_QUANTITY};
pub use notification::{OrderNotification, SellerOrderNotice, UNKNOWN_SELLER_EMAIL};
pub use order::{BuyerIdentity, NewOrder, Order};
pub use types::*;
