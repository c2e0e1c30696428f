//! Bakehouse seller notifier.
//!
//! Watches for newly created orders and posts a [`bakehouse_core::SellerOrderNotice`]
//! for each one to the seller-notification webhook.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod config;
pub mod db;
pub mod handler;
pub mod listener;
pub mod webhook;

pub use db::{OrderSource, PgOrderSource, SourceError};
pub use handler::{Outcome, handle_order_created};
pub use listener::{ORDER_CREATED_CHANNEL, listen};
pub use webhook::{WebhookClient, WebhookError};
