//! Domain models for the marketplace.
//!
//! These types represent validated domain objects separate from database row types.

pub mod product;
pub mod session;
pub mod user;

pub use product::{NewProduct, Product, ProductFilter};
pub use session::{CurrentUser, keys as session_keys};
pub use user::User;
