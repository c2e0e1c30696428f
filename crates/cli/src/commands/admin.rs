//! Admin user management commands.
//!
//! # Usage
//!
//! ```bash
//! bh-cli admin create -e admin@example.com -p 'long password' -n "Admin Name"
//! ```

use secrecy::ExposeSecret;
use sqlx::PgPool;
use thiserror::Error;

use bakehouse_core::Role;
use bakehouse_storefront::services::auth::{AuthError, AuthService};

/// Errors that can occur during admin operations.
#[derive(Debug, Error)]
pub enum AdminError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Database connection error.
    #[error("Database connection error: {0}")]
    Database(#[from] sqlx::Error),

    /// Account could not be created.
    #[error("{0}")]
    Auth(#[from] AuthError),
}

/// Create a new admin user and return its ID.
///
/// # Errors
///
/// Returns `AdminError` if the email or password is invalid, the email is
/// taken, or the database is unreachable.
pub async fn create_user(
    email: &str,
    password: &str,
    name: Option<&str>,
) -> Result<i32, AdminError> {
    let database_url = super::database_url().map_err(AdminError::MissingEnvVar)?;

    tracing::info!("Connecting to database...");
    let pool = PgPool::connect(database_url.expose_secret()).await?;

    let user = AuthService::new(&pool)
        .create_account(email, password, Role::Admin, name)
        .await?;

    tracing::info!(user_id = %user.id, email = %user.email, "Admin user created");
    Ok(user.id.as_i32())
}
