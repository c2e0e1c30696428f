//! Authentication route handlers.
//!
//! Signup, login, logout and the current-user lookup. Successful logins store
//! a [`CurrentUser`] in the session and tell the client where the user's role
//! lands.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};
use tower_sessions::Session;
use tracing::{info, instrument};

use bakehouse_core::Role;

use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::middleware::{OptionalAuth, clear_current_user, set_current_user};
use crate::models::CurrentUser;
use crate::services::auth::AuthService;
use crate::state::AppState;

/// Where the client goes after signing up.
pub const AFTER_SIGNUP_PATH: &str = "/login";

/// Signup request body.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub role: Role,
    pub display_name: Option<String>,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Response for signup and login.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: CurrentUser,
    pub redirect: &'static str,
}

/// Create an account.
///
/// The new user is not logged in; the client is sent to the login page.
#[instrument(skip(state, body), fields(email = %body.email, role = %body.role))]
pub async fn signup(
    State(state): State<AppState>,
    Json(body): Json<SignupRequest>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    let user = AuthService::new(state.pool())
        .register(
            &body.email,
            &body.password,
            body.role,
            body.display_name.as_deref(),
        )
        .await?;

    info!(user_id = %user.id, "Account created");

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user: CurrentUser::from(&user),
            redirect: AFTER_SIGNUP_PATH,
        }),
    ))
}

/// Log in and redirect by role.
#[instrument(skip(state, session, body), fields(email = %body.email))]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    Json(body): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    let user = AuthService::new(state.pool())
        .login(&body.email, &body.password)
        .await?;

    let current = CurrentUser::from(&user);
    set_current_user(&session, &current).await?;
    set_sentry_user(&user.id, Some(user.email.as_str()));

    info!(user_id = %user.id, role = %user.role, "User logged in");

    Ok(Json(AuthResponse {
        redirect: current.role.landing_path(),
        user: current,
    }))
}

/// Log out. Always succeeds.
pub async fn logout(session: Session) -> Result<StatusCode> {
    clear_current_user(&session).await?;
    clear_sentry_user();
    Ok(StatusCode::NO_CONTENT)
}

/// The logged-in user, or `null`.
pub async fn me(OptionalAuth(user): OptionalAuth) -> Json<Option<CurrentUser>> {
    Json(user)
}
