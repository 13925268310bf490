//! Authentication route handlers.

use axum::{Json, extract::State, http::StatusCode};
use serde::{Deserialize, Serialize};

use crate::error::{ApiError, ApiResult};
use crate::middleware::AuthUser;
use crate::models::user::UserView;
use crate::services::auth::AuthService;
use crate::state::AppState;

/// Signup request body. Fields are `Option`s so a missing field is a 400
/// with a message, not a deserialization failure.
#[derive(Debug, Deserialize)]
pub struct SignupRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Login request body.
#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Token plus the user's own view. The password is not a field of any view
/// type, so it cannot leak here.
#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user: UserView,
}

/// Register a new account.
///
/// # Errors
///
/// Returns 400 for missing/invalid fields, 409 for an already-registered
/// email.
pub async fn signup(
    State(state): State<AppState>,
    Json(body): Json<SignupRequest>,
) -> ApiResult<(StatusCode, Json<AuthResponse>)> {
    let (Some(name), Some(email), Some(password)) = (body.name, body.email, body.password) else {
        return Err(ApiError::Validation(
            "please provide all required fields".to_owned(),
        ));
    };

    let auth = AuthService::new(state.pool());
    let user = auth.signup(&name, &email, &password).await?;
    let token = state.tokens().issue(user.id)?;
    let view = auth.user_view(user.id).await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthResponse { token, user: view }),
    ))
}

/// Login with email and password.
///
/// # Errors
///
/// Returns 401 with a generic message whether the email is unknown or the
/// password is wrong.
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let (Some(email), Some(password)) = (body.email, body.password) else {
        return Err(ApiError::Validation(
            "please provide email and password".to_owned(),
        ));
    };

    let auth = AuthService::new(state.pool());
    let user = auth.login(&email, &password).await?;
    let token = state.tokens().issue(user.id)?;
    let view = auth.user_view(user.id).await?;

    Ok(Json(AuthResponse { token, user: view }))
}

/// The authenticated user's own view.
///
/// # Errors
///
/// Returns 401 for a missing/invalid token.
pub async fn me(
    AuthUser(user_id): AuthUser,
    State(state): State<AppState>,
) -> ApiResult<Json<UserView>> {
    let auth = AuthService::new(state.pool());
    let view = auth.user_view(user_id).await?;

    Ok(Json(view))
}
