//! Authentication extractor.
//!
//! Route handlers that mutate state take an [`AuthUser`] argument; the
//! extractor reads the `Authorization: Bearer` header and verifies the
//! token, so an unauthenticated request never reaches the handler body.

use axum::{
    extract::FromRequestParts,
    http::{header, request::Parts},
};

use crowdlocal_core::UserId;

use crate::error::ApiError;
use crate::state::AppState;

/// Extractor that requires a valid bearer token.
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     AuthUser(user_id): AuthUser,
/// ) -> impl IntoResponse {
///     format!("acting as {user_id}")
/// }
/// ```
pub struct AuthUser(pub UserId);

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = bearer_token(parts)
            .ok_or_else(|| ApiError::Auth("Missing bearer token".to_owned()))?;

        let user_id = state.tokens().verify(token)?;

        Ok(Self(user_id))
    }
}

/// Pull the token out of `Authorization: Bearer <token>`.
fn bearer_token(parts: &Parts) -> Option<&str> {
    parts
        .headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
}
