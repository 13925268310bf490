//! HTTP route handlers for the API.
//!
//! # Route Structure
//!
//! ```text
//! GET  /api/health               - Liveness check
//! GET  /api/health/ready         - Readiness check (verifies database)
//!
//! # Auth
//! POST /api/auth/signup          - Register, returns {token, user}
//! POST /api/auth/login           - Login, returns {token, user}
//! GET  /api/auth/me              - Authenticated user's own view
//!
//! # Projects
//! GET    /api/projects           - Active campaigns, newest first
//! GET    /api/projects/{id}      - Campaign detail
//! POST   /api/projects           - Create campaign (bearer token)
//! PUT    /api/projects/{id}      - Update campaign (bearer token, founder only)
//! DELETE /api/projects/{id}      - Delete campaign (bearer token, founder only)
//! POST   /api/projects/{id}/fund - Contribute to a campaign (bearer token)
//! ```

pub mod auth;
pub mod projects;

use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware;
use crate::state::AppState;

/// Create the auth routes router.
///
/// Auth endpoints hash passwords, so they carry the strict rate limiter.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login))
        .route("/me", get(auth::me))
        .layer(middleware::auth_rate_limiter())
}

/// Create the project routes router.
pub fn project_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(projects::list).post(projects::create))
        .route(
            "/{id}",
            get(projects::get_one)
                .put(projects::update)
                .delete(projects::remove),
        )
        .route("/{id}/fund", post(projects::fund))
}

/// Create all routes for the API.
pub fn routes() -> Router<AppState> {
    Router::new()
        .nest("/api/auth", auth_routes())
        .nest("/api/projects", project_routes())
}
