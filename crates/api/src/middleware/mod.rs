//! HTTP middleware for the API.
//!
//! - Bearer-token authentication extractor
//! - Rate limiting for the auth endpoints

pub mod auth;
pub mod rate_limit;

pub use auth::AuthUser;
pub use rate_limit::auth_rate_limiter;
