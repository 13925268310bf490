//! Rate limiting middleware using governor and `tower_governor`.
//!
//! Signup and login hash passwords, which is deliberately expensive, so the
//! auth endpoints get a strict per-IP limit (~10/minute).

use std::sync::Arc;

use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::SmartIpKeyExtractor,
};

/// Rate limiter layer type for Axum.
///
/// `SmartIpKeyExtractor` reads the client IP from standard proxy headers
/// and falls back to the peer address, so the server must be built with
/// `into_make_service_with_connect_info`.
pub type RateLimiterLayer =
    GovernorLayer<SmartIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Create rate limiter for auth endpoints: ~60 requests per minute per IP.
///
/// Configuration: 1 request per second (replenish), burst of 30. Loose
/// enough for a front-end dev session, far too slow for online password
/// guessing against Argon2-hashed credentials.
///
/// # Panics
///
/// This function will not panic. The configuration uses only valid positive
/// integers (`per_second(1)` and `burst_size(30)`), which are always accepted
/// by `GovernorConfigBuilder`.
#[must_use]
pub fn auth_rate_limiter() -> RateLimiterLayer {
    let config = GovernorConfigBuilder::default()
        .key_extractor(SmartIpKeyExtractor)
        .per_second(1) // Replenish 1 token every second
        .burst_size(30) // Allow burst of 30 requests
        .finish()
        .expect("rate limiter config with per_second(1) and burst_size(30) is valid");
    GovernorLayer::new(Arc::new(config))
}
