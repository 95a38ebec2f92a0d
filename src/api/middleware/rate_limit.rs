//! Rate limiting middleware using token bucket algorithm.

use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer, governor::GovernorConfigBuilder, key_extractor::PeerIpKeyExtractor,
};

type PeerIpGovernorLayer =
    GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Creates a rate limiter for the public sign-in routes.
///
/// # Limits
///
/// - **Rate**: 2 requests per second
/// - **Burst**: 100 requests
///
/// Requests exceeding the limit receive `429 Too Many Requests`.
///
/// # Key Extraction
///
/// Rate limits are applied per client IP address extracted from the
/// socket peer address, so the server must be started with connect info.
pub fn layer() -> PeerIpGovernorLayer {
    let governor_conf = GovernorConfigBuilder::default()
        .per_second(2)
        .burst_size(100)
        .finish()
        .unwrap_or_default();

    GovernorLayer::new(Arc::new(governor_conf))
}

/// Creates a stricter rate limiter for session-protected routes.
///
/// Covers the board pages, toggles and the JSON API, which all reach the
/// controller.
///
/// # Limits
///
/// - **Rate**: 1 request per second
/// - **Burst**: 10 requests
pub fn secure_layer() -> PeerIpGovernorLayer {
    let governor_conf = GovernorConfigBuilder::default()
        .per_second(1)
        .burst_size(10)
        .finish()
        .unwrap_or_default();

    GovernorLayer::new(Arc::new(governor_conf))
}
