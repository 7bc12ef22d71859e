//! Rate limiting middleware using token bucket algorithm.

use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use std::sync::Arc;
use tower_governor::{
    GovernorLayer,
    governor::GovernorConfigBuilder,
    key_extractor::{KeyExtractor, PeerIpKeyExtractor, SmartIpKeyExtractor},
};

/// Token bucket quota applied per client IP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimit {
    /// Seconds after which one more request is allowed.
    pub period_secs: u64,
    /// Requests a client may send before being throttled.
    pub burst: u32,
}

impl RateLimit {
    /// Returns `None` if either value is 0, which disables limiting.
    pub fn new(period_secs: u64, burst: u32) -> Option<Self> {
        (period_secs > 0 && burst > 0).then_some(Self { period_secs, burst })
    }
}

pub type PeerIpGovernorLayer =
    GovernorLayer<PeerIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

pub type ProxyGovernorLayer =
    GovernorLayer<SmartIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Creates a rate limiter keyed by the socket peer address.
///
/// Requests exceeding the limit receive `429 Too Many Requests`.
/// The server must be started with `into_make_service_with_connect_info`.
///
/// # Example
///
/// ```rust,ignore
/// let limit = RateLimit::new(2, 20).unwrap();
/// let route = post(submit_handler).layer(rate_limit::layer(limit).unwrap());
/// ```
pub fn layer(limit: RateLimit) -> Option<PeerIpGovernorLayer> {
    build(limit, PeerIpKeyExtractor)
}

/// Creates a rate limiter keyed by `X-Forwarded-For` / `X-Real-IP` / `Forwarded`,
/// falling back to the peer address.
///
/// Use only behind a trusted reverse proxy; clients can forge these headers.
pub fn proxy_layer(limit: RateLimit) -> Option<ProxyGovernorLayer> {
    build(limit, SmartIpKeyExtractor)
}

fn build<K>(
    limit: RateLimit,
    key_extractor: K,
) -> Option<GovernorLayer<K, NoOpMiddleware<QuantaInstant>, axum::body::Body>>
where
    K: KeyExtractor,
{
    let governor_conf = GovernorConfigBuilder::default()
        .per_second(limit.period_secs)
        .burst_size(limit.burst)
        .key_extractor(key_extractor)
        .finish()?;

    Some(GovernorLayer::new(Arc::new(governor_conf)))
}
