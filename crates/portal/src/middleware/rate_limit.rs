//! Rate limiting middleware using governor and `tower_governor`.
//!
//! Credential endpoints (login, password reset) are limited to ~10 requests
//! per minute per client IP. The client IP is the connection's peer address
//! unless `TRUST_PROXY_HEADERS` is set, in which case the reverse-proxy
//! headers are read first.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::extract::ConnectInfo;
use axum::http::{HeaderMap, Request};
use governor::clock::QuantaInstant;
use governor::middleware::NoOpMiddleware;
use tower_governor::{GovernorError, GovernorLayer, governor::GovernorConfigBuilder};

// =============================================================================
// Client IP Key Extractor
// =============================================================================

/// Key extractor keyed on the client IP.
///
/// `X-Forwarded-For` and `X-Real-IP` are only read when the portal sits
/// behind a proxy that overwrites them. Otherwise any client could pick its
/// own key.
#[derive(Clone, Copy)]
pub struct ClientIpKeyExtractor {
    trust_proxy_headers: bool,
}

impl ClientIpKeyExtractor {
    /// Create an extractor, reading proxy headers only if `trust_proxy_headers`.
    #[must_use]
    pub const fn new(trust_proxy_headers: bool) -> Self {
        Self {
            trust_proxy_headers,
        }
    }
}

impl tower_governor::key_extractor::KeyExtractor for ClientIpKeyExtractor {
    type Key = IpAddr;

    fn extract<T>(&self, req: &Request<T>) -> Result<Self::Key, GovernorError> {
        if self.trust_proxy_headers
            && let Some(ip) = forwarded_ip(req.headers())
        {
            return Ok(ip);
        }

        // Direct connection (requires `into_make_service_with_connect_info`)
        req.extensions()
            .get::<ConnectInfo<SocketAddr>>()
            .map(|ConnectInfo(addr)| addr.ip())
            .ok_or(GovernorError::UnableToExtractKey)
    }
}

/// Client IP reported by a reverse proxy.
fn forwarded_ip(headers: &HeaderMap) -> Option<IpAddr> {
    // X-Forwarded-For (first IP in the chain)
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .and_then(|s| s.trim().parse::<IpAddr>().ok())
        .or_else(|| {
            headers
                .get("x-real-ip")
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.trim().parse::<IpAddr>().ok())
        })
}

// =============================================================================
// Rate Limiter Configuration
// =============================================================================

/// Rate limiter layer type for Axum.
pub type RateLimiterLayer =
    GovernorLayer<ClientIpKeyExtractor, NoOpMiddleware<QuantaInstant>, axum::body::Body>;

/// Create rate limiter for credential endpoints: ~10 requests per minute per IP.
///
/// Configuration: 1 request every 6 seconds (replenish), burst of 5.
/// `trust_proxy_headers` selects how the client IP is found, see
/// [`ClientIpKeyExtractor`].
///
/// # Panics
///
/// This function will not panic. The configuration uses only valid positive
/// integers (`per_second(6)` and `burst_size(5)`), which are always accepted
/// by `GovernorConfigBuilder`.
#[must_use]
pub fn auth_rate_limiter(trust_proxy_headers: bool) -> RateLimiterLayer {
    let config = GovernorConfigBuilder::default()
        .key_extractor(ClientIpKeyExtractor::new(trust_proxy_headers))
        .per_second(6) // Replenish 1 token every 6 seconds (~10/minute)
        .burst_size(5) // Allow burst of 5 requests
        .finish()
        .expect("rate limiter config with per_second(6) and burst_size(5) is valid");
    GovernorLayer::new(Arc::new(config))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use tower_governor::key_extractor::KeyExtractor;

    use super::*;

    fn request() -> axum::http::request::Builder {
        Request::builder().uri("/login")
    }

    fn with_peer<T>(mut req: Request<T>, peer: &str) -> Request<T> {
        req.extensions_mut()
            .insert(ConnectInfo(peer.parse::<SocketAddr>().unwrap()));
        req
    }

    fn ip(s: &str) -> IpAddr {
        s.parse().unwrap()
    }

    #[test]
    fn test_forwarded_for_takes_first_hop_behind_proxy() {
        let req = request()
            .header("x-forwarded-for", "203.0.113.7, 10.0.0.1")
            .body(())
            .unwrap();
        let req = with_peer(req, "10.0.0.1:5555");
        assert_eq!(
            ClientIpKeyExtractor::new(true).extract(&req).unwrap(),
            ip("203.0.113.7")
        );
    }

    #[test]
    fn test_real_ip_behind_proxy() {
        let req = request().header("x-real-ip", "203.0.113.9").body(()).unwrap();
        let req = with_peer(req, "10.0.0.1:5555");
        assert_eq!(
            ClientIpKeyExtractor::new(true).extract(&req).unwrap(),
            ip("203.0.113.9")
        );
    }

    #[test]
    fn test_spoofed_headers_do_not_override_peer() {
        let req = request()
            .header("x-forwarded-for", "203.0.113.7")
            .header("x-real-ip", "203.0.113.9")
            .body(())
            .unwrap();
        let req = with_peer(req, "192.0.2.1:5555");
        assert_eq!(
            ClientIpKeyExtractor::new(false).extract(&req).unwrap(),
            ip("192.0.2.1")
        );
    }

    #[test]
    fn test_falls_back_to_peer_address() {
        let req = with_peer(request().body(()).unwrap(), "192.0.2.1:5555");
        for trust in [true, false] {
            assert_eq!(
                ClientIpKeyExtractor::new(trust).extract(&req).unwrap(),
                ip("192.0.2.1")
            );
        }
    }

    #[test]
    fn test_no_address_is_an_error() {
        let req = request()
            .header("x-forwarded-for", "203.0.113.7")
            .body(())
            .unwrap();
        assert!(ClientIpKeyExtractor::new(false).extract(&req).is_err());
        let bare = request().body(()).unwrap();
        assert!(ClientIpKeyExtractor::new(true).extract(&bare).is_err());
    }
}
