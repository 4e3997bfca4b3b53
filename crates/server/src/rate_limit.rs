use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::{ConnectInfo, Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use dashmap::DashMap;
use tracing::warn;

use configs::RateLimitConfig;

#[derive(Debug)]
struct Window {
    started: Instant,
    count: u64,
}

/// Fixed-window request limiter keyed by client IP: at most `max_requests`
/// per client per `window`.
#[derive(Clone)]
pub struct RateLimiter {
    windows: Arc<DashMap<IpAddr, Window>>,
    window: Duration,
    max_requests: u64,
    enabled: bool,
}

impl RateLimiter {
    pub fn new(cfg: &RateLimitConfig) -> Self {
        Self {
            windows: Arc::new(DashMap::new()),
            window: Duration::from_secs(cfg.window_secs),
            max_requests: cfg.max_requests,
            enabled: cfg.enabled,
        }
    }

    /// Count one request against `client`'s current window.
    pub fn try_acquire(&self, client: IpAddr) -> bool {
        if !self.enabled {
            return true;
        }
        let now = Instant::now();
        let mut entry = self
            .windows
            .entry(client)
            .or_insert_with(|| Window { started: now, count: 0 });
        if now.duration_since(entry.started) >= self.window {
            entry.started = now;
            entry.count = 0;
        }
        if entry.count < self.max_requests {
            entry.count += 1;
            true
        } else {
            false
        }
    }
}

/// Middleware: reject clients that exhausted their window budget with 429.
pub async fn enforce(
    State(limiter): State<RateLimiter>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    req: Request,
    next: Next,
) -> Response {
    if limiter.try_acquire(addr.ip()) {
        next.run(req).await
    } else {
        warn!(client = %addr.ip(), "rate limit exceeded");
        let body = Json(serde_json::json!({
            "status": "fail",
            "message": "too many requests, retry later",
        }));
        (StatusCode::TOO_MANY_REQUESTS, body).into_response()
    }
}
