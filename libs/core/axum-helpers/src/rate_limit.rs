//! Sliding-window throttling for the login endpoint.
//!
//! Every attempt is recorded per client key, regardless of outcome. An
//! attempt is admitted when fewer than `max_attempts` are recorded within the
//! trailing window; rejected attempts are not recorded.
//!
//! The key is the peer socket address. Forwarding headers are only read
//! when `TRUST_PROXY=true`, i.e. when the service sits behind a proxy that
//! overwrites them.

use crate::errors::AppError;
use axum::{
    extract::{ConnectInfo, Request, State},
    http::HeaderMap,
    middleware::Next,
    response::{IntoResponse, Response},
};
use core_config::{ConfigError, FromEnv, env_parse_or_default};
use std::collections::{HashMap, VecDeque};
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;

pub const LOGIN_MAX_ATTEMPTS: usize = 5;
pub const LOGIN_WINDOW: Duration = Duration::from_secs(5 * 60);
pub const RATE_LIMITED_MESSAGE: &str = "Too many login attempts, please try again later.";

/// Loaded from `TRUST_PROXY` (default `false`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub trust_proxy: bool,
}

impl FromEnv for RateLimitConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            trust_proxy: env_parse_or_default("TRUST_PROXY", false)?,
        })
    }
}

#[derive(Clone)]
pub struct LoginRateLimiter {
    attempts: Arc<Mutex<HashMap<String, VecDeque<Instant>>>>,
    max_attempts: usize,
    window: Duration,
    trust_proxy: bool,
}

impl LoginRateLimiter {
    pub fn new(max_attempts: usize, window: Duration) -> Self {
        Self {
            attempts: Arc::new(Mutex::new(HashMap::new())),
            max_attempts,
            window,
            trust_proxy: false,
        }
    }

    /// Default limits with the proxy policy from `config`.
    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self {
            trust_proxy: config.trust_proxy,
            ..Self::default()
        }
    }

    /// Returns `true` if the attempt is admitted (and records it).
    pub async fn check(&self, key: &str) -> bool {
        self.check_at(key, Instant::now()).await
    }

    /// Clients with no attempt inside the window are dropped on every check.
    pub async fn check_at(&self, key: &str, now: Instant) -> bool {
        let mut attempts = self.attempts.lock().await;
        let window = self.window;

        attempts.retain(|_, log| {
            while log
                .front()
                .is_some_and(|t| now.saturating_duration_since(*t) >= window)
            {
                log.pop_front();
            }
            !log.is_empty()
        });

        let log = attempts.entry(key.to_string()).or_default();
        if log.len() >= self.max_attempts {
            return false;
        }

        log.push_back(now);
        true
    }

    /// Number of tracked client keys.
    pub async fn tracked_clients(&self) -> usize {
        self.attempts.lock().await.len()
    }
}

impl Default for LoginRateLimiter {
    fn default() -> Self {
        Self::new(LOGIN_MAX_ATTEMPTS, LOGIN_WINDOW)
    }
}

/// The peer address, or with `trust_proxy` the first `X-Forwarded-For`
/// hop, then `X-Real-IP`, then the peer address.
pub fn client_key(headers: &HeaderMap, peer: Option<SocketAddr>, trust_proxy: bool) -> String {
    let header = |name: &str| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|v| !v.is_empty())
    };

    let forwarded = trust_proxy
        .then(|| {
            header("x-forwarded-for")
                .and_then(|v| v.split(',').next())
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .or_else(|| header("x-real-ip"))
        })
        .flatten();

    forwarded
        .map(str::to_string)
        .or_else(|| peer.map(|addr| addr.ip().to_string()))
        .unwrap_or_else(|| "unknown".to_string())
}

pub async fn login_rate_limit(
    State(limiter): State<LoginRateLimiter>,
    request: Request,
    next: Next,
) -> Response {
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| *addr);
    let key = client_key(request.headers(), peer, limiter.trust_proxy);

    if !limiter.check(&key).await {
        tracing::warn!(client = %key, "Login rate limit exceeded");
        return AppError::TooManyRequests(RATE_LIMITED_MESSAGE.to_string()).into_response();
    }

    next.run(request).await
}
