//! # Axum Helpers
//!
//! Shared building blocks for the newsroom HTTP services.
//!
//! ## Modules
//!
//! - **[`auth`]**: JWT issuance/verification and the role-based access guard
//! - **[`rate_limit`]**: sliding-window login throttling
//! - **[`server`]**: router setup, health checks, graceful shutdown
//! - **[`http`]**: CORS and security headers
//! - **[`errors`]**: the `{message, details?}` error envelope
//! - **[`extractors`]**: validated JSON and UUID path extractors
//! - **[`responses`]**: `{message}` acknowledgement bodies
//!
//! ## Quick Start
//!
//! ```ignore
//! use axum_helpers::{AccessGuard, JwtConfig, Role, TokenService};
//!
//! let tokens = Arc::new(TokenService::new(&JwtConfig::from_env()?));
//! let admin = AccessGuard::new(tokens.clone()).require(&[Role::Admin]);
//!
//! let api = Router::new()
//!     .route("/stats", get(stats))
//!     .route_layer(axum::middleware::from_fn_with_state(admin, access_guard));
//!
//! let router = create_router(api)?;
//! ```

pub mod auth;
pub mod errors;
pub mod extractors;
pub mod http;
pub mod rate_limit;
pub mod responses;
pub mod server;

pub use auth::{
    AccessGuard, AuthUser, JwtClaims, JwtConfig, Role, TOKEN_TTL_SECS, TokenError, TokenService,
    access_guard,
};

pub use server::{
    HealthCheckFuture, HealthResponse, ShutdownCoordinator, create_production_app, create_router,
    health_router, run_health_checks, shutdown_signal,
};

pub use http::{create_cors_layer, security_headers};

pub use errors::{AppError, ErrorResponse};

pub use extractors::{UuidPath, ValidatedJson};

pub use rate_limit::{LoginRateLimiter, RateLimitConfig, client_key, login_rate_limit};

pub use responses::{CreatedResponse, MessageResponse};
