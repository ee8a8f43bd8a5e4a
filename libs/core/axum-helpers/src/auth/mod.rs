//! Authentication and authorization.
//!
//! - [`TokenService`]: stateless HS256 tokens with a fixed two hour lifetime
//! - [`AccessGuard`] + [`access_guard`]: bearer verification and role policy,
//!   applied per route group with `route_layer`
//! - [`AuthUser`]: extractor for the verified caller
//!
//! ```ignore
//! let tokens = Arc::new(TokenService::new(&JwtConfig::from_env()?));
//! let any_user = AccessGuard::new(tokens.clone());
//! let admins = any_user.clone().require(&[Role::Admin]);
//!
//! let router = Router::new()
//!     .route("/profile", get(profile))
//!     .route_layer(middleware::from_fn_with_state(any_user, access_guard));
//! ```

pub mod config;
pub mod jwt;
pub mod middleware;

pub use config::JwtConfig;
pub use jwt::{JwtClaims, Role, TOKEN_TTL_SECS, TokenError, TokenService};
pub use middleware::{AccessGuard, AuthUser, access_guard, bearer_token};
