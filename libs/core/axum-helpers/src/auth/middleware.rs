use super::jwt::{JwtClaims, Role, TokenService};
use crate::errors::AppError;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{HeaderMap, header, request::Parts},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;

pub const MISSING_TOKEN: &str = "Token not found or invalid format";
pub const INVALID_TOKEN: &str = "Invalid token";
pub const ACCESS_DENIED: &str = "Access denied";

/// `Authorization: Bearer <token>`; `None` when absent, malformed or empty.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

/// Token verification plus the role set a route group requires.
///
/// An empty role set admits any verified caller.
#[derive(Clone)]
pub struct AccessGuard {
    tokens: Arc<TokenService>,
    roles: Arc<[Role]>,
}

impl AccessGuard {
    pub fn new(tokens: Arc<TokenService>) -> Self {
        Self {
            tokens,
            roles: Arc::from([]),
        }
    }

    pub fn require(mut self, roles: &[Role]) -> Self {
        self.roles = Arc::from(roles);
        self
    }

    pub fn tokens(&self) -> &Arc<TokenService> {
        &self.tokens
    }

    pub fn authorize(&self, headers: &HeaderMap) -> Result<JwtClaims, AppError> {
        let token = bearer_token(headers).ok_or_else(|| {
            tracing::debug!("Missing or malformed Authorization header");
            AppError::Unauthorized(MISSING_TOKEN.to_string())
        })?;

        let claims = self
            .tokens
            .verify(token)
            .map_err(|_| AppError::Forbidden(INVALID_TOKEN.to_string()))?;

        if !self.roles.is_empty() && !self.roles.contains(&claims.role) {
            tracing::debug!(user_id = %claims.sub, role = %claims.role, "Role not permitted");
            return Err(AppError::Forbidden(ACCESS_DENIED.to_string()));
        }

        Ok(claims)
    }
}

/// Middleware for `axum::middleware::from_fn_with_state(guard, access_guard)`.
///
/// On success the verified [`JwtClaims`] are inserted into the request
/// extensions for [`AuthUser`].
pub async fn access_guard(
    State(guard): State<AccessGuard>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = guard.authorize(request.headers())?;
    request.extensions_mut().insert(claims);
    Ok(next.run(request).await)
}

/// The verified caller. Only usable behind [`access_guard`].
#[derive(Debug, Clone)]
pub struct AuthUser(pub JwtClaims);

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<JwtClaims>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| AppError::Unauthorized(MISSING_TOKEN.to_string()))
    }
}
