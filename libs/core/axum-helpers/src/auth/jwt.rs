use super::config::JwtConfig;
use chrono::Utc;
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Token lifetime: two hours, no refresh.
pub const TOKEN_TTL_SECS: i64 = 7200;

/// Identity role carried in every token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            _ => Err(format!("Invalid role: {s}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtClaims {
    /// Identity id
    pub sub: Uuid,
    pub username: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

impl JwtClaims {
    pub fn user_id(&self) -> Uuid {
        self.sub
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TokenError {
    /// Bad signature, malformed payload or expired. Callers never learn which.
    #[error("Invalid token")]
    InvalidToken,

    #[error("Failed to sign token: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

/// Issues and verifies HS256 tokens.
///
/// Expiry is checked here rather than by `jsonwebtoken` so the boundary is
/// exact: a token is valid up to and including `iat + TOKEN_TTL_SECS`.
#[derive(Clone)]
pub struct TokenService {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
}

impl TokenService {
    pub fn new(config: &JwtConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.set_required_spec_claims(&["exp", "sub"]);

        tracing::info!(ttl_secs = TOKEN_TTL_SECS, "Token service initialized");

        Self {
            encoding: EncodingKey::from_secret(config.secret.as_bytes()),
            decoding: DecodingKey::from_secret(config.secret.as_bytes()),
            validation,
        }
    }

    pub fn issue(&self, subject: Uuid, username: &str, role: Role) -> Result<String, TokenError> {
        self.issue_at(subject, username, role, Utc::now().timestamp())
    }

    /// Same as [`issue`](Self::issue) with an explicit `iat` (unix seconds).
    pub fn issue_at(
        &self,
        subject: Uuid,
        username: &str,
        role: Role,
        issued_at: i64,
    ) -> Result<String, TokenError> {
        let claims = JwtClaims {
            sub: subject,
            username: username.to_string(),
            role,
            iat: issued_at,
            exp: issued_at + TOKEN_TTL_SECS,
        };

        Ok(encode(&Header::new(Algorithm::HS256), &claims, &self.encoding)?)
    }

    pub fn verify(&self, token: &str) -> Result<JwtClaims, TokenError> {
        self.verify_at(token, Utc::now().timestamp())
    }

    /// Same as [`verify`](Self::verify) against an explicit clock (unix seconds).
    pub fn verify_at(&self, token: &str, now: i64) -> Result<JwtClaims, TokenError> {
        let claims = decode::<JwtClaims>(token, &self.decoding, &self.validation)
            .map_err(|e| {
                tracing::debug!(error = %e, "Token rejected");
                TokenError::InvalidToken
            })?
            .claims;

        if now > claims.exp {
            tracing::debug!(exp = claims.exp, now, "Token expired");
            return Err(TokenError::InvalidToken);
        }

        Ok(claims)
    }
}
