//! Secret behind every newsroom token.
//!
//! `/api/auth/login` signs with it and every [`AccessGuard`](super::AccessGuard)
//! verifies with it, so all route groups of one process share a single
//! `JwtConfig`. Rotating `JWT_SECRET` invalidates every outstanding token.

use core_config::{ConfigError, FromEnv, env_required};

pub const MIN_SECRET_LEN: usize = 32;

#[derive(Clone)]
pub struct JwtConfig {
    pub secret: String,
}

impl std::fmt::Debug for JwtConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtConfig").field("secret", &"<redacted>").finish()
    }
}

impl JwtConfig {
    /// # Panics
    /// Panics if the secret is shorter than [`MIN_SECRET_LEN`] bytes.
    pub fn new(secret: impl Into<String>) -> Self {
        let secret = secret.into();
        assert!(secret.len() >= MIN_SECRET_LEN, "{}", too_short(secret.len()));
        Self { secret }
    }
}

fn too_short(len: usize) -> String {
    format!("JWT_SECRET needs at least {MIN_SECRET_LEN} bytes, got {len}")
}

impl FromEnv for JwtConfig {
    /// `JWT_SECRET` is required; there is no development fallback.
    fn from_env() -> Result<Self, ConfigError> {
        let secret = env_required("JWT_SECRET")?;
        if secret.len() < MIN_SECRET_LEN {
            return Err(ConfigError::ParseError {
                key: "JWT_SECRET".to_string(),
                details: too_short(secret.len()),
            });
        }
        Ok(Self { secret })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NEWSROOM_SECRET: &str = "newsroom-signing-secret-0123456789";

    #[test]
    #[should_panic(expected = "JWT_SECRET needs at least 32 bytes, got 6")]
    fn test_short_secret_panics_in_constructor() {
        JwtConfig::new("abcdef");
    }

    #[test]
    fn test_secret_from_env() {
        temp_env::with_var("JWT_SECRET", Some(NEWSROOM_SECRET), || {
            assert_eq!(JwtConfig::from_env().unwrap().secret, NEWSROOM_SECRET);
        });
        temp_env::with_var_unset("JWT_SECRET", || {
            let err = JwtConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("JWT_SECRET"));
        });
        temp_env::with_var("JWT_SECRET", Some("too-short"), || {
            let err = JwtConfig::from_env().unwrap_err();
            assert!(err.to_string().contains("got 9"));
        });
    }

    #[test]
    fn test_debug_redacts_secret() {
        let rendered = format!("{:?}", JwtConfig::new(NEWSROOM_SECRET));
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains("signing-secret"));
    }
}
