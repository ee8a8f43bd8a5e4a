use core_config::{AppInfo, FromEnv, app_info, env_optional, server::ServerConfig};

use axum_helpers::{JwtConfig, RateLimitConfig};
use database::postgres::PostgresConfig;
use domain_news::UploadConfig;

pub use core_config::Environment;

/// Credentials of the administrator created at startup when absent.
#[derive(Clone)]
pub struct AdminSeed {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for AdminSeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminSeed")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

impl AdminSeed {
    /// Both `ADMIN_USERNAME` and `ADMIN_PASSWORD` must be set.
    pub fn from_env() -> Option<Self> {
        Some(Self {
            username: env_optional("ADMIN_USERNAME")?,
            password: env_optional("ADMIN_PASSWORD")?,
        })
    }
}

/// Application-specific configuration
#[derive(Clone, Debug)]
pub struct Config {
    pub app: AppInfo,
    pub database: PostgresConfig,
    pub server: ServerConfig,
    pub jwt: JwtConfig,
    pub uploads: UploadConfig,
    pub rate_limit: RateLimitConfig,
    pub admin: Option<AdminSeed>,
    pub environment: Environment,
}

impl Config {
    pub fn from_env() -> eyre::Result<Self> {
        let environment = Environment::from_env();
        let database = PostgresConfig::from_env()?; // DATABASE_URL is required
        let server = ServerConfig::from_env()?;
        let jwt = JwtConfig::from_env()?; // JWT_SECRET is required
        let uploads = UploadConfig::from_env()?;
        let rate_limit = RateLimitConfig::from_env()?; // TRUST_PROXY

        Ok(Self {
            app: app_info!(),
            database,
            server,
            jwt,
            uploads,
            rate_limit,
            admin: AdminSeed::from_env(),
            environment,
        })
    }
}
