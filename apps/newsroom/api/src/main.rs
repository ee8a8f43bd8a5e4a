use axum_helpers::{LoginRateLimiter, TokenService};
use axum_helpers::server::{create_production_app, health_router};
use core_config::tracing::{init_tracing, install_color_eyre};
use domain_news::PhotoStore;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use newsroom_api::api;
use newsroom_api::config::Config;
use newsroom_api::state::{AppState, Services};

/// Table creation order follows the foreign keys.
const SCHEMAS: &[&str] = &[
    domain_users::postgres::SCHEMA,
    domain_news::postgres::SCHEMA,
    domain_categories::postgres::SCHEMA,
    domain_comments::postgres::SCHEMA,
    domain_likes::postgres::SCHEMA,
    domain_reviews::postgres::SCHEMA,
];

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // Install color-eyre first for colored error output (before any fallible operations)
    install_color_eyre();

    // A missing .env file is fine
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    init_tracing(&config.environment);

    let db = database::postgres::connect_from_config(config.database.clone())
        .await
        .map_err(|e| eyre::eyre!("PostgreSQL connection failed: {}", e))?;
    database::postgres::bootstrap_schema(&db, SCHEMAS)
        .await
        .map_err(|e| eyre::eyre!("Schema bootstrap failed: {}", e))?;

    let tokens = Arc::new(TokenService::new(&config.jwt));
    let limiter = LoginRateLimiter::from_config(&config.rate_limit);
    let services = Services::postgres(&db, PhotoStore::new(&config.uploads), tokens, limiter);

    if let Some(admin) = &config.admin {
        let created = services
            .users
            .seed_admin(&admin.username, &admin.password)
            .await
            .map_err(|e| eyre::eyre!("Admin seeding failed: {}", e))?;
        if created {
            info!(username = %admin.username, "Seeded administrator account");
        }
    }

    let state = AppState { config, db };

    // Merge health endpoints into the app
    // - /health: liveness check with app name/version
    // - /ready: readiness check against the database
    let app = api::app(&services, &state.config.uploads.dir)?
        .merge(health_router(state.config.app))
        .merge(api::ready_router(state.clone()));

    info!("Starting newsroom API with graceful shutdown (30s timeout)");

    let server = state.config.server.clone();
    create_production_app(
        app,
        &server,
        Duration::from_secs(30),
        async move {
            info!("Shutting down: closing database connections");
            match state.db.close().await {
                Ok(_) => info!("PostgreSQL connection closed successfully"),
                Err(e) => tracing::error!("Error closing PostgreSQL: {}", e),
            }
        },
    )
    .await
    .map_err(|e| eyre::eyre!("Server error: {}", e))?;

    info!("Newsroom API shutdown complete");
    Ok(())
}
