//! Server infrastructure: router setup, health endpoints, graceful shutdown.
//!
//! ```ignore
//! let app = create_router(api_routes)?.merge(health_router(app_info!()));
//! create_production_app(app, &ServerConfig::from_env()?, Duration::from_secs(30), async move {
//!     db.close().await.ok();
//! })
//! .await?;
//! ```

pub mod app;
pub mod health;
pub mod shutdown;

pub use app::{create_production_app, create_router};
pub use health::{HealthCheckFuture, HealthResponse, health_router, run_health_checks};
pub use shutdown::{ShutdownCoordinator, shutdown_signal};
