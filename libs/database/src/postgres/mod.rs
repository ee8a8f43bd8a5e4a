//! PostgreSQL connector, health check and schema bootstrap.

mod config;
mod connector;
mod health;

pub use config::PostgresConfig;
pub use connector::{bootstrap_schema, connect, connect_from_config};
pub use health::check_health;

pub use sea_orm::{DatabaseConnection, DbErr};
