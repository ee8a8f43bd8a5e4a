//! Database library: PostgreSQL pool management and the shared pagination helper.
//!
//! ```ignore
//! use core_config::FromEnv;
//! use database::postgres::{self, PostgresConfig};
//!
//! let db = postgres::connect_from_config(PostgresConfig::from_env()?).await?;
//! postgres::bootstrap_schema(&db, &[domain_users::postgres::SCHEMA]).await?;
//! ```

pub mod error;
pub mod pagination;
pub mod postgres;
pub mod stats;

pub use error::{DatabaseError, DatabaseResult, is_unique_violation};
pub use pagination::{PageParams, PageRequest, PageResult, PagedQuery, SortOrder};
pub use stats::DailyCount;
