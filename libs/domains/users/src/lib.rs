//! Users Domain
//!
//! Accounts for both readers and administrators. One identity table carries
//! a role discriminant; login is a single lookup by username.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  ← /api/auth endpoints, route-group role policy
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Service   │  ← Username/password rules, Argon2 hashing
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │ Repository  │  ← Trait + in-memory and Postgres implementations
//! └──────┬──────┘
//!        │
//! ┌──────▼──────┐
//! │   Models    │  ← Entities, DTOs
//! └─────────────┘
//! ```
//!
//! # Usage
//!
//! ```rust,ignore
//! use axum_helpers::{AccessGuard, LoginRateLimiter};
//! use domain_users::{InMemoryUserRepository, UserService, handlers};
//!
//! let service = UserService::new(InMemoryUserRepository::new());
//! let router = handlers::router(service, AccessGuard::new(tokens), LoginRateLimiter::default());
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{UserError, UserResult};
pub use models::{
    ChangePassword, LoginRequest, LoginResponse, ProfileResponse, RecentUser, RegisterUser,
    UpdateProfile, User, UserSummary,
};
pub use postgres::PgUserRepository;
pub use repository::{InMemoryUserRepository, UserRepository};
pub use service::UserService;
