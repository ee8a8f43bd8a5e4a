//! Categories Domain
//!
//! Named article categories managed by administrators. The public listing
//! exposes names only.

pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{CategoryError, CategoryResult};
pub use models::{Category, CategoryList, CategoryName, CreateOutcome};
pub use postgres::PgCategoryRepository;
pub use repository::{CategoryRepository, InMemoryCategoryRepository};
pub use service::CategoryService;
