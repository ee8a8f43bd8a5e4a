//! News Domain
//!
//! Articles created by administrators (with an uploaded photo) or synced
//! from an external feed. Synced articles use their source URL as id, so
//! their ids must be percent-encoded in paths.
//!
//! ```text
//! handlers ──► NewsService ──► NewsRepository (in-memory | Postgres)
//!                   │
//!                   └────────► PhotoStore (UPLOAD_DIR on disk)
//! ```

pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;
pub mod storage;

pub use error::{NewsError, NewsResult};
pub use models::{
    Article, ArticleFields, ArticleForm, ArticleRef, ArticleSummary, CategoryCount, PhotoUpload,
    SyncArticle,
};
pub use postgres::PgNewsRepository;
pub use repository::{InMemoryNewsRepository, NewsRepository};
pub use service::NewsService;
pub use storage::{PhotoStore, UploadConfig};
