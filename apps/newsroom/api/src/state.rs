//! Application state management.
//!
//! [`AppState`] carries what `main` owns for the process lifetime: the
//! configuration and the PostgreSQL pool. [`Services`] is the set of domain
//! services a router is built from, parameterised by a [`Storage`] backend
//! so the same routes run on Postgres in production and in memory in tests.

use axum_helpers::{AccessGuard, LoginRateLimiter, TokenService};
use database::postgres::DatabaseConnection;
use domain_categories::{
    CategoryRepository, CategoryService, InMemoryCategoryRepository, PgCategoryRepository,
};
use domain_comments::{
    CommentRepository, CommentService, InMemoryCommentRepository, PgCommentRepository,
};
use domain_likes::{InMemoryLikeRepository, LikeRepository, LikeService, PgLikeRepository};
use domain_news::{
    InMemoryNewsRepository, NewsRepository, NewsService, PgNewsRepository, PhotoStore,
};
use domain_reviews::{
    InMemoryReviewRepository, PgReviewRepository, ReviewRepository, ReviewService,
};
use domain_users::{InMemoryUserRepository, PgUserRepository, UserRepository, UserService};
use std::sync::Arc;

use crate::directory::UserDirectory;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded from environment variables
    pub config: crate::config::Config,
    /// PostgreSQL connection pool, injected into every repository
    pub db: DatabaseConnection,
}

/// Picks one repository implementation per domain.
pub trait Storage: Send + Sync + 'static {
    type Users: UserRepository + 'static;
    type News: NewsRepository + 'static;
    type Categories: CategoryRepository + 'static;
    type Comments: CommentRepository + 'static;
    type Likes: LikeRepository + 'static;
    type Reviews: ReviewRepository + 'static;
}

/// Raw SeaORM statements over the shared pool
pub struct Postgres;

impl Storage for Postgres {
    type Users = PgUserRepository;
    type News = PgNewsRepository;
    type Categories = PgCategoryRepository;
    type Comments = PgCommentRepository;
    type Likes = PgLikeRepository;
    type Reviews = PgReviewRepository;
}

/// Process-local maps; nothing survives a restart.
pub struct InMemory;

impl Storage for InMemory {
    type Users = InMemoryUserRepository;
    type News = InMemoryNewsRepository;
    type Categories = InMemoryCategoryRepository;
    type Comments = InMemoryCommentRepository;
    type Likes = InMemoryLikeRepository;
    type Reviews = InMemoryReviewRepository;
}

pub type Reviews<S> =
    ReviewService<<S as Storage>::Reviews, UserDirectory<<S as Storage>::Users>>;

pub struct Services<S: Storage> {
    pub users: UserService<S::Users>,
    pub news: NewsService<S::News>,
    pub categories: CategoryService<S::Categories>,
    pub comments: CommentService<S::Comments>,
    pub likes: LikeService<S::Likes>,
    pub reviews: Reviews<S>,
    pub guard: AccessGuard,
    pub limiter: LoginRateLimiter,
}

impl<S: Storage> Clone for Services<S> {
    fn clone(&self) -> Self {
        Self {
            users: self.users.clone(),
            news: self.news.clone(),
            categories: self.categories.clone(),
            comments: self.comments.clone(),
            likes: self.likes.clone(),
            reviews: self.reviews.clone(),
            guard: self.guard.clone(),
            limiter: self.limiter.clone(),
        }
    }
}

impl<S: Storage> Services<S> {
    #[allow(clippy::too_many_arguments)]
    fn assemble(
        users: S::Users,
        news: S::News,
        categories: S::Categories,
        comments: S::Comments,
        likes: S::Likes,
        reviews: S::Reviews,
        photos: PhotoStore,
        tokens: Arc<TokenService>,
        limiter: LoginRateLimiter,
    ) -> Self {
        let users = UserService::new(users);
        Self {
            reviews: ReviewService::new(reviews, UserDirectory::new(users.clone())),
            users,
            news: NewsService::new(news, photos),
            categories: CategoryService::new(categories),
            comments: CommentService::new(comments),
            likes: LikeService::new(likes),
            guard: AccessGuard::new(tokens),
            limiter,
        }
    }
}

impl Services<Postgres> {
    pub fn postgres(
        db: &DatabaseConnection,
        photos: PhotoStore,
        tokens: Arc<TokenService>,
        limiter: LoginRateLimiter,
    ) -> Self {
        Self::assemble(
            PgUserRepository::new(db.clone()),
            PgNewsRepository::new(db.clone()),
            PgCategoryRepository::new(db.clone()),
            PgCommentRepository::new(db.clone()),
            PgLikeRepository::new(db.clone()),
            PgReviewRepository::new(db.clone()),
            photos,
            tokens,
            limiter,
        )
    }
}

impl Services<InMemory> {
    pub fn in_memory(photos: PhotoStore, tokens: Arc<TokenService>) -> Self {
        Self::assemble(
            InMemoryUserRepository::new(),
            InMemoryNewsRepository::new(),
            InMemoryCategoryRepository::new(),
            InMemoryCommentRepository::new(),
            InMemoryLikeRepository::new(),
            InMemoryReviewRepository::new(),
            photos,
            tokens,
            LoginRateLimiter::default(),
        )
    }
}
