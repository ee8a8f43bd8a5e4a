//! Likes Domain
//!
//! One like or dislike per user and article. Casting a vote again replaces
//! the previous one.

pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{LikeError, LikeResult};
pub use models::{CastVote, LikedArticle, RemoveVote, TopLiked, Vote, VoteQuery, VoteSummary};
pub use postgres::PgLikeRepository;
pub use repository::{InMemoryLikeRepository, LikeRepository};
pub use service::LikeService;
