//! Comments Domain
//!
//! Reader comments attached to articles. Only the author may delete a
//! comment; a delete by anyone else looks exactly like a missing comment.

pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{CommentError, CommentResult};
pub use models::{Comment, CommentsQuery, NewComment, RecentComment, UserComment};
pub use postgres::PgCommentRepository;
pub use repository::{CommentRepository, InMemoryCommentRepository};
pub use service::CommentService;
