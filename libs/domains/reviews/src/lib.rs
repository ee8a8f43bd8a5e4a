//! Reviews Domain
//!
//! Feedback submitted by signed-in users and read by administrators.
//!
//! The submitter's username is copied onto the review when it is created.
//! The current name is fetched through a [`SubmitterDirectory`], which the
//! application wires to the users domain.

pub mod error;
pub mod handlers;
pub mod models;
pub mod postgres;
pub mod repository;
pub mod service;

pub use error::{ReviewError, ReviewResult};
pub use models::{NewReview, Review, UNKNOWN_USER};
pub use postgres::PgReviewRepository;
pub use repository::{InMemoryReviewRepository, ReviewRepository};
pub use service::{ReviewService, SubmitterDirectory};
