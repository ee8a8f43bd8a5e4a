//! Extractors whose rejections use the [`AppError`](crate::AppError) envelope.

pub mod uuid_path;
pub mod validated_json;

pub use uuid_path::UuidPath;
pub use validated_json::ValidatedJson;
