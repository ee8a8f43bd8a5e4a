use serde::{Deserialize, Serialize};

/// `{ "message": ... }` acknowledgement body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// `{ "message": ..., "id": ... }` returned by create endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedResponse<I> {
    pub message: String,
    pub id: I,
}

impl<I> CreatedResponse<I> {
    pub fn new(message: impl Into<String>, id: I) -> Self {
        Self {
            message: message.into(),
            id,
        }
    }
}
