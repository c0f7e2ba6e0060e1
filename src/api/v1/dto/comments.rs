use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::services::auth::SubjectId;

/// Stored shape of a comment (documents.body).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentBody {
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub content: String,
}

impl CreateCommentRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.content.trim().is_empty() {
            return Err("content is required");
        }
        Ok(())
    }
}

#[derive(Debug, Serialize)]
pub struct CommentResponse {
    pub id: String,      // encoded
    pub post_id: String, // encoded
    pub content: String,
    pub author_id: Option<SubjectId>,
    pub created_at: DateTime<Utc>,
}
