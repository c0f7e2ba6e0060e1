/*
 * Responsibility
 * - Posts の request/response DTO と、documents.body に入る PostBody
 * - 公開 ID を返す場合は、encode 済みの値を返す (内部 ID を漏らさない)
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::services::auth::SubjectId;

const TITLE_MAX_CHARS: usize = 100;

/// Stored shape of a post (documents.body).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PostBody {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    // written only through DocumentStore::toggle_member
    #[serde(default)]
    pub likes: Vec<SubjectId>,
}

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
    pub category: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
}

impl CreatePostRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.title.trim().is_empty() {
            return Err("title is required");
        }
        if self.title.trim().chars().count() > TITLE_MAX_CHARS {
            return Err("title must be <= 100 chars");
        }
        if self.content.trim().is_empty() {
            return Err("content is required");
        }

        Ok(())
    }

    pub fn into_body(self) -> PostBody {
        PostBody {
            title: self.title.trim().to_string(),
            content: self.content,
            category: self.category,
            tags: self.tags,
            likes: Vec::new(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    pub tags: Option<Vec<String>>,
}

impl UpdatePostRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                return Err("title cannot be empty");
            }
            if title.trim().chars().count() > TITLE_MAX_CHARS {
                return Err("title must be <= 100 chars");
            }
        }
        if let Some(content) = &self.content
            && content.trim().is_empty()
        {
            return Err("content cannot be empty");
        }

        Ok(())
    }

    // Absent fields keep their stored value.
    pub fn apply(self, body: &mut PostBody) {
        if let Some(title) = self.title {
            body.title = title.trim().to_string();
        }
        if let Some(content) = self.content {
            body.content = content;
        }
        if let Some(category) = self.category {
            body.category = Some(category);
        }
        if let Some(tags) = self.tags {
            body.tags = tags;
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub id: String, // encoded
    pub title: String,
    pub content: String,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub author_id: Option<SubjectId>,
    pub like_count: usize,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct LikeResponse {
    pub liked: bool,
    pub like_count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_update_keeps_absent_fields() {
        let mut body = PostBody {
            title: "old".into(),
            content: "keep me".into(),
            category: Some("rust".into()),
            tags: vec!["a".into()],
            likes: Vec::new(),
        };
        UpdatePostRequest {
            title: Some(" new ".into()),
            content: None,
            category: None,
            tags: None,
        }
        .apply(&mut body);

        assert_eq!(body.title, "new");
        assert_eq!(body.content, "keep me");
        assert_eq!(body.category.as_deref(), Some("rust"));
        assert_eq!(body.tags, vec!["a".to_string()]);
    }

    #[test]
    fn long_titles_are_rejected() {
        let req = CreatePostRequest {
            title: "x".repeat(101),
            content: "c".into(),
            category: None,
            tags: Vec::new(),
        };
        assert!(req.validate().is_err());
    }
}
