/*
 * Responsibility
 * - Tasks の request/response DTO と documents.body に入る TaskBody
 * - status / priority は enum で受け、未知の値は 400
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::services::auth::SubjectId;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    #[default]
    Medium,
    High,
}

/// Stored shape of a task (documents.body).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskBody {
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub deadline: Option<DateTime<Utc>>,
    #[serde(default)]
    pub assigned_to: Option<SubjectId>,
}

#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    pub description: Option<String>,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: TaskPriority,
    pub deadline: Option<DateTime<Utc>>,
    pub assigned_to: Option<SubjectId>,
}

impl CreateTaskRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if self.title.trim().is_empty() {
            return Err("title is required");
        }
        Ok(())
    }

    pub fn into_body(self) -> TaskBody {
        TaskBody {
            title: self.title.trim().to_string(),
            description: self.description,
            status: self.status,
            priority: self.priority,
            deadline: self.deadline,
            assigned_to: self.assigned_to,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub deadline: Option<DateTime<Utc>>,
    pub assigned_to: Option<SubjectId>,
}

impl UpdateTaskRequest {
    pub fn validate(&self) -> Result<(), &'static str> {
        if let Some(title) = &self.title
            && title.trim().is_empty()
        {
            return Err("title cannot be empty");
        }
        Ok(())
    }

    // Absent fields keep their stored value.
    pub fn apply(self, body: &mut TaskBody) {
        if let Some(title) = self.title {
            body.title = title.trim().to_string();
        }
        if let Some(description) = self.description {
            body.description = Some(description);
        }
        if let Some(status) = self.status {
            body.status = status;
        }
        if let Some(priority) = self.priority {
            body.priority = priority;
        }
        if let Some(deadline) = self.deadline {
            body.deadline = Some(deadline);
        }
        if let Some(assigned_to) = self.assigned_to {
            body.assigned_to = Some(assigned_to);
        }
    }
}

#[derive(Debug, Serialize)]
pub struct TaskResponse {
    pub id: String, // encoded
    pub title: String,
    pub description: Option<String>,
    pub status: TaskStatus,
    pub priority: TaskPriority,
    pub deadline: Option<DateTime<Utc>>,
    pub assigned_to: Option<SubjectId>,
    pub created_by: Option<SubjectId>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
