//! API request/response models for tasks.

use crate::db::models::tasks::TaskDBResponse;
use crate::types::{TaskId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "task_priority", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Priority {
    High,
    Middle,
    Low,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "task_status", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Current,
    #[default]
    Pending,
    Completed,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct TaskCreate {
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub image: String,
    /// Responsible user, defaults to the caller
    #[schema(value_type = Option<String>, format = "uuid")]
    pub assignee_id: Option<UserId>,
    pub planned_at: Option<DateTime<Utc>>,
    pub priority: Priority,
    #[serde(default)]
    pub status: Status,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct TaskUpdate {
    #[schema(value_type = String, format = "uuid")]
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub image: String,
    /// Responsible user, defaults to the caller
    #[schema(value_type = Option<String>, format = "uuid")]
    pub assignee_id: Option<UserId>,
    pub planned_at: Option<DateTime<Utc>>,
    pub priority: Priority,
    #[serde(default)]
    pub status: Status,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TaskResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: TaskId,
    pub title: String,
    pub content: String,
    pub image: String,
    #[schema(value_type = String, format = "uuid")]
    pub created_by: UserId,
    #[schema(value_type = String, format = "uuid")]
    pub assignee_id: UserId,
    pub assignee_name: String,
    pub planned_at: Option<DateTime<Utc>>,
    pub priority: Priority,
    pub status: Status,
    pub created_at: DateTime<Utc>,
}

impl From<TaskDBResponse> for TaskResponse {
    fn from(db: TaskDBResponse) -> Self {
        Self {
            id: db.id,
            title: db.title,
            content: db.content,
            image: db.image,
            created_by: db.created_by,
            assignee_id: db.assignee_id,
            assignee_name: db.assignee_name,
            planned_at: db.planned_at,
            priority: db.priority,
            status: db.status,
            created_at: db.created_at,
        }
    }
}
