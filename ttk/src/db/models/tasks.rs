//! Database models for tasks.

use crate::api::models::tasks::{Priority, Status};
use crate::types::{TaskId, UserId};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone)]
pub struct TaskCreateDBRequest {
    pub title: String,
    pub content: String,
    pub image: String,
    pub created_by: UserId,
    pub assignee_id: UserId,
    pub planned_at: Option<DateTime<Utc>>,
    pub priority: Priority,
    pub status: Status,
}

#[derive(Debug, Clone)]
pub struct TaskUpdateDBRequest {
    pub title: String,
    pub content: String,
    pub image: String,
    pub assignee_id: UserId,
    pub planned_at: Option<DateTime<Utc>>,
    pub priority: Priority,
    pub status: Status,
}

/// A task row joined with its assignee's display name
#[derive(Debug, Clone, FromRow)]
pub struct TaskDBResponse {
    pub id: TaskId,
    pub title: String,
    pub content: String,
    pub image: String,
    pub created_by: UserId,
    pub assignee_id: UserId,
    pub assignee_name: String,
    pub planned_at: Option<DateTime<Utc>>,
    pub priority: Priority,
    pub status: Status,
    pub created_at: DateTime<Utc>,
}
