//! Database models for articles.

use crate::types::{ArticleId, UserId};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone)]
pub struct ArticleCreateDBRequest {
    pub title: String,
    pub image: String,
    pub content: String,
    pub created_by: UserId,
    pub last_editor_name: String,
}

#[derive(Debug, Clone)]
pub struct ArticleUpdateDBRequest {
    pub title: String,
    pub image: String,
    pub content: String,
    pub last_editor_name: String,
}

#[derive(Debug, Clone, FromRow)]
pub struct ArticleDBResponse {
    pub id: ArticleId,
    pub title: String,
    pub image: String,
    pub content: String,
    pub created_by: UserId,
    pub last_editor_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
