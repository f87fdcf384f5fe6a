//! Database models for the article change log.

use crate::api::models::history::HistoryEvent;
use crate::types::{ArticleId, HistoryId, UserId};
use chrono::{DateTime, Utc};
use sqlx::FromRow;

#[derive(Debug, Clone)]
pub struct HistoryCreateDBRequest {
    pub article_id: ArticleId,
    pub user_id: UserId,
    pub article_title: String,
    pub event: HistoryEvent,
}

#[derive(Debug, Clone, FromRow)]
pub struct HistoryDBResponse {
    pub id: HistoryId,
    pub article_id: ArticleId,
    pub user_id: UserId,
    pub article_title: String,
    pub event: HistoryEvent,
    pub changed_at: DateTime<Utc>,
}
