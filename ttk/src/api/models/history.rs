//! API response models for the article change log.

use crate::db::models::history::HistoryDBResponse;
use crate::types::{ArticleId, HistoryId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, sqlx::Type, PartialEq, Eq, ToSchema)]
#[sqlx(type_name = "history_event", rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE")]
pub enum HistoryEvent {
    Create,
    Changed,
    Delete,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HistoryResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: HistoryId,
    #[schema(value_type = String, format = "uuid")]
    pub article_id: ArticleId,
    #[schema(value_type = String, format = "uuid")]
    pub user_id: UserId,
    pub article_title: String,
    pub event: HistoryEvent,
    pub changed_at: DateTime<Utc>,
}

impl From<HistoryDBResponse> for HistoryResponse {
    fn from(db: HistoryDBResponse) -> Self {
        Self {
            id: db.id,
            article_id: db.article_id,
            user_id: db.user_id,
            article_title: db.article_title,
            event: db.event,
            changed_at: db.changed_at,
        }
    }
}
