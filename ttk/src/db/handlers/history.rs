//! Database repository for the article change log.
//!
//! History is append-only, so it gets its own small trait instead of [`Repository`].
//!
//! [`Repository`]: super::Repository

use crate::db::{
    errors::Result,
    handlers::repository::ListFilter,
    models::history::{HistoryCreateDBRequest, HistoryDBResponse},
};
use crate::types::abbrev_uuid;
use sqlx::PgPool;
use tracing::instrument;

const HISTORY_COLUMNS: &str = "id, article_id, user_id, article_title, event, changed_at";

#[async_trait::async_trait]
pub trait HistoryRepository: Send + Sync {
    /// Append an event
    async fn record(&self, request: &HistoryCreateDBRequest) -> Result<HistoryDBResponse>;

    /// Events, newest first
    async fn list(&self, filter: &ListFilter) -> Result<Vec<HistoryDBResponse>>;

    async fn count(&self) -> Result<i64>;
}

pub struct ArticleHistory {
    db: PgPool,
}

impl ArticleHistory {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl HistoryRepository for ArticleHistory {
    #[instrument(skip(self, request), fields(article_id = %abbrev_uuid(&request.article_id), event = ?request.event), err)]
    async fn record(&self, request: &HistoryCreateDBRequest) -> Result<HistoryDBResponse> {
        let entry = sqlx::query_as::<_, HistoryDBResponse>(&format!(
            r#"
            INSERT INTO article_history (article_id, user_id, article_title, event)
            VALUES ($1, $2, $3, $4)
            RETURNING {HISTORY_COLUMNS}
            "#
        ))
        .bind(request.article_id)
        .bind(request.user_id)
        .bind(&request.article_title)
        .bind(request.event)
        .fetch_one(&self.db)
        .await?;

        Ok(entry)
    }

    #[instrument(skip(self, filter), fields(limit = filter.limit, skip = filter.skip), err)]
    async fn list(&self, filter: &ListFilter) -> Result<Vec<HistoryDBResponse>> {
        let entries = sqlx::query_as::<_, HistoryDBResponse>(&format!(
            "SELECT {HISTORY_COLUMNS} FROM article_history ORDER BY changed_at DESC, id LIMIT $1 OFFSET $2"
        ))
        .bind(filter.limit)
        .bind(filter.skip)
        .fetch_all(&self.db)
        .await?;

        Ok(entries)
    }

    #[instrument(skip(self), err)]
    async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM article_history").fetch_one(&self.db).await?;
        Ok(count)
    }
}
