//! Database repository for articles.

use crate::db::{
    errors::Result,
    handlers::repository::{ListFilter, Repository},
    models::articles::{ArticleCreateDBRequest, ArticleDBResponse, ArticleUpdateDBRequest},
};
use crate::types::{ArticleId, abbrev_uuid};
use sqlx::PgPool;
use tracing::instrument;

const ARTICLE_COLUMNS: &str = "id, title, image, content, created_by, last_editor_name, created_at, updated_at";

pub trait ArticleRepository:
    Repository<
        CreateRequest = ArticleCreateDBRequest,
        UpdateRequest = ArticleUpdateDBRequest,
        Response = ArticleDBResponse,
        Id = ArticleId,
        Filter = ListFilter,
    >
{
}

impl<T> ArticleRepository for T where
    T: Repository<
            CreateRequest = ArticleCreateDBRequest,
            UpdateRequest = ArticleUpdateDBRequest,
            Response = ArticleDBResponse,
            Id = ArticleId,
            Filter = ListFilter,
        >
{
}

pub struct Articles {
    db: PgPool,
}

impl Articles {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl Repository for Articles {
    type CreateRequest = ArticleCreateDBRequest;
    type UpdateRequest = ArticleUpdateDBRequest;
    type Response = ArticleDBResponse;
    type Id = ArticleId;
    type Filter = ListFilter;

    #[instrument(skip(self, request), fields(created_by = %abbrev_uuid(&request.created_by)), err)]
    async fn create(&self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let article = sqlx::query_as::<_, ArticleDBResponse>(&format!(
            r#"
            INSERT INTO articles (title, image, content, created_by, last_editor_name)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING {ARTICLE_COLUMNS}
            "#
        ))
        .bind(&request.title)
        .bind(&request.image)
        .bind(&request.content)
        .bind(request.created_by)
        .bind(&request.last_editor_name)
        .fetch_one(&self.db)
        .await?;

        Ok(article)
    }

    #[instrument(skip(self), fields(article_id = %abbrev_uuid(&id)), err)]
    async fn get_by_id(&self, id: Self::Id) -> Result<Option<Self::Response>> {
        let article = sqlx::query_as::<_, ArticleDBResponse>(&format!("SELECT {ARTICLE_COLUMNS} FROM articles WHERE id = $1"))
            .bind(id)
            .fetch_optional(&self.db)
            .await?;

        Ok(article)
    }

    #[instrument(skip(self, filter), fields(limit = filter.limit, skip = filter.skip), err)]
    async fn list(&self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let articles = sqlx::query_as::<_, ArticleDBResponse>(&format!(
            "SELECT {ARTICLE_COLUMNS} FROM articles ORDER BY created_at DESC, id LIMIT $1 OFFSET $2"
        ))
        .bind(filter.limit)
        .bind(filter.skip)
        .fetch_all(&self.db)
        .await?;

        Ok(articles)
    }

    #[instrument(skip(self), err)]
    async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM articles").fetch_one(&self.db).await?;
        Ok(count)
    }

    #[instrument(skip(self), fields(article_id = %abbrev_uuid(&id)), err)]
    async fn delete(&self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM articles WHERE id = $1").bind(id).execute(&self.db).await?;
        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, request), fields(article_id = %abbrev_uuid(&id)), err)]
    async fn update(&self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let article = sqlx::query_as::<_, ArticleDBResponse>(&format!(
            r#"
            UPDATE articles SET
                title = $2,
                image = $3,
                content = $4,
                last_editor_name = $5,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {ARTICLE_COLUMNS}
            "#
        ))
        .bind(id)
        .bind(&request.title)
        .bind(&request.image)
        .bind(&request.content)
        .bind(&request.last_editor_name)
        .fetch_one(&self.db)
        .await?;

        Ok(article)
    }
}
