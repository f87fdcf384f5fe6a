//! Database repository for tasks.
//!
//! Every read joins the assignee so responses carry the responsible user's display name.

use crate::db::{
    errors::Result,
    handlers::repository::{ListFilter, Repository},
    models::tasks::{TaskCreateDBRequest, TaskDBResponse, TaskUpdateDBRequest},
};
use crate::types::{TaskId, abbrev_uuid};
use sqlx::PgPool;
use tracing::instrument;

const TASK_SELECT: &str = r#"
    SELECT t.id, t.title, t.content, t.image, t.created_by, t.assignee_id,
           u.display_name AS assignee_name, t.planned_at, t.priority, t.status, t.created_at
"#;

pub trait TaskRepository:
    Repository<
        CreateRequest = TaskCreateDBRequest,
        UpdateRequest = TaskUpdateDBRequest,
        Response = TaskDBResponse,
        Id = TaskId,
        Filter = ListFilter,
    >
{
}

impl<T> TaskRepository for T where
    T: Repository<
            CreateRequest = TaskCreateDBRequest,
            UpdateRequest = TaskUpdateDBRequest,
            Response = TaskDBResponse,
            Id = TaskId,
            Filter = ListFilter,
        >
{
}

pub struct Tasks {
    db: PgPool,
}

impl Tasks {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

#[async_trait::async_trait]
impl Repository for Tasks {
    type CreateRequest = TaskCreateDBRequest;
    type UpdateRequest = TaskUpdateDBRequest;
    type Response = TaskDBResponse;
    type Id = TaskId;
    type Filter = ListFilter;

    #[instrument(skip(self, request), fields(assignee_id = %abbrev_uuid(&request.assignee_id)), err)]
    async fn create(&self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let task = sqlx::query_as::<_, TaskDBResponse>(&format!(
            r#"
            WITH t AS (
                INSERT INTO tasks (title, content, image, created_by, assignee_id, planned_at, priority, status)
                VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
                RETURNING *
            )
            {TASK_SELECT}
            FROM t JOIN users u ON u.id = t.assignee_id
            "#
        ))
        .bind(&request.title)
        .bind(&request.content)
        .bind(&request.image)
        .bind(request.created_by)
        .bind(request.assignee_id)
        .bind(request.planned_at)
        .bind(request.priority)
        .bind(request.status)
        .fetch_one(&self.db)
        .await?;

        Ok(task)
    }

    #[instrument(skip(self), fields(task_id = %abbrev_uuid(&id)), err)]
    async fn get_by_id(&self, id: Self::Id) -> Result<Option<Self::Response>> {
        let task = sqlx::query_as::<_, TaskDBResponse>(&format!(
            "{TASK_SELECT} FROM tasks t JOIN users u ON u.id = t.assignee_id WHERE t.id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.db)
        .await?;

        Ok(task)
    }

    #[instrument(skip(self, filter), fields(limit = filter.limit, skip = filter.skip), err)]
    async fn list(&self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let tasks = sqlx::query_as::<_, TaskDBResponse>(&format!(
            "{TASK_SELECT} FROM tasks t JOIN users u ON u.id = t.assignee_id ORDER BY t.created_at DESC, t.id LIMIT $1 OFFSET $2"
        ))
        .bind(filter.limit)
        .bind(filter.skip)
        .fetch_all(&self.db)
        .await?;

        Ok(tasks)
    }

    #[instrument(skip(self), err)]
    async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tasks").fetch_one(&self.db).await?;
        Ok(count)
    }

    #[instrument(skip(self), fields(task_id = %abbrev_uuid(&id)), err)]
    async fn delete(&self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1").bind(id).execute(&self.db).await?;
        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, request), fields(task_id = %abbrev_uuid(&id)), err)]
    async fn update(&self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let task = sqlx::query_as::<_, TaskDBResponse>(&format!(
            r#"
            WITH t AS (
                UPDATE tasks SET
                    title = $2,
                    content = $3,
                    image = $4,
                    assignee_id = $5,
                    planned_at = $6,
                    priority = $7,
                    status = $8
                WHERE id = $1
                RETURNING *
            )
            {TASK_SELECT}
            FROM t JOIN users u ON u.id = t.assignee_id
            "#
        ))
        .bind(id)
        .bind(&request.title)
        .bind(&request.content)
        .bind(&request.image)
        .bind(request.assignee_id)
        .bind(request.planned_at)
        .bind(request.priority)
        .bind(request.status)
        .fetch_one(&self.db)
        .await?;

        Ok(task)
    }
}
