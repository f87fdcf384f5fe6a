//! Task operations.

use std::sync::Arc;
use tracing::instrument;

use crate::{
    api::models::{
        articles::validate_title,
        pagination::Pagination,
        tasks::{TaskCreate, TaskUpdate},
        users::CurrentUser,
    },
    auth::ownership::ensure_owner,
    db::{
        errors::DbError,
        handlers::{ListFilter, TaskRepository, UserRepository},
        models::tasks::{TaskCreateDBRequest, TaskDBResponse, TaskUpdateDBRequest},
    },
    errors::{Error, Result},
    types::{Operation, Resource, TaskId, UserId, abbrev_uuid},
};

#[derive(Clone)]
pub struct TaskService {
    tasks: Arc<dyn TaskRepository>,
    users: Arc<dyn UserRepository>,
}

fn not_found(id: TaskId) -> Error {
    Error::NotFound {
        resource: "Task".to_string(),
        id: id.to_string(),
    }
}

fn unknown_assignee(id: UserId) -> Error {
    Error::BadRequest {
        message: format!("assignee_id: user {id} does not exist"),
    }
}

impl TaskService {
    pub fn new(tasks: Arc<dyn TaskRepository>, users: Arc<dyn UserRepository>) -> Self {
        Self { tasks, users }
    }

    /// Resolve the assignee, falling back to the caller, and check the user exists.
    async fn resolve_assignee(&self, user: &CurrentUser, requested: Option<UserId>) -> Result<UserId> {
        let assignee = requested.unwrap_or(user.id);
        if self.users.get_by_id(assignee).await?.is_none() {
            return Err(unknown_assignee(assignee));
        }
        Ok(assignee)
    }

    #[instrument(skip(self, user, request), fields(user_id = %abbrev_uuid(&user.id)), err)]
    pub async fn create(&self, user: &CurrentUser, request: TaskCreate) -> Result<TaskDBResponse> {
        let title = validate_title(&request.title)?;
        let assignee_id = self.resolve_assignee(user, request.assignee_id).await?;

        self.tasks
            .create(&TaskCreateDBRequest {
                title,
                content: request.content,
                image: request.image,
                created_by: user.id,
                assignee_id,
                planned_at: request.planned_at,
                priority: request.priority,
                status: request.status,
            })
            .await
            .map_err(|e| match e {
                // Assignee removed between the check and the insert
                DbError::ForeignKeyViolation { .. } => unknown_assignee(assignee_id),
                other => other.into(),
            })
    }

    pub async fn get(&self, id: TaskId) -> Result<TaskDBResponse> {
        self.tasks.get_by_id(id).await?.ok_or_else(|| not_found(id))
    }

    pub async fn list(&self, pagination: &Pagination) -> Result<(Vec<TaskDBResponse>, i64)> {
        let filter = ListFilter::new(pagination.skip(), pagination.limit());
        let tasks = self.tasks.list(&filter).await?;
        let total = self.tasks.count().await?;
        Ok((tasks, total))
    }

    #[instrument(skip(self, user, request), fields(user_id = %abbrev_uuid(&user.id), task_id = %abbrev_uuid(&request.id)), err)]
    pub async fn update(&self, user: &CurrentUser, request: TaskUpdate) -> Result<TaskDBResponse> {
        let title = validate_title(&request.title)?;

        let existing = self.get(request.id).await?;
        ensure_owner(existing.created_by, user, Operation::Update, Resource::Tasks)?;
        let assignee_id = self.resolve_assignee(user, request.assignee_id).await?;

        self.tasks
            .update(
                request.id,
                &TaskUpdateDBRequest {
                    title,
                    content: request.content,
                    image: request.image,
                    assignee_id,
                    planned_at: request.planned_at,
                    priority: request.priority,
                    status: request.status,
                },
            )
            .await
            .map_err(|e| match e {
                DbError::ForeignKeyViolation { .. } => unknown_assignee(assignee_id),
                DbError::NotFound => not_found(request.id),
                other => other.into(),
            })
    }

    #[instrument(skip(self, user), fields(user_id = %abbrev_uuid(&user.id), task_id = %abbrev_uuid(&id)), err)]
    pub async fn delete(&self, user: &CurrentUser, id: TaskId) -> Result<()> {
        let existing = self.get(id).await?;
        ensure_owner(existing.created_by, user, Operation::Delete, Resource::Tasks)?;

        if !self.tasks.delete(id).await? {
            return Err(not_found(id));
        }
        Ok(())
    }
}
