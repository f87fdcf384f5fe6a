use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{JsonRejection, PathRejection, QueryRejection},
    },
    http::StatusCode,
};

use crate::{
    AppState,
    api::models::{
        pagination::{PaginatedResponse, Pagination},
        tasks::{TaskCreate, TaskResponse, TaskUpdate},
        users::CurrentUser,
    },
    errors::{Error, ErrorBody},
    types::TaskId,
};

/// Create a task; the assignee defaults to the caller
#[utoipa::path(
    post,
    path = "/api/v1/task/create",
    tag = "tasks",
    request_body = TaskCreate,
    responses(
        (status = 200, description = "Task created", body = TaskResponse),
        (status = 400, description = "Invalid request or unknown assignee", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn create_task(
    State(state): State<AppState>,
    current_user: CurrentUser,
    request: Result<Json<TaskCreate>, JsonRejection>,
) -> Result<Json<TaskResponse>, Error> {
    let Json(request) = request?;
    let task = state.tasks.create(&current_user, request).await?;
    Ok(Json(TaskResponse::from(task)))
}

#[utoipa::path(
    get,
    path = "/api/v1/task/{id}",
    tag = "tasks",
    params(("id" = String, Path, description = "Task ID")),
    responses(
        (status = 200, description = "Task", body = TaskResponse),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 404, description = "Task not found", body = ErrorBody),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn get_task(
    State(state): State<AppState>,
    _: CurrentUser,
    id: Result<Path<TaskId>, PathRejection>,
) -> Result<Json<TaskResponse>, Error> {
    let Path(id) = id?;
    let task = state.tasks.get(id).await?;
    Ok(Json(TaskResponse::from(task)))
}

#[utoipa::path(
    get,
    path = "/api/v1/task/show",
    tag = "tasks",
    params(Pagination),
    responses(
        (status = 200, description = "Page of tasks", body = PaginatedResponse<TaskResponse>),
        (status = 400, description = "Malformed pagination", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn list_tasks(
    State(state): State<AppState>,
    _: CurrentUser,
    pagination: Result<Query<Pagination>, QueryRejection>,
) -> Result<Json<PaginatedResponse<TaskResponse>>, Error> {
    let Query(pagination) = pagination?;
    let (tasks, total) = state.tasks.list(&pagination).await?;
    let data = tasks.into_iter().map(TaskResponse::from).collect();
    Ok(Json(PaginatedResponse::new(data, total, &pagination)))
}

#[utoipa::path(
    post,
    path = "/api/v1/task/update",
    tag = "tasks",
    request_body = TaskUpdate,
    responses(
        (status = 200, description = "Task updated", body = TaskResponse),
        (status = 400, description = "Invalid request or unknown assignee", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 403, description = "Caller did not create the task", body = ErrorBody),
        (status = 404, description = "Task not found", body = ErrorBody),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn update_task(
    State(state): State<AppState>,
    current_user: CurrentUser,
    request: Result<Json<TaskUpdate>, JsonRejection>,
) -> Result<Json<TaskResponse>, Error> {
    let Json(request) = request?;
    let task = state.tasks.update(&current_user, request).await?;
    Ok(Json(TaskResponse::from(task)))
}

#[utoipa::path(
    delete,
    path = "/api/v1/task/{id}",
    tag = "tasks",
    params(("id" = String, Path, description = "Task ID")),
    responses(
        (status = 204, description = "Task deleted"),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 403, description = "Caller did not create the task", body = ErrorBody),
        (status = 404, description = "Task not found", body = ErrorBody),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn delete_task(
    State(state): State<AppState>,
    current_user: CurrentUser,
    id: Result<Path<TaskId>, PathRejection>,
) -> Result<StatusCode, Error> {
    let Path(id) = id?;
    state.tasks.delete(&current_user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
