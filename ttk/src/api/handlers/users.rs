use axum::{
    Json,
    extract::{
        Path, State,
        rejection::{JsonRejection, PathRejection},
    },
};

use crate::{
    AppState,
    api::models::users::{CurrentUser, RoleUpdate, UserResponse},
    errors::{Error, ErrorBody},
    types::UserId,
};

/// Get the caller's own profile
#[utoipa::path(
    get,
    path = "/api/v1/user/me",
    tag = "users",
    responses(
        (status = 200, description = "Current user", body = UserResponse),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 404, description = "User no longer exists", body = ErrorBody),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn me(State(state): State<AppState>, current_user: CurrentUser) -> Result<Json<UserResponse>, Error> {
    let user = state.users.get(current_user.id).await?;
    Ok(Json(UserResponse::from(user)))
}

#[utoipa::path(
    get,
    path = "/api/v1/user/{id}",
    tag = "users",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User profile", body = UserResponse),
        (status = 400, description = "Malformed ID", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 404, description = "User not found", body = ErrorBody),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn get_user(
    State(state): State<AppState>,
    _: CurrentUser,
    id: Result<Path<UserId>, PathRejection>,
) -> Result<Json<UserResponse>, Error> {
    let Path(id) = id?;
    let user = state.users.get(id).await?;
    Ok(Json(UserResponse::from(user)))
}

/// Change a user's role (administrators only)
#[utoipa::path(
    put,
    path = "/api/v1/user/{id}/role",
    tag = "users",
    request_body = RoleUpdate,
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "Updated user", body = UserResponse),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 403, description = "Caller is not an administrator", body = ErrorBody),
        (status = 404, description = "User not found", body = ErrorBody),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn update_role(
    State(state): State<AppState>,
    current_user: CurrentUser,
    id: Result<Path<UserId>, PathRejection>,
    request: Result<Json<RoleUpdate>, JsonRejection>,
) -> Result<Json<UserResponse>, Error> {
    let Path(id) = id?;
    let Json(request) = request?;
    let user = state.users.set_role(&current_user, id, request.role).await?;
    Ok(Json(UserResponse::from(user)))
}
