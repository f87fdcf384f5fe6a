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
        articles::{ArticleCreate, ArticleResponse, ArticleUpdate},
        pagination::{PaginatedResponse, Pagination},
        users::CurrentUser,
    },
    errors::{Error, ErrorBody},
    types::ArticleId,
};

#[utoipa::path(
    post,
    path = "/api/v1/article/create",
    tag = "articles",
    request_body = ArticleCreate,
    responses(
        (status = 200, description = "Article created", body = ArticleResponse),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn create_article(
    State(state): State<AppState>,
    current_user: CurrentUser,
    request: Result<Json<ArticleCreate>, JsonRejection>,
) -> Result<Json<ArticleResponse>, Error> {
    let Json(request) = request?;
    let article = state.articles.create(&current_user, request).await?;
    Ok(Json(ArticleResponse::from(article)))
}

#[utoipa::path(
    get,
    path = "/api/v1/article/{id}",
    tag = "articles",
    params(("id" = String, Path, description = "Article ID")),
    responses(
        (status = 200, description = "Article", body = ArticleResponse),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 404, description = "Article not found", body = ErrorBody),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn get_article(
    State(state): State<AppState>,
    _: CurrentUser,
    id: Result<Path<ArticleId>, PathRejection>,
) -> Result<Json<ArticleResponse>, Error> {
    let Path(id) = id?;
    let article = state.articles.get(id).await?;
    Ok(Json(ArticleResponse::from(article)))
}

/// List articles, newest first
#[utoipa::path(
    get,
    path = "/api/v1/article/show",
    tag = "articles",
    params(Pagination),
    responses(
        (status = 200, description = "Page of articles", body = PaginatedResponse<ArticleResponse>),
        (status = 400, description = "Malformed pagination", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn list_articles(
    State(state): State<AppState>,
    _: CurrentUser,
    pagination: Result<Query<Pagination>, QueryRejection>,
) -> Result<Json<PaginatedResponse<ArticleResponse>>, Error> {
    let Query(pagination) = pagination?;
    let (articles, total) = state.articles.list(&pagination).await?;
    let data = articles.into_iter().map(ArticleResponse::from).collect();
    Ok(Json(PaginatedResponse::new(data, total, &pagination)))
}

/// Replace an article's title, image and content (creator only)
#[utoipa::path(
    post,
    path = "/api/v1/article/update",
    tag = "articles",
    request_body = ArticleUpdate,
    responses(
        (status = 200, description = "Article updated", body = ArticleResponse),
        (status = 400, description = "Invalid request", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 403, description = "Caller did not create the article", body = ErrorBody),
        (status = 404, description = "Article not found", body = ErrorBody),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn update_article(
    State(state): State<AppState>,
    current_user: CurrentUser,
    request: Result<Json<ArticleUpdate>, JsonRejection>,
) -> Result<Json<ArticleResponse>, Error> {
    let Json(request) = request?;
    let article = state.articles.update(&current_user, request).await?;
    Ok(Json(ArticleResponse::from(article)))
}

/// Delete an article (creator only)
#[utoipa::path(
    delete,
    path = "/api/v1/article/{id}",
    tag = "articles",
    params(("id" = String, Path, description = "Article ID")),
    responses(
        (status = 204, description = "Article deleted"),
        (status = 401, description = "Unauthorized", body = ErrorBody),
        (status = 403, description = "Caller did not create the article", body = ErrorBody),
        (status = 404, description = "Article not found", body = ErrorBody),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn delete_article(
    State(state): State<AppState>,
    current_user: CurrentUser,
    id: Result<Path<ArticleId>, PathRejection>,
) -> Result<StatusCode, Error> {
    let Path(id) = id?;
    state.articles.delete(&current_user, id).await?;
    Ok(StatusCode::NO_CONTENT)
}
