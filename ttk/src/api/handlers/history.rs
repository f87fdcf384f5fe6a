use axum::{
    Json,
    extract::{Query, State, rejection::QueryRejection},
};

use crate::{
    AppState,
    api::models::{
        history::HistoryResponse,
        pagination::{PaginatedResponse, Pagination},
        users::CurrentUser,
    },
    errors::{Error, ErrorBody},
};

/// List article change events, newest first
#[utoipa::path(
    get,
    path = "/api/v1/history/articles",
    tag = "history",
    params(Pagination),
    responses(
        (status = 200, description = "Page of history events", body = PaginatedResponse<HistoryResponse>),
        (status = 400, description = "Malformed pagination", body = ErrorBody),
        (status = 401, description = "Unauthorized", body = ErrorBody),
    ),
    security(("BearerAuth" = []))
)]
#[tracing::instrument(skip_all)]
pub async fn list_article_history(
    State(state): State<AppState>,
    _: CurrentUser,
    pagination: Result<Query<Pagination>, QueryRejection>,
) -> Result<Json<PaginatedResponse<HistoryResponse>>, Error> {
    let Query(pagination) = pagination?;
    let (entries, total) = state.history.list(&pagination).await?;
    let data = entries.into_iter().map(HistoryResponse::from).collect();
    Ok(Json(PaginatedResponse::new(data, total, &pagination)))
}
