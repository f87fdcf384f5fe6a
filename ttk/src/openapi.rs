//! OpenAPI documentation for the `/api/v1` surface, served with Scalar at `/docs`.

use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

use crate::{
    api::{self, models},
    errors::ErrorBody,
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.security_schemes.insert(
                "BearerAuth".to_string(),
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some(
                            "Token returned by `POST /api/v1/login`. Send it in the `Authorization` header:\n\n\
                            ```\nAuthorization: Bearer YOUR_TOKEN\n```",
                        ))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(title = "TTK API", description = "Users, articles, tasks and article history"),
    modifiers(&SecurityAddon),
    paths(
        api::handlers::auth::register,
        api::handlers::auth::login,
        api::handlers::users::me,
        api::handlers::users::get_user,
        api::handlers::users::update_role,
        api::handlers::articles::create_article,
        api::handlers::articles::get_article,
        api::handlers::articles::list_articles,
        api::handlers::articles::update_article,
        api::handlers::articles::delete_article,
        api::handlers::tasks::create_task,
        api::handlers::tasks::get_task,
        api::handlers::tasks::list_tasks,
        api::handlers::tasks::update_task,
        api::handlers::tasks::delete_task,
        api::handlers::history::list_article_history,
    ),
    components(
        schemas(
            ErrorBody,
            models::auth::RegisterRequest,
            models::auth::LoginRequest,
            models::auth::LoginResponse,
            models::users::Role,
            models::users::RoleUpdate,
            models::users::UserResponse,
            models::articles::ArticleCreate,
            models::articles::ArticleUpdate,
            models::articles::ArticleResponse,
            models::tasks::Priority,
            models::tasks::Status,
            models::tasks::TaskCreate,
            models::tasks::TaskUpdate,
            models::tasks::TaskResponse,
            models::history::HistoryEvent,
            models::history::HistoryResponse,
        )
    ),
    tags(
        (name = "authentication", description = "Registration and login"),
        (name = "users", description = "User profiles and roles"),
        (name = "articles", description = "Articles, editable by their creator"),
        (name = "tasks", description = "Tasks with an assignee, editable by their creator"),
        (name = "history", description = "Article change log"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_lists_every_route() {
        let spec = ApiDoc::openapi();
        let paths: Vec<&str> = spec.paths.paths.keys().map(String::as_str).collect();
        for expected in [
            "/api/v1/register",
            "/api/v1/login",
            "/api/v1/user/me",
            "/api/v1/user/{id}/role",
            "/api/v1/article/show",
            "/api/v1/task/{id}",
            "/api/v1/history/articles",
        ] {
            assert!(paths.contains(&expected), "missing {expected}");
        }

        let components = spec.components.expect("components");
        assert!(components.security_schemes.contains_key("BearerAuth"));
    }
}
