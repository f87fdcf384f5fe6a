use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};

use crate::{
    AppState,
    api::models::{
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        users::UserResponse,
    },
    errors::{Error, ErrorBody},
};

/// Register a new user account
#[utoipa::path(
    post,
    path = "/api/v1/register",
    request_body = RegisterRequest,
    tag = "authentication",
    responses(
        (status = 200, description = "User registered successfully", body = UserResponse),
        (status = 400, description = "Invalid input or registration disabled", body = ErrorBody),
        (status = 409, description = "Login already taken", body = ErrorBody),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    request: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<Json<UserResponse>, Error> {
    if !state.config.auth.allow_registration {
        return Err(Error::BadRequest {
            message: "User registration is disabled".to_string(),
        });
    }

    let Json(request) = request?;
    request.validate(&state.config.auth.password)?;

    let user = state.auth.register(&request.login, &request.name, &request.password).await?;
    Ok(Json(UserResponse::from(user)))
}

/// Exchange login and password for a bearer token
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    tag = "authentication",
    responses(
        (status = 200, description = "Login successful", body = LoginResponse),
        (status = 400, description = "Malformed request", body = ErrorBody),
        (status = 401, description = "Invalid login or password", body = ErrorBody),
    )
)]
#[tracing::instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    request: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, Error> {
    let Json(request) = request?;
    let outcome = state.auth.login(&request.login, &request.password).await?;
    Ok(Json(LoginResponse { token: outcome.token }))
}

#[cfg(test)]
mod tests {
    use crate::{
        api::models::{
            auth::LoginResponse,
            users::{CurrentUser, Role, UserResponse},
        },
        test_utils::*,
    };
    use axum::http::StatusCode;
    use serde_json::{Value, json};

    #[test_log::test(tokio::test)]
    async fn test_register_then_login() {
        let state = create_test_state();
        let server = create_test_server(&state);

        let response = server
            .post("/api/v1/register")
            .json(&json!({"login": "alice", "name": "Alice Smith", "password": "Secret1!"}))
            .await;
        response.assert_status_ok();
        let user: UserResponse = response.json();
        assert_eq!(user.login, "alice");
        assert_eq!(user.name, "Alice Smith");
        assert_eq!(user.role, Role::User);
        assert!(response.text().find("password").is_none());

        let response = server
            .post("/api/v1/login")
            .json(&json!({"login": "alice", "password": "Secret1!"}))
            .await;
        response.assert_status_ok();
        let LoginResponse { token } = response.json();

        let identity: CurrentUser = state.auth.verify_token(&token).unwrap();
        assert_eq!(identity.id, user.id);
    }

    #[test_log::test(tokio::test)]
    async fn test_duplicate_login_conflicts() {
        let state = create_test_state();
        let server = create_test_server(&state);
        let body = json!({"login": "alice", "name": "Alice", "password": "Secret1!"});

        server.post("/api/v1/register").json(&body).await.assert_status_ok();

        let response = server.post("/api/v1/register").json(&body).await;
        response.assert_status(StatusCode::CONFLICT);
        assert_eq!(response.json::<Value>()["error"], "This login is already taken");
    }

    #[test_log::test(tokio::test)]
    async fn test_register_validation() {
        let state = create_test_state();
        let server = create_test_server(&state);

        let response = server
            .post("/api/v1/register")
            .json(&json!({"login": "alice", "name": "Alice", "password": "nospecial1"}))
            .await;
        response.assert_status_bad_request();
        let error = response.json::<Value>()["error"].as_str().unwrap().to_string();
        assert!(error.starts_with("password:"), "{error}");

        // Missing fields are rejected before validation
        let response = server.post("/api/v1/register").json(&json!({"login": "alice"})).await;
        response.assert_status_bad_request();
    }

    #[test_log::test(tokio::test)]
    async fn test_registration_disabled() {
        let mut config = create_test_config();
        config.auth.allow_registration = false;
        let state = create_test_state_with(&InMemoryStore::default(), config);
        let server = create_test_server(&state);

        let response = server
            .post("/api/v1/register")
            .json(&json!({"login": "alice", "name": "Alice", "password": "Secret1!"}))
            .await;
        response.assert_status_bad_request();
        assert_eq!(response.json::<Value>()["error"], "User registration is disabled");
    }

    #[test_log::test(tokio::test)]
    async fn test_login_failures_look_the_same() {
        let state = create_test_state();
        let server = create_test_server(&state);
        register_and_login(&state, "alice", "Secret1!").await;

        let wrong_password = server
            .post("/api/v1/login")
            .json(&json!({"login": "alice", "password": "Wrong123!"}))
            .await;
        let unknown_login = server
            .post("/api/v1/login")
            .json(&json!({"login": "nobody", "password": "Secret1!"}))
            .await;

        wrong_password.assert_status_unauthorized();
        unknown_login.assert_status_unauthorized();
        assert_eq!(wrong_password.json::<Value>(), json!({"error": "Invalid login or password"}));
        assert_eq!(unknown_login.json::<Value>(), wrong_password.json::<Value>());
    }
}
