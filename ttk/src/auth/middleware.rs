//! Bearer token gate for protected routes.
//!
//! Per request: no `Authorization` header, a header without the `Bearer ` prefix, or a token
//! that fails verification are all rejected with 401 before the handler runs. A valid token
//! attaches the decoded [`CurrentUser`] to the request extensions.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header::AUTHORIZATION},
    middleware::Next,
    response::Response,
};
use tracing::{debug, trace};

use crate::{
    AppState,
    api::models::users::CurrentUser,
    auth::{errors::AuthError, service::AuthService},
    errors::Error,
};

/// Pull the raw token out of `Authorization: Bearer <token>`
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, Error> {
    let header = headers.get(AUTHORIZATION).ok_or_else(|| Error::Unauthenticated {
        message: Some("Authorization header required".to_string()),
    })?;

    header
        .to_str()
        .ok()
        .and_then(|value| value.strip_prefix("Bearer "))
        .ok_or_else(|| Error::Unauthenticated {
            message: Some("Bearer token required".to_string()),
        })
}

/// Resolve the caller from request headers, single shot
pub fn authenticate(headers: &HeaderMap, auth: &AuthService) -> Result<CurrentUser, Error> {
    let token = extract_bearer_token(headers)?;
    auth.verify_token(token).map_err(|e: AuthError| {
        trace!("Bearer token rejected: {e}");
        Error::from(e)
    })
}

pub async fn bearer_auth_middleware(State(state): State<AppState>, mut request: Request, next: Next) -> Result<Response, Error> {
    let user = authenticate(request.headers(), &state.auth)?;
    debug!(user_id = %user.id, "Authenticated bearer token");
    request.extensions_mut().insert(user);
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{create_test_state, register_and_login};
    use axum::{Extension, Json, Router, middleware::from_fn_with_state, routing::get};
    use axum_test::TestServer;
    use chrono::Duration;
    use serde_json::Value;

    async fn whoami(Extension(user): Extension<CurrentUser>) -> Json<CurrentUser> {
        Json(user)
    }

    async fn server() -> (TestServer, AppState) {
        let state = create_test_state();
        let router = Router::new()
            .route("/protected", get(whoami))
            .layer(from_fn_with_state(state.clone(), bearer_auth_middleware))
            .with_state(state.clone());
        (TestServer::new(router).unwrap(), state)
    }

    async fn assert_rejected(response: axum_test::TestResponse, message: &str) {
        response.assert_status_unauthorized();
        let body: Value = response.json();
        assert_eq!(body["error"], message);
    }

    #[tokio::test]
    async fn test_missing_header() {
        let (server, _) = server().await;
        assert_rejected(server.get("/protected").await, "Authorization header required").await;
    }

    #[tokio::test]
    async fn test_header_without_bearer_prefix() {
        let (server, state) = server().await;
        let (token, _) = register_and_login(&state, "alice", "Secret1!").await;

        let response = server.get("/protected").add_header("authorization", format!("Token {token}")).await;
        assert_rejected(response, "Bearer token required").await;

        let response = server.get("/protected").add_header("authorization", token).await;
        assert_rejected(response, "Bearer token required").await;
    }

    #[tokio::test]
    async fn test_invalid_and_expired_tokens_share_a_message() {
        let (server, state) = server().await;
        let (_, user) = register_and_login(&state, "alice", "Secret1!").await;

        let expired = state.auth.tokens().issue_with_ttl(&user, Duration::seconds(-1)).unwrap();
        assert_rejected(server.get("/protected").add_header("authorization", format!("Bearer {expired}")).await, "Invalid or expired token").await;
        assert_rejected(server.get("/protected").add_header("authorization", "Bearer garbage").await, "Invalid or expired token").await;
    }

    #[tokio::test]
    async fn test_valid_token_attaches_identity() {
        let (server, state) = server().await;
        let (token, user) = register_and_login(&state, "alice", "Secret1!").await;

        let response = server.get("/protected").add_header("authorization", format!("Bearer {token}")).await;
        response.assert_status_ok();
        let identity: CurrentUser = response.json();
        assert_eq!(identity, user);
    }

    #[test]
    fn test_extract_bearer_token() {
        let mut headers = HeaderMap::new();
        assert!(extract_bearer_token(&headers).is_err());

        headers.insert(AUTHORIZATION, "Bearer abc.def.ghi".parse().unwrap());
        assert_eq!(extract_bearer_token(&headers).unwrap(), "abc.def.ghi");

        headers.insert(AUTHORIZATION, "bearer abc.def.ghi".parse().unwrap());
        assert!(extract_bearer_token(&headers).is_err());
    }
}
