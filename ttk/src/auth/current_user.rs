use axum::{extract::FromRequestParts, http::request::Parts};
use tracing::{instrument, trace};

use crate::{AppState, api::models::users::CurrentUser, auth::middleware::authenticate, errors::Result};

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = crate::errors::Error;

    #[instrument(skip(parts, state))]
    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self> {
        // Routes behind bearer_auth_middleware already carry the verified identity
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            trace!("Using identity attached by middleware");
            return Ok(user.clone());
        }

        authenticate(&parts.headers, &state.auth)
    }
}
