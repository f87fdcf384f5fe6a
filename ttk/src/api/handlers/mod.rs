//! HTTP request handlers, one module per resource.
//!
//! - [`auth`]: registration and login (public)
//! - [`users`]: profiles and role changes
//! - [`articles`]: article CRUD with ownership checks
//! - [`tasks`]: task CRUD with ownership checks
//! - [`history`]: the article change log
//!
//! Everything except `auth` sits behind
//! [`bearer_auth_middleware`](crate::auth::middleware::bearer_auth_middleware), and handlers
//! receive the caller as a [`CurrentUser`](crate::api::models::users::CurrentUser) extractor.
//! Body, query and path rejections are converted to the JSON error shape via `?`.

pub mod articles;
pub mod auth;
pub mod history;
pub mod tasks;
pub mod users;
