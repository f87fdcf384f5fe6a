//! # ttk: collaborative articles and tasks
//!
//! `ttk` is a REST backend where registered users publish articles and track tasks. Every
//! article and task remembers who created it, and only that user may change or delete it. An
//! optional change log records each article mutation.
//!
//! ## Request flow
//!
//! `POST /api/v1/register` and `POST /api/v1/login` are public. Login returns a signed bearer
//! token carrying the user's id, login and display name. Every other `/api/v1` route passes
//! through [`auth::middleware::bearer_auth_middleware`], which rejects the request with 401 unless
//! it carries `Authorization: Bearer <token>` with a valid, unexpired token. Handlers then call a
//! service from [`services`], which applies ownership checks ([`auth::ownership`]) before
//! touching a repository from [`db::handlers`].
//!
//! ## Layout
//!
//! - [`api`]: HTTP handlers and request/response models
//! - [`auth`]: password hashing, tokens, the bearer gate and ownership checks
//! - [`services`]: business rules shared by handlers
//! - [`db`]: Postgres repositories behind async traits
//! - [`config`]: YAML + environment configuration via figment
//! - [`telemetry`]: tracing subscriber setup
//!
//! ## Running
//!
//! ```bash
//! TTK_SECRET_KEY=change-me DATABASE_URL=postgres://localhost/ttk ttk -f config.yaml
//! ```
//!
//! Migrations run on startup. When `admin_password` is configured, the `admin_login` account is
//! created (or has its password reset) with the `ADMIN` role.

pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod errors;
mod openapi;
pub mod services;
pub mod telemetry;
pub mod types;

#[cfg(test)]
pub mod test_utils;

use std::sync::Arc;

use axum::{
    Router,
    http::{HeaderValue, Method, header},
    middleware::from_fn_with_state,
    routing::{delete, get, post, put},
};
use bon::Builder;
use sqlx::{PgPool, postgres::PgPoolOptions};
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{Level, debug, info, instrument, warn};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

pub use config::Config;

use crate::{
    api::models::users::Role,
    auth::{
        middleware::bearer_auth_middleware,
        password::{self, Argon2Params},
        service::{AuthService, PasswordPolicy},
        token::TokenCodec,
    },
    config::CorsOrigin,
    db::{
        handlers::{
            ArticleHistory, ArticleRepository, Articles, HistoryRepository, Repository, TaskRepository, Tasks, UserRepository, Users,
        },
        models::users::{UserCreateDBRequest, UserUpdateDBRequest},
    },
    openapi::ApiDoc,
    services::{ArticleService, HistoryService, TaskService, UserService},
    types::UserId,
};

/// Application state shared across all request handlers.
///
/// Services hold their repositories as trait objects, so the state is cheap to clone per request.
#[derive(Clone, Builder)]
pub struct AppState {
    pub config: Config,
    pub auth: Arc<AuthService>,
    pub users: UserService,
    pub articles: ArticleService,
    pub tasks: TaskService,
    pub history: HistoryService,
}

/// The storage backends a state is assembled from
pub struct Repositories {
    pub users: Arc<dyn UserRepository>,
    pub articles: Arc<dyn ArticleRepository>,
    pub tasks: Arc<dyn TaskRepository>,
    pub history: Arc<dyn HistoryRepository>,
}

impl Repositories {
    pub fn postgres(pool: &PgPool) -> Self {
        Self {
            users: Arc::new(Users::new(pool.clone())),
            articles: Arc::new(Articles::new(pool.clone())),
            tasks: Arc::new(Tasks::new(pool.clone())),
            history: Arc::new(ArticleHistory::new(pool.clone())),
        }
    }
}

impl AppState {
    /// Wire services over the given repositories.
    ///
    /// Fails when no signing secret is configured.
    pub fn from_repositories(config: Config, repos: Repositories) -> anyhow::Result<Self> {
        let secret = config
            .secret_key
            .as_deref()
            .filter(|s| !s.is_empty())
            .ok_or_else(|| anyhow::anyhow!("secret_key is required to sign tokens"))?;
        let tokens = TokenCodec::new(secret, config.token_ttl());
        let auth = AuthService::new(repos.users.clone(), tokens, PasswordPolicy::from(&config.auth.password))?;
        let history = HistoryService::new(repos.history, config.history.enabled);

        Ok(AppState::builder()
            .auth(Arc::new(auth))
            .users(UserService::new(repos.users.clone()))
            .articles(ArticleService::new(repos.articles, history.clone()))
            .tasks(TaskService::new(repos.tasks, repos.users))
            .history(history)
            .config(config)
            .build())
    }
}

/// Get the ttk database migrator
pub fn migrator() -> sqlx::migrate::Migrator {
    sqlx::migrate!("./migrations")
}

/// Ensure the configured admin account exists with the `ADMIN` role.
///
/// An existing account is promoted and, when a password is given, has its password replaced.
/// A missing account is only created when a password is given. Returns the admin's ID, or
/// `None` when there was nothing to do.
#[instrument(skip(password, users, params))]
pub async fn create_initial_admin_user(
    login: &str,
    password: Option<&str>,
    users: &dyn UserRepository,
    params: Argon2Params,
) -> anyhow::Result<Option<UserId>> {
    let password_hash = match password {
        Some(pwd) => Some(password::hash_password_blocking(pwd.to_string(), params).await?),
        None => None,
    };

    if let Some(existing) = users.get_by_login(login).await? {
        let update = UserUpdateDBRequest {
            role: Some(Role::Admin),
            password_hash,
            ..Default::default()
        };
        users.update(existing.id, &update).await?;
        info!(user_id = %existing.id, "Ensured admin role on existing user");
        return Ok(Some(existing.id));
    }

    let Some(password_hash) = password_hash else {
        warn!("No admin_password configured, skipping admin creation");
        return Ok(None);
    };

    let created = users
        .create(&UserCreateDBRequest {
            login: login.to_string(),
            display_name: "Administrator".to_string(),
            password_hash,
            role: Role::Admin,
        })
        .await?;
    info!(user_id = %created.id, "Created initial admin user");
    Ok(Some(created.id))
}

fn create_cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let cors_config = &config.auth.security.cors;

    let allow_origin = if cors_config.allowed_origins.iter().any(|o| matches!(o, CorsOrigin::Wildcard)) {
        AllowOrigin::any()
    } else {
        let mut origins = Vec::new();
        for origin in &cors_config.allowed_origins {
            if let CorsOrigin::Url(url) = origin {
                origins.push(url.as_str().trim_end_matches('/').parse::<HeaderValue>()?);
            }
        }
        AllowOrigin::list(origins)
    };

    let mut cors = CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(cors_config.allow_credentials);

    if let Some(max_age) = cors_config.max_age {
        cors = cors.max_age(std::time::Duration::from_secs(max_age));
    }

    Ok(cors)
}

/// Build the application router.
///
/// - `/api/v1/register` and `/api/v1/login` are public
/// - every other `/api/v1` route requires a bearer token
/// - `/healthz` for liveness, `/docs` for the API reference
#[instrument(skip_all)]
pub fn build_router(state: &AppState) -> anyhow::Result<Router> {
    let public_routes = Router::new()
        .route("/register", post(api::handlers::auth::register))
        .route("/login", post(api::handlers::auth::login));

    let protected_routes = Router::new()
        // Users
        .route("/user/me", get(api::handlers::users::me))
        .route("/user/{id}", get(api::handlers::users::get_user))
        .route("/user/{id}/role", put(api::handlers::users::update_role))
        // Articles
        .route("/article/create", post(api::handlers::articles::create_article))
        .route("/article/show", get(api::handlers::articles::list_articles))
        .route("/article/update", post(api::handlers::articles::update_article))
        .route("/article/{id}", get(api::handlers::articles::get_article))
        .route("/article/{id}", delete(api::handlers::articles::delete_article))
        // Tasks
        .route("/task/create", post(api::handlers::tasks::create_task))
        .route("/task/show", get(api::handlers::tasks::list_tasks))
        .route("/task/update", post(api::handlers::tasks::update_task))
        .route("/task/{id}", get(api::handlers::tasks::get_task))
        .route("/task/{id}", delete(api::handlers::tasks::delete_task))
        // History
        .route("/history/articles", get(api::handlers::history::list_article_history))
        .route_layer(from_fn_with_state(state.clone(), bearer_auth_middleware));

    let router = Router::new()
        .route("/healthz", get(|| async { "OK" }))
        .nest("/api/v1", public_routes.merge(protected_routes))
        .with_state(state.clone())
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()));

    let cors_layer = create_cors_layer(&state.config)?;

    let router = router.layer(
        ServiceBuilder::new()
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                    .on_request(DefaultOnRequest::new().level(Level::INFO))
                    .on_response(DefaultOnResponse::new().level(Level::INFO)),
            )
            .layer(cors_layer),
    );

    Ok(router)
}

pub struct Application {
    router: Router,
    config: Config,
    pool: PgPool,
}

impl Application {
    /// Connect to Postgres, run migrations, seed the admin account and build the router
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        debug!("Starting ttk with configuration: {:#?}", config);

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.database_url)
            .await?;
        migrator().run(&pool).await?;

        let repos = Repositories::postgres(&pool);
        create_initial_admin_user(
            &config.admin_login,
            config.admin_password.as_deref(),
            repos.users.as_ref(),
            Argon2Params::from(&config.auth.password),
        )
        .await?;

        let state = AppState::from_repositories(config.clone(), repos)?;
        let router = build_router(&state)?;

        Ok(Self { router, config, pool })
    }

    /// Start serving the application
    pub async fn serve<F>(self, shutdown: F) -> anyhow::Result<()>
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let bind_addr = self.config.bind_address();
        let listener = TcpListener::bind(&bind_addr).await?;
        info!(
            "ttk listening on http://{}, API docs at http://localhost:{}/docs",
            bind_addr, self.config.port
        );

        axum::serve(listener, self.router).with_graceful_shutdown(shutdown).await?;

        info!("Closing database connections...");
        self.pool.close().await;

        Ok(())
    }
}
