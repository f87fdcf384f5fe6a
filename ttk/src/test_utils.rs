//! Test utilities: in-memory repositories and ready-made application state.
//!
//! [`InMemoryStore`] backs every repository trait with shared [`DashMap`]s, so service and
//! handler tests run without Postgres. It mimics the storage behaviour the services rely on:
//! unique logins, the task assignee foreign key, and newest-first listing.

use std::sync::{
    Arc,
    atomic::{AtomicBool, AtomicU64, Ordering},
};

use axum_test::TestServer;
use chrono::Utc;
use dashmap::DashMap;
use uuid::Uuid;

use crate::{
    AppState, Repositories,
    api::models::users::{CurrentUser, Role},
    auth::{password::Argon2Params, service::PasswordPolicy},
    config::Config,
    db::{
        errors::{DbError, Result},
        handlers::{ArticleRepository, HistoryRepository, ListFilter, Repository, TaskRepository, UserRepository},
        models::{
            articles::{ArticleCreateDBRequest, ArticleDBResponse, ArticleUpdateDBRequest},
            history::{HistoryCreateDBRequest, HistoryDBResponse},
            tasks::{TaskCreateDBRequest, TaskDBResponse, TaskUpdateDBRequest},
            users::{UserCreateDBRequest, UserDBResponse, UserUpdateDBRequest},
        },
    },
    types::{ArticleId, TaskId, UserId},
};

/// Cheap Argon2 cost for tests
pub const FAST_ARGON2: Argon2Params = Argon2Params {
    memory_kib: 1024,
    iterations: 1,
    parallelism: 1,
};

/// Rows carry an insertion sequence so listings are stable even when timestamps tie
type Rows<K, V> = DashMap<K, (u64, V)>;

#[derive(Default)]
struct Tables {
    users: Rows<UserId, UserDBResponse>,
    articles: Rows<ArticleId, ArticleDBResponse>,
    tasks: Rows<TaskId, TaskDBResponse>,
    history: Rows<Uuid, HistoryDBResponse>,
    seq: AtomicU64,
    fail_writes: AtomicBool,
    fail_history_writes: AtomicBool,
}

impl Tables {
    fn next_seq(&self) -> u64 {
        self.seq.fetch_add(1, Ordering::SeqCst)
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DbError::Other(anyhow::anyhow!("simulated storage failure")));
        }
        Ok(())
    }

    fn display_name(&self, id: UserId) -> Option<String> {
        self.users.get(&id).map(|row| row.1.display_name.clone())
    }
}

fn page<K, V: Clone>(rows: &Rows<K, V>, filter: &ListFilter) -> Vec<V>
where
    K: Eq + std::hash::Hash,
{
    let mut all: Vec<(u64, V)> = rows.iter().map(|row| row.value().clone()).collect();
    all.sort_by(|a, b| b.0.cmp(&a.0));
    all.into_iter()
        .skip(filter.skip.max(0) as usize)
        .take(filter.limit.max(0) as usize)
        .map(|(_, v)| v)
        .collect()
}

/// Shared in-memory storage; clones see the same data
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<Tables>,
}

impl InMemoryStore {
    pub fn users(&self) -> Arc<dyn UserRepository> {
        Arc::new(MemUsers(self.tables.clone()))
    }

    pub fn articles(&self) -> Arc<dyn ArticleRepository> {
        Arc::new(MemArticles(self.tables.clone()))
    }

    pub fn tasks(&self) -> Arc<dyn TaskRepository> {
        Arc::new(MemTasks(self.tables.clone()))
    }

    pub fn history(&self) -> Arc<dyn HistoryRepository> {
        Arc::new(MemHistory(self.tables.clone()))
    }

    /// Make every write fail with [`DbError::Other`]
    pub fn fail_writes(&self, fail: bool) {
        self.tables.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make only history writes fail
    pub fn fail_history_writes(&self, fail: bool) {
        self.tables.fail_history_writes.store(fail, Ordering::SeqCst);
    }

    pub fn repositories(&self) -> Repositories {
        Repositories {
            users: self.users(),
            articles: self.articles(),
            tasks: self.tasks(),
            history: self.history(),
        }
    }
}

struct MemUsers(Arc<Tables>);
struct MemArticles(Arc<Tables>);
struct MemTasks(Arc<Tables>);
struct MemHistory(Arc<Tables>);

#[async_trait::async_trait]
impl Repository for MemUsers {
    type CreateRequest = UserCreateDBRequest;
    type UpdateRequest = UserUpdateDBRequest;
    type Response = UserDBResponse;
    type Id = UserId;
    type Filter = ListFilter;

    async fn create(&self, request: &Self::CreateRequest) -> Result<Self::Response> {
        self.0.check_writable()?;
        if self.0.users.iter().any(|row| row.1.login == request.login) {
            return Err(DbError::UniqueViolation {
                constraint: Some("users_login_key".to_string()),
                table: Some("users".to_string()),
                message: "duplicate key value violates unique constraint \"users_login_key\"".to_string(),
            });
        }

        let user = UserDBResponse {
            id: Uuid::new_v4(),
            login: request.login.clone(),
            display_name: request.display_name.clone(),
            password_hash: request.password_hash.clone(),
            role: request.role,
            created_at: Utc::now(),
        };
        self.0.users.insert(user.id, (self.0.next_seq(), user.clone()));
        Ok(user)
    }

    async fn get_by_id(&self, id: Self::Id) -> Result<Option<Self::Response>> {
        Ok(self.0.users.get(&id).map(|row| row.1.clone()))
    }

    async fn list(&self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        Ok(page(&self.0.users, filter))
    }

    async fn count(&self) -> Result<i64> {
        Ok(self.0.users.len() as i64)
    }

    async fn delete(&self, id: Self::Id) -> Result<bool> {
        self.0.check_writable()?;
        Ok(self.0.users.remove(&id).is_some())
    }

    async fn update(&self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        self.0.check_writable()?;
        let mut row = self.0.users.get_mut(&id).ok_or(DbError::NotFound)?;
        let user = &mut row.1;
        if let Some(display_name) = &request.display_name {
            user.display_name = display_name.clone();
        }
        if let Some(role) = request.role {
            user.role = role;
        }
        if let Some(password_hash) = &request.password_hash {
            user.password_hash = password_hash.clone();
        }
        Ok(user.clone())
    }
}

#[async_trait::async_trait]
impl UserRepository for MemUsers {
    async fn get_by_login(&self, login: &str) -> Result<Option<UserDBResponse>> {
        Ok(self.0.users.iter().find(|row| row.1.login == login).map(|row| row.1.clone()))
    }
}

#[async_trait::async_trait]
impl Repository for MemArticles {
    type CreateRequest = ArticleCreateDBRequest;
    type UpdateRequest = ArticleUpdateDBRequest;
    type Response = ArticleDBResponse;
    type Id = ArticleId;
    type Filter = ListFilter;

    async fn create(&self, request: &Self::CreateRequest) -> Result<Self::Response> {
        self.0.check_writable()?;
        let now = Utc::now();
        let article = ArticleDBResponse {
            id: Uuid::new_v4(),
            title: request.title.clone(),
            image: request.image.clone(),
            content: request.content.clone(),
            created_by: request.created_by,
            last_editor_name: request.last_editor_name.clone(),
            created_at: now,
            updated_at: now,
        };
        self.0.articles.insert(article.id, (self.0.next_seq(), article.clone()));
        Ok(article)
    }

    async fn get_by_id(&self, id: Self::Id) -> Result<Option<Self::Response>> {
        Ok(self.0.articles.get(&id).map(|row| row.1.clone()))
    }

    async fn list(&self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        Ok(page(&self.0.articles, filter))
    }

    async fn count(&self) -> Result<i64> {
        Ok(self.0.articles.len() as i64)
    }

    async fn delete(&self, id: Self::Id) -> Result<bool> {
        self.0.check_writable()?;
        Ok(self.0.articles.remove(&id).is_some())
    }

    async fn update(&self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        self.0.check_writable()?;
        let mut row = self.0.articles.get_mut(&id).ok_or(DbError::NotFound)?;
        let article = &mut row.1;
        article.title = request.title.clone();
        article.image = request.image.clone();
        article.content = request.content.clone();
        article.last_editor_name = request.last_editor_name.clone();
        article.updated_at = Utc::now();
        Ok(article.clone())
    }
}

impl MemTasks {
    fn assignee_name(&self, assignee_id: UserId) -> Result<String> {
        self.0.display_name(assignee_id).ok_or_else(|| DbError::ForeignKeyViolation {
            constraint: Some("tasks_assignee_id_fkey".to_string()),
            table: Some("tasks".to_string()),
            message: "insert or update on table \"tasks\" violates foreign key constraint".to_string(),
        })
    }

    /// Refresh the joined assignee name, as the SQL join would
    fn joined(&self, mut task: TaskDBResponse) -> TaskDBResponse {
        if let Some(name) = self.0.display_name(task.assignee_id) {
            task.assignee_name = name;
        }
        task
    }
}

#[async_trait::async_trait]
impl Repository for MemTasks {
    type CreateRequest = TaskCreateDBRequest;
    type UpdateRequest = TaskUpdateDBRequest;
    type Response = TaskDBResponse;
    type Id = TaskId;
    type Filter = ListFilter;

    async fn create(&self, request: &Self::CreateRequest) -> Result<Self::Response> {
        self.0.check_writable()?;
        let assignee_name = self.assignee_name(request.assignee_id)?;
        let task = TaskDBResponse {
            id: Uuid::new_v4(),
            title: request.title.clone(),
            content: request.content.clone(),
            image: request.image.clone(),
            created_by: request.created_by,
            assignee_id: request.assignee_id,
            assignee_name,
            planned_at: request.planned_at,
            priority: request.priority,
            status: request.status,
            created_at: Utc::now(),
        };
        self.0.tasks.insert(task.id, (self.0.next_seq(), task.clone()));
        Ok(task)
    }

    async fn get_by_id(&self, id: Self::Id) -> Result<Option<Self::Response>> {
        let task = self.0.tasks.get(&id).map(|row| row.1.clone());
        Ok(task.map(|t| self.joined(t)))
    }

    async fn list(&self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        Ok(page(&self.0.tasks, filter).into_iter().map(|t| self.joined(t)).collect())
    }

    async fn count(&self) -> Result<i64> {
        Ok(self.0.tasks.len() as i64)
    }

    async fn delete(&self, id: Self::Id) -> Result<bool> {
        self.0.check_writable()?;
        Ok(self.0.tasks.remove(&id).is_some())
    }

    async fn update(&self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        self.0.check_writable()?;
        let assignee_name = self.assignee_name(request.assignee_id)?;
        let mut row = self.0.tasks.get_mut(&id).ok_or(DbError::NotFound)?;
        let task = &mut row.1;
        task.title = request.title.clone();
        task.content = request.content.clone();
        task.image = request.image.clone();
        task.assignee_id = request.assignee_id;
        task.assignee_name = assignee_name;
        task.planned_at = request.planned_at;
        task.priority = request.priority;
        task.status = request.status;
        Ok(task.clone())
    }
}

#[async_trait::async_trait]
impl HistoryRepository for MemHistory {
    async fn record(&self, request: &HistoryCreateDBRequest) -> Result<HistoryDBResponse> {
        self.0.check_writable()?;
        if self.0.fail_history_writes.load(Ordering::SeqCst) {
            return Err(DbError::Other(anyhow::anyhow!("simulated history failure")));
        }

        let entry = HistoryDBResponse {
            id: Uuid::new_v4(),
            article_id: request.article_id,
            user_id: request.user_id,
            article_title: request.article_title.clone(),
            event: request.event,
            changed_at: Utc::now(),
        };
        self.0.history.insert(entry.id, (self.0.next_seq(), entry.clone()));
        Ok(entry)
    }

    async fn list(&self, filter: &ListFilter) -> Result<Vec<HistoryDBResponse>> {
        Ok(page(&self.0.history, filter))
    }

    async fn count(&self) -> Result<i64> {
        Ok(self.0.history.len() as i64)
    }
}

pub fn test_password_policy() -> PasswordPolicy {
    PasswordPolicy {
        min_length: 8,
        max_length: 64,
        argon2: FAST_ARGON2,
    }
}

pub fn create_test_config() -> Config {
    let mut config = Config {
        secret_key: Some("test-secret-key-for-testing-only".to_string()),
        ..Default::default()
    };
    config.auth.password.argon2_memory_kib = FAST_ARGON2.memory_kib;
    config.auth.password.argon2_iterations = FAST_ARGON2.iterations;
    config.auth.password.argon2_parallelism = FAST_ARGON2.parallelism;
    config
}

/// Application state over a fresh in-memory store
pub fn create_test_state() -> AppState {
    create_test_state_with(&InMemoryStore::default(), create_test_config())
}

pub fn create_test_state_with(store: &InMemoryStore, config: Config) -> AppState {
    AppState::from_repositories(config, store.repositories()).expect("Failed to build test state")
}

/// Full router, without a database, wrapped in a test server
pub fn create_test_server(state: &AppState) -> TestServer {
    let router = crate::build_router(state).expect("Failed to build router");
    TestServer::new(router).expect("Failed to create test server")
}

/// Register a user through the auth service and log them in
pub async fn register_and_login(state: &AppState, login: &str, password: &str) -> (String, CurrentUser) {
    let display_name = login.to_uppercase();
    state
        .auth
        .register(login, &display_name, password)
        .await
        .expect("Failed to register test user");
    let outcome = state.auth.login(login, password).await.expect("Failed to log in test user");
    let user = CurrentUser::from(&outcome.user);
    (outcome.token, user)
}

/// Insert a user directly, skipping password hashing
pub async fn insert_user(store: &InMemoryStore, login: &str) -> CurrentUser {
    let user = store
        .users()
        .create(&UserCreateDBRequest {
            login: login.to_string(),
            display_name: login.to_uppercase(),
            password_hash: "not-a-real-hash".to_string(),
            role: Role::User,
        })
        .await
        .expect("Failed to insert test user");
    CurrentUser::from(&user)
}

pub async fn promote(store: &InMemoryStore, id: UserId) {
    let update = UserUpdateDBRequest {
        role: Some(Role::Admin),
        ..Default::default()
    };
    store.users().update(id, &update).await.expect("Failed to promote test user");
}
