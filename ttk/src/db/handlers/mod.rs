//! Repository implementations for database access.
//!
//! Each entity has a repository trait (extending [`Repository`] where the entity supports full
//! CRUD) and a Postgres implementation holding a [`sqlx::PgPool`]:
//!
//! - [`Users`]: user accounts and credentials ([`UserRepository`])
//! - [`Articles`]: articles ([`ArticleRepository`])
//! - [`Tasks`]: tasks joined with their assignee ([`TaskRepository`])
//! - [`ArticleHistory`]: append-only article change log ([`HistoryRepository`])
//!
//! # Common Pattern
//!
//! ```ignore
//! use std::sync::Arc;
//! use ttk::db::handlers::{Repository, UserRepository, Users};
//!
//! async fn example(pool: sqlx::PgPool) -> Result<(), Box<dyn std::error::Error>> {
//!     let users: Arc<dyn UserRepository> = Arc::new(Users::new(pool));
//!     let alice = users.get_by_login("alice").await?;
//!     Ok(())
//! }
//! ```

pub mod articles;
pub mod history;
pub mod repository;
pub mod tasks;
pub mod users;

pub use articles::{ArticleRepository, Articles};
pub use history::{ArticleHistory, HistoryRepository};
pub use repository::{ListFilter, Repository};
pub use tasks::{TaskRepository, Tasks};
pub use users::{UserRepository, Users};
