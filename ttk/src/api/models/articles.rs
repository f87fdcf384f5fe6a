//! API request/response models for articles.

use crate::db::models::articles::ArticleDBResponse;
use crate::errors::Error;
use crate::types::{ArticleId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Minimum title length for articles and tasks
pub const MIN_TITLE_LENGTH: usize = 3;
/// Maximum title length for articles and tasks
pub const MAX_TITLE_LENGTH: usize = 50;

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ArticleCreate {
    pub title: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ArticleUpdate {
    #[schema(value_type = String, format = "uuid")]
    pub id: ArticleId,
    pub title: String,
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ArticleResponse {
    #[schema(value_type = String, format = "uuid")]
    pub id: ArticleId,
    pub title: String,
    pub image: String,
    pub content: String,
    #[schema(value_type = String, format = "uuid")]
    pub created_by: UserId,
    pub last_editor_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ArticleDBResponse> for ArticleResponse {
    fn from(db: ArticleDBResponse) -> Self {
        Self {
            id: db.id,
            title: db.title,
            image: db.image,
            content: db.content,
            created_by: db.created_by,
            last_editor_name: db.last_editor_name,
            created_at: db.created_at,
            updated_at: db.updated_at,
        }
    }
}

/// Trim a title and check its length, shared by articles and tasks.
///
/// Returns the trimmed title, which is what gets stored.
pub fn validate_title(title: &str) -> Result<String, Error> {
    let title = title.trim();
    let len = title.chars().count();
    if !(MIN_TITLE_LENGTH..=MAX_TITLE_LENGTH).contains(&len) {
        return Err(Error::BadRequest {
            message: format!("title: must be between {MIN_TITLE_LENGTH} and {MAX_TITLE_LENGTH} characters"),
        });
    }
    Ok(title.to_string())
}
