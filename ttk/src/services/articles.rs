//! Article operations.

use std::sync::Arc;
use tracing::instrument;

use crate::{
    api::models::{
        articles::{ArticleCreate, ArticleUpdate, validate_title},
        history::HistoryEvent,
        pagination::Pagination,
        users::CurrentUser,
    },
    auth::ownership::ensure_owner,
    db::{
        handlers::{ArticleRepository, ListFilter},
        models::articles::{ArticleCreateDBRequest, ArticleDBResponse, ArticleUpdateDBRequest},
    },
    errors::{Error, Result},
    services::history::HistoryService,
    types::{ArticleId, Operation, Resource, abbrev_uuid},
};

#[derive(Clone)]
pub struct ArticleService {
    articles: Arc<dyn ArticleRepository>,
    history: HistoryService,
}

fn not_found(id: ArticleId) -> Error {
    Error::NotFound {
        resource: "Article".to_string(),
        id: id.to_string(),
    }
}

impl ArticleService {
    pub fn new(articles: Arc<dyn ArticleRepository>, history: HistoryService) -> Self {
        Self { articles, history }
    }

    #[instrument(skip(self, user, request), fields(user_id = %abbrev_uuid(&user.id)), err)]
    pub async fn create(&self, user: &CurrentUser, request: ArticleCreate) -> Result<ArticleDBResponse> {
        let title = validate_title(&request.title)?;

        let article = self
            .articles
            .create(&ArticleCreateDBRequest {
                title,
                image: request.image,
                content: request.content,
                created_by: user.id,
                last_editor_name: user.display_name.clone(),
            })
            .await?;

        self.history.record(article.id, user.id, HistoryEvent::Create, &article.title).await;
        Ok(article)
    }

    pub async fn get(&self, id: ArticleId) -> Result<ArticleDBResponse> {
        self.articles.get_by_id(id).await?.ok_or_else(|| not_found(id))
    }

    pub async fn list(&self, pagination: &Pagination) -> Result<(Vec<ArticleDBResponse>, i64)> {
        let filter = ListFilter::new(pagination.skip(), pagination.limit());
        let articles = self.articles.list(&filter).await?;
        let total = self.articles.count().await?;
        Ok((articles, total))
    }

    /// Replace an article's content. Only its creator may do this.
    #[instrument(skip(self, user, request), fields(user_id = %abbrev_uuid(&user.id), article_id = %abbrev_uuid(&request.id)), err)]
    pub async fn update(&self, user: &CurrentUser, request: ArticleUpdate) -> Result<ArticleDBResponse> {
        let title = validate_title(&request.title)?;

        let existing = self.get(request.id).await?;
        ensure_owner(existing.created_by, user, Operation::Update, Resource::Articles)?;

        let article = self
            .articles
            .update(
                request.id,
                &ArticleUpdateDBRequest {
                    title,
                    image: request.image,
                    content: request.content,
                    last_editor_name: user.display_name.clone(),
                },
            )
            .await?;

        self.history.record(article.id, user.id, HistoryEvent::Changed, &article.title).await;
        Ok(article)
    }

    /// Delete an article. Only its creator may do this.
    #[instrument(skip(self, user), fields(user_id = %abbrev_uuid(&user.id), article_id = %abbrev_uuid(&id)), err)]
    pub async fn delete(&self, user: &CurrentUser, id: ArticleId) -> Result<()> {
        let existing = self.get(id).await?;
        ensure_owner(existing.created_by, user, Operation::Delete, Resource::Articles)?;

        if !self.articles.delete(id).await? {
            return Err(not_found(id));
        }

        self.history.record(id, user.id, HistoryEvent::Delete, &existing.title).await;
        Ok(())
    }
}
