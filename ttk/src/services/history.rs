//! Optional change log for article mutations.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::{
    api::models::{history::HistoryEvent, pagination::Pagination},
    db::{
        handlers::{HistoryRepository, ListFilter},
        models::history::{HistoryCreateDBRequest, HistoryDBResponse},
    },
    errors::Result,
    types::{ArticleId, UserId, abbrev_uuid},
};

#[derive(Clone)]
pub struct HistoryService {
    repo: Arc<dyn HistoryRepository>,
    enabled: bool,
}

impl HistoryService {
    pub fn new(repo: Arc<dyn HistoryRepository>, enabled: bool) -> Self {
        Self { repo, enabled }
    }

    /// Record an article event when history is enabled.
    ///
    /// Best effort: a storage failure is logged and swallowed, the mutation that triggered it
    /// has already happened.
    pub async fn record(&self, article_id: ArticleId, user_id: UserId, event: HistoryEvent, article_title: &str) {
        if !self.enabled {
            return;
        }

        let request = HistoryCreateDBRequest {
            article_id,
            user_id,
            article_title: article_title.to_string(),
            event,
        };
        match self.repo.record(&request).await {
            Ok(_) => debug!(article_id = %abbrev_uuid(&article_id), ?event, "Recorded article history"),
            Err(e) => warn!(article_id = %abbrev_uuid(&article_id), ?event, "Failed to record article history: {e}"),
        }
    }

    pub async fn list(&self, pagination: &Pagination) -> Result<(Vec<HistoryDBResponse>, i64)> {
        let filter = ListFilter::new(pagination.skip(), pagination.limit());
        let entries = self.repo.list(&filter).await?;
        let total = self.repo.count().await?;
        Ok((entries, total))
    }
}
