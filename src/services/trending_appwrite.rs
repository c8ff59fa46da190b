//! Trending store backed by an Appwrite collection.
//!
//! Collection attributes: `searchTerm` (string), `count` (integer),
//! `movie_id` (integer), `poster_url` (url).

use crate::clients::appwrite::{AppwriteClient, Query};
use crate::domain::MovieId;
use crate::models::{MovieSummary, TrendingEntry};
use crate::services::trending_service::{StoreError, TrendingStore};
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Deserialize)]
pub struct TrendingDocument {
    #[serde(rename = "$id")]
    pub id: String,
    #[serde(rename = "searchTerm")]
    pub search_term: String,
    #[serde(default)]
    pub count: u64,
    #[serde(default)]
    pub movie_id: Option<u64>,
    #[serde(default)]
    pub poster_url: Option<String>,
}

impl From<TrendingDocument> for TrendingEntry {
    fn from(doc: TrendingDocument) -> Self {
        Self {
            id: doc.id,
            search_term: doc.search_term,
            count: doc.count,
            movie_id: doc.movie_id.map(MovieId::new),
            poster_url: doc.poster_url,
        }
    }
}

#[derive(Serialize)]
struct NewTrendingDocument<'a> {
    #[serde(rename = "searchTerm")]
    search_term: &'a str,
    count: u64,
    movie_id: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    poster_url: Option<String>,
}

#[derive(Serialize)]
struct CountUpdate {
    count: u64,
}

pub struct AppwriteTrendingStore {
    client: AppwriteClient,
    image_base_url: String,
}

impl AppwriteTrendingStore {
    #[must_use]
    pub fn new(client: AppwriteClient, image_base_url: impl Into<String>) -> Self {
        Self {
            client,
            image_base_url: image_base_url.into(),
        }
    }
}

#[async_trait::async_trait]
impl TrendingStore for AppwriteTrendingStore {
    // Read-then-write: two concurrent records for one term may lose an increment.
    async fn record_search(
        &self,
        term: &str,
        representative: &MovieSummary,
    ) -> Result<(), StoreError> {
        let existing = self
            .client
            .list_documents::<TrendingDocument>(&[Query::equal("searchTerm", term)])
            .await?;

        if let Some(doc) = existing.documents.into_iter().next() {
            let count = doc.count.saturating_add(1);
            let _: TrendingDocument = self
                .client
                .update_document(&doc.id, &CountUpdate { count })
                .await?;
            debug!(term, count, document_id = %doc.id, "Incremented trending count");
        } else {
            let document_id = uuid::Uuid::new_v4().simple().to_string();
            let data = NewTrendingDocument {
                search_term: term,
                count: 1,
                movie_id: representative.id.value(),
                poster_url: representative.poster_url(&self.image_base_url),
            };
            let _: TrendingDocument = self.client.create_document(&document_id, &data).await?;
            debug!(term, document_id = %document_id, "Created trending entry");
        }

        Ok(())
    }

    async fn top_entries(&self, limit: u64) -> Result<Vec<TrendingEntry>, StoreError> {
        let list = self
            .client
            .list_documents::<TrendingDocument>(&[
                Query::limit(limit),
                Query::order_desc("count"),
            ])
            .await?;

        let mut entries: Vec<TrendingEntry> = list.documents.into_iter().map(Into::into).collect();
        entries.truncate(usize::try_from(limit).unwrap_or(usize::MAX));
        Ok(entries)
    }
}
