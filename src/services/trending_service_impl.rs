use crate::db::{Store, TrendingRow};
use crate::domain::MovieId;
use crate::models::{MovieSummary, TrendingEntry};
use crate::services::trending_service::{StoreError, TrendingStore};

/// Trending store kept in the local SQLite database.
pub struct SeaOrmTrendingStore {
    store: Store,
    image_base_url: String,
}

impl SeaOrmTrendingStore {
    #[must_use]
    pub fn new(store: Store, image_base_url: impl Into<String>) -> Self {
        Self {
            store,
            image_base_url: image_base_url.into(),
        }
    }

    fn map_row(row: TrendingRow) -> TrendingEntry {
        TrendingEntry {
            id: row.id.to_string(),
            search_term: row.search_term,
            count: u64::try_from(row.count).unwrap_or(0),
            movie_id: row
                .movie_id
                .and_then(|id| u64::try_from(id).ok())
                .map(MovieId::new),
            poster_url: row.poster_url,
        }
    }
}

fn db_error(err: anyhow::Error) -> StoreError {
    StoreError::Database(err.to_string())
}

#[async_trait::async_trait]
impl TrendingStore for SeaOrmTrendingStore {
    async fn record_search(
        &self,
        term: &str,
        representative: &MovieSummary,
    ) -> Result<(), StoreError> {
        let movie_id = i64::try_from(representative.id.value()).map_err(|_| {
            StoreError::Decode(format!("movie id {} out of range", representative.id))
        })?;

        self.store
            .increment_trending(
                term,
                movie_id,
                representative.poster_url(&self.image_base_url),
            )
            .await
            .map_err(db_error)
    }

    async fn top_entries(&self, limit: u64) -> Result<Vec<TrendingEntry>, StoreError> {
        let rows = self.store.top_trending(limit).await.map_err(db_error)?;
        Ok(rows.into_iter().map(Self::map_row).collect())
    }
}
