//! Trending search bookkeeping.
//!
//! A trending store counts how often a search term produced results and keeps
//! the poster of the first result that term ever returned.

use crate::models::{MovieSummary, TrendingEntry};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Document store returned {status}: {message}")]
    Remote { status: u16, message: String },

    #[error("Document store transport error: {0}")]
    Transport(String),

    #[error("Database error: {0}")]
    Database(String),

    #[error("Malformed store payload: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for StoreError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

impl From<sea_orm::DbErr> for StoreError {
    fn from(err: sea_orm::DbErr) -> Self {
        Self::Database(err.to_string())
    }
}

/// # Examples
///
/// ```rust,ignore
/// use reelscout::services::{StoreError, TrendingStore};
/// use std::sync::Arc;
///
/// async fn example(store: Arc<dyn TrendingStore>) -> Result<(), StoreError> {
///     let top = store.top_entries(5).await?;
///     assert!(top.len() <= 5);
///     Ok(())
/// }
/// ```
#[async_trait::async_trait]
pub trait TrendingStore: Send + Sync {
    /// Increments the count for `term`, creating the entry with a count of one
    /// and `representative`'s poster if it does not exist yet. The stored
    /// poster is never replaced.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the lookup or the write fails.
    async fn record_search(
        &self,
        term: &str,
        representative: &MovieSummary,
    ) -> Result<(), StoreError>;

    /// Entries ordered by count descending, at most `limit` of them.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the store cannot be read.
    async fn top_entries(&self, limit: u64) -> Result<Vec<TrendingEntry>, StoreError>;
}
