use crate::entities::{prelude::*, trending_searches};
use anyhow::Result;
use sea_orm::sea_query::{Expr, OnConflict};
use sea_orm::{
    ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, QuerySelect, Set,
};

/// Repository for trending search counters
pub struct TrendingRepository {
    conn: DatabaseConnection,
}

impl TrendingRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Inserts `term` with a count of one, or bumps the existing row's count.
    /// On conflict only `count` and `updated_at` change, so the first poster sticks.
    pub async fn increment(
        &self,
        term: &str,
        movie_id: i64,
        poster_url: Option<String>,
    ) -> Result<()> {
        let now = chrono::Utc::now().to_rfc3339();

        let active_model = trending_searches::ActiveModel {
            search_term: Set(term.to_string()),
            count: Set(1),
            movie_id: Set(Some(movie_id)),
            poster_url: Set(poster_url),
            created_at: Set(now.clone()),
            updated_at: Set(now.clone()),
            ..Default::default()
        };

        TrendingSearches::insert(active_model)
            .on_conflict(
                OnConflict::column(trending_searches::Column::SearchTerm)
                    .value(
                        trending_searches::Column::Count,
                        Expr::col(trending_searches::Column::Count).add(1),
                    )
                    .value(trending_searches::Column::UpdatedAt, Expr::value(now))
                    .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await?;

        Ok(())
    }

    pub async fn get(&self, term: &str) -> Result<Option<trending_searches::Model>> {
        let row = TrendingSearches::find()
            .filter(trending_searches::Column::SearchTerm.eq(term))
            .one(&self.conn)
            .await?;
        Ok(row)
    }

    pub async fn top(&self, limit: u64) -> Result<Vec<trending_searches::Model>> {
        let rows = TrendingSearches::find()
            .order_by_desc(trending_searches::Column::Count)
            .limit(limit)
            .all(&self.conn)
            .await?;
        Ok(rows)
    }
}
