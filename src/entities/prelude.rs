pub use super::trending_searches::Entity as TrendingSearches;
