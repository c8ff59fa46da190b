pub mod catalog;
pub use catalog::{FetchError, MovieCatalog};

pub mod trending_service;
pub use trending_service::{StoreError, TrendingStore};

pub mod trending_service_impl;
pub use trending_service_impl::SeaOrmTrendingStore;

pub mod trending_appwrite;
pub use trending_appwrite::AppwriteTrendingStore;

pub mod search_controller;
pub use search_controller::{SearchController, SearchHandle, SearchSettings, SearchState};
