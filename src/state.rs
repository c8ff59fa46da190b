use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use crate::clients::appwrite::AppwriteClient;
use crate::clients::tmdb::TmdbClient;
use crate::config::{Config, TrendingBackend};
use crate::db::Store;
use crate::services::{
    AppwriteTrendingStore, MovieCatalog, SeaOrmTrendingStore, SearchController, SearchHandle,
    SearchSettings, TrendingStore,
};

/// Build a shared HTTP client with reasonable defaults for API calls.
/// Reused by the catalog and the document store clients so they share a
/// connection pool.
fn build_shared_http_client(timeout_seconds: u64) -> anyhow::Result<reqwest::Client> {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(timeout_seconds))
        .user_agent(concat!("reelscout/", env!("CARGO_PKG_VERSION")))
        .pool_max_idle_per_host(10)
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build shared HTTP client: {e}"))
}

#[derive(Clone)]
pub struct SharedState {
    pub config: Arc<Config>,

    pub catalog: Arc<dyn MovieCatalog>,

    pub trending: Arc<dyn TrendingStore>,

    pub search: SearchHandle,
}

impl SharedState {
    /// Builds the clients named by `config` and starts a search controller.
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        Self::with_settings(config.clone(), SearchSettings::from(&config)).await
    }

    pub async fn with_settings(config: Config, settings: SearchSettings) -> anyhow::Result<Self> {
        let (catalog, trending) = build_clients(&config).await?;
        Ok(Self::from_parts(config, catalog, trending, settings))
    }

    /// Assembles state from already-built collaborators.
    pub fn from_parts(
        config: Config,
        catalog: Arc<dyn MovieCatalog>,
        trending: Arc<dyn TrendingStore>,
        settings: SearchSettings,
    ) -> Self {
        let search = SearchController::spawn(Arc::clone(&catalog), Arc::clone(&trending), settings);

        Self {
            config: Arc::new(config),
            catalog,
            trending,
            search,
        }
    }
}

/// Builds the catalog client and the trending store selected by `config`.
pub async fn build_clients(
    config: &Config,
) -> anyhow::Result<(Arc<dyn MovieCatalog>, Arc<dyn TrendingStore>)> {
    let http_client = build_shared_http_client(config.catalog.request_timeout_seconds)?;

    let catalog: Arc<dyn MovieCatalog> = Arc::new(TmdbClient::with_shared_client(
        http_client.clone(),
        &config.catalog,
    ));

    let trending = build_trending_store(config, http_client).await?;

    Ok((catalog, trending))
}

async fn build_trending_store(
    config: &Config,
    http_client: reqwest::Client,
) -> anyhow::Result<Arc<dyn TrendingStore>> {
    let image_base_url = config.catalog.image_base_url.clone();

    let store: Arc<dyn TrendingStore> = match config.trending.backend {
        TrendingBackend::Appwrite => {
            let aw = &config.trending.appwrite;
            info!(
                endpoint = %aw.endpoint,
                collection = %aw.collection_id,
                "Using Appwrite trending store"
            );
            let client = AppwriteClient::with_shared_client(http_client, aw);
            Arc::new(AppwriteTrendingStore::new(client, image_base_url))
        }
        TrendingBackend::Sqlite => {
            info!(database = %config.trending.database_path, "Using SQLite trending store");
            let store = Store::new(&config.trending.database_path)
                .await
                .context("Failed to open trending database")?;
            Arc::new(SeaOrmTrendingStore::new(store, image_base_url))
        }
    };

    Ok(store)
}
