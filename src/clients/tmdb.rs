use crate::config::CatalogConfig;
use crate::models::MovieSummary;
use crate::services::catalog::{FetchError, MovieCatalog};
use reqwest::Client;
use serde::Deserialize;
use std::time::Instant;
use tracing::{debug, warn};

/// Envelope shared by `/discover/movie` and `/search/movie`.
///
/// Besides TMDB's own `success`/`status_message` failure shape, the
/// `response: "False"` / `error` shape used by OMDb-compatible proxies is
/// honoured as well.
#[derive(Debug, Deserialize)]
struct CatalogEnvelope {
    #[serde(default)]
    results: Option<Vec<MovieSummary>>,
    #[serde(default)]
    response: Option<serde_json::Value>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    success: Option<bool>,
    #[serde(default)]
    status_message: Option<String>,
}

impl CatalogEnvelope {
    fn into_results(self) -> Result<Vec<MovieSummary>, FetchError> {
        let reported_false =
            matches!(&self.response, Some(serde_json::Value::String(s)) if s == "False");

        if reported_false {
            return Err(FetchError::ApiReported(self.error));
        }

        if self.success == Some(false) {
            return Err(FetchError::ApiReported(self.status_message.or(self.error)));
        }

        Ok(self.results.unwrap_or_default())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogEndpoint {
    Discover,
    Search,
}

impl CatalogEndpoint {
    #[must_use]
    pub const fn for_query(query: &str) -> Self {
        if query.is_empty() {
            Self::Discover
        } else {
            Self::Search
        }
    }

    const fn label(self) -> &'static str {
        match self {
            Self::Discover => "discover",
            Self::Search => "search",
        }
    }
}

#[derive(Clone)]
pub struct TmdbClient {
    client: Client,
    base_url: String,
    api_token: String,
}

impl TmdbClient {
    pub fn new(config: &CatalogConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_seconds))
            .user_agent(concat!("reelscout/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self::with_shared_client(client, config)
    }

    pub fn with_shared_client(client: Client, config: &CatalogConfig) -> Self {
        Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_token: config.api_token.clone(),
        }
    }

    /// URL for a query: discover-by-popularity when empty, title search otherwise.
    #[must_use]
    pub fn endpoint_url(&self, query: &str) -> String {
        match CatalogEndpoint::for_query(query) {
            CatalogEndpoint::Discover => {
                format!("{}/discover/movie?sort_by=popularity.desc", self.base_url)
            }
            CatalogEndpoint::Search => format!(
                "{}/search/movie?query={}",
                self.base_url,
                urlencoding::encode(query)
            ),
        }
    }

    async fn fetch(&self, query: &str) -> Result<Vec<MovieSummary>, FetchError> {
        let url = self.endpoint_url(query);
        debug!(url = %url, "Requesting catalog");

        let response = self
            .client
            .get(&url)
            .header(reqwest::header::ACCEPT, "application/json")
            .bearer_auth(&self.api_token)
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(FetchError::transport(format!(
                "TMDB API error: {status} - {body}"
            )));
        }

        let bytes = response.bytes().await?;
        let envelope: CatalogEnvelope = serde_json::from_slice(&bytes)
            .map_err(|e| FetchError::transport(format!("Malformed catalog payload: {e}")))?;

        envelope.into_results()
    }
}

#[async_trait::async_trait]
impl MovieCatalog for TmdbClient {
    async fn search(&self, query: &str) -> Result<Vec<MovieSummary>, FetchError> {
        let endpoint = CatalogEndpoint::for_query(query);
        let start = Instant::now();

        let result = self.fetch(query).await;

        let outcome = match &result {
            Ok(_) => "success",
            Err(FetchError::ApiReported(_)) => "api_error",
            Err(FetchError::Transport(_)) => "transport_error",
        };
        let labels = [("endpoint", endpoint.label()), ("outcome", outcome)];
        metrics::counter!("catalog_requests_total", &labels).increment(1);
        metrics::histogram!("catalog_request_duration_seconds", "endpoint" => endpoint.label())
            .record(start.elapsed().as_secs_f64());

        match &result {
            Ok(movies) => debug!(query, count = movies.len(), "Catalog fetch finished"),
            Err(e) => warn!(query, error = %e, "Catalog fetch failed"),
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> TmdbClient {
        let config = CatalogConfig {
            base_url: "https://api.themoviedb.org/3/".to_string(),
            api_token: "token".to_string(),
            ..CatalogConfig::default()
        };
        TmdbClient::new(&config)
    }

    #[test]
    fn empty_query_routes_to_discover() {
        assert_eq!(
            client().endpoint_url(""),
            "https://api.themoviedb.org/3/discover/movie?sort_by=popularity.desc"
        );
    }

    #[test]
    fn query_routes_to_search_percent_encoded() {
        let c = client();
        assert_eq!(
            c.endpoint_url("batman"),
            "https://api.themoviedb.org/3/search/movie?query=batman"
        );
        assert_eq!(
            c.endpoint_url("star wars & co"),
            "https://api.themoviedb.org/3/search/movie?query=star%20wars%20%26%20co"
        );
    }

    #[test]
    fn whitespace_only_query_is_still_a_search() {
        assert_eq!(CatalogEndpoint::for_query(" "), CatalogEndpoint::Search);
    }

    #[test]
    fn envelope_with_response_false_is_api_reported() {
        let env: CatalogEnvelope =
            serde_json::from_str(r#"{"response":"False","error":"X"}"#).unwrap();
        match env.into_results() {
            Err(FetchError::ApiReported(Some(msg))) => assert_eq!(msg, "X"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn envelope_with_success_false_uses_status_message() {
        let env: CatalogEnvelope = serde_json::from_str(
            r#"{"success":false,"status_code":7,"status_message":"Invalid API key"}"#,
        )
        .unwrap();
        match env.into_results() {
            Err(FetchError::ApiReported(Some(msg))) => assert_eq!(msg, "Invalid API key"),
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn envelope_without_results_is_empty() {
        let env: CatalogEnvelope = serde_json::from_str(r#"{"page":1,"results":null}"#).unwrap();
        assert!(env.into_results().unwrap().is_empty());
    }
}
