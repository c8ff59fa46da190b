use crate::config::AppwriteConfig;
use crate::services::trending_service::StoreError;
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use url::Url;

/// A single entry of Appwrite's `queries[]` parameter.
#[derive(Debug, Clone, PartialEq)]
pub enum Query {
    Equal(String, Vec<Value>),
    OrderDesc(String),
    Limit(u64),
}

impl Query {
    pub fn equal(attribute: impl Into<String>, value: impl Into<Value>) -> Self {
        Self::Equal(attribute.into(), vec![value.into()])
    }

    pub fn order_desc(attribute: impl Into<String>) -> Self {
        Self::OrderDesc(attribute.into())
    }

    #[must_use]
    pub const fn limit(n: u64) -> Self {
        Self::Limit(n)
    }

    /// JSON encoding accepted by Appwrite 1.5+.
    #[must_use]
    pub fn to_json(&self) -> String {
        let value = match self {
            Self::Equal(attr, values) => {
                json!({ "method": "equal", "attribute": attr, "values": values })
            }
            Self::OrderDesc(attr) => json!({ "method": "orderDesc", "attribute": attr }),
            Self::Limit(n) => json!({ "method": "limit", "values": [n] }),
        };
        value.to_string()
    }
}

#[derive(Debug, Deserialize)]
pub struct DocumentList<T> {
    pub documents: Vec<T>,
}

#[derive(Debug, Deserialize)]
struct AppwriteErrorBody {
    #[serde(default)]
    message: String,
}

#[derive(Serialize)]
struct CreateDocument<'a, T> {
    #[serde(rename = "documentId")]
    document_id: &'a str,
    data: &'a T,
}

#[derive(Serialize)]
struct UpdateDocument<'a, T> {
    data: &'a T,
}

/// Minimal Appwrite Databases REST client bound to one collection.
#[derive(Clone)]
pub struct AppwriteClient {
    client: Client,
    endpoint: String,
    project_id: String,
    api_key: String,
    database_id: String,
    collection_id: String,
    timeout: std::time::Duration,
}

impl AppwriteClient {
    pub fn new(config: &AppwriteConfig) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(config.request_timeout_seconds))
            .user_agent(concat!("reelscout/", env!("CARGO_PKG_VERSION")))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self::with_shared_client(client, config)
    }

    pub fn with_shared_client(client: Client, config: &AppwriteConfig) -> Self {
        Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            project_id: config.project_id.clone(),
            api_key: config.api_key.clone(),
            database_id: config.database_id.clone(),
            collection_id: config.collection_id.clone(),
            timeout: std::time::Duration::from_secs(config.request_timeout_seconds),
        }
    }

    fn documents_url(&self) -> String {
        format!(
            "{}/databases/{}/collections/{}/documents",
            self.endpoint, self.database_id, self.collection_id
        )
    }

    fn authorize(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .timeout(self.timeout)
            .header("X-Appwrite-Project", &self.project_id)
            .header("X-Appwrite-Key", &self.api_key)
            .header(reqwest::header::ACCEPT, "application/json")
    }

    /// # Errors
    ///
    /// Returns [`StoreError`] on transport failure, a non-success status, or an
    /// undecodable body.
    pub async fn list_documents<T: DeserializeOwned>(
        &self,
        queries: &[Query],
    ) -> Result<DocumentList<T>, StoreError> {
        let mut url = Url::parse(&self.documents_url())
            .map_err(|e| StoreError::Transport(format!("Invalid Appwrite URL: {e}")))?;
        {
            let mut pairs = url.query_pairs_mut();
            for q in queries {
                pairs.append_pair("queries[]", &q.to_json());
            }
        }

        let response = self.authorize(self.client.get(url)).send().await?;
        Self::decode(response).await
    }

    /// # Errors
    ///
    /// See [`AppwriteClient::list_documents`].
    pub async fn create_document<D: Serialize + Sync, T: DeserializeOwned>(
        &self,
        document_id: &str,
        data: &D,
    ) -> Result<T, StoreError> {
        let body = CreateDocument { document_id, data };
        let response = self
            .authorize(self.client.post(self.documents_url()))
            .json(&body)
            .send()
            .await?;
        Self::decode(response).await
    }

    /// # Errors
    ///
    /// See [`AppwriteClient::list_documents`].
    pub async fn update_document<D: Serialize + Sync, T: DeserializeOwned>(
        &self,
        document_id: &str,
        data: &D,
    ) -> Result<T, StoreError> {
        let url = format!(
            "{}/{}",
            self.documents_url(),
            urlencoding::encode(document_id)
        );
        let body = UpdateDocument { data };
        let response = self
            .authorize(self.client.patch(url))
            .json(&body)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, StoreError> {
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            let message = serde_json::from_slice::<AppwriteErrorBody>(&bytes)
                .map(|b| b.message)
                .unwrap_or_else(|_| String::from_utf8_lossy(&bytes).into_owned());
            return Err(StoreError::Remote {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_slice(&bytes).map_err(|e| StoreError::Decode(e.to_string()))
    }
}
