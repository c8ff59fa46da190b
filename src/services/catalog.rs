//! Movie catalog abstraction used by the search controller.

use crate::models::MovieSummary;
use thiserror::Error;

/// Message shown when the catalog reports a failure without saying why.
pub const DEFAULT_API_ERROR_MESSAGE: &str = "Error fetching movies";

/// Message shown for network, status and parse failures.
pub const TRANSPORT_ERROR_MESSAGE: &str = "Error fetching movies. Please try again later.";

#[derive(Debug, Error)]
pub enum FetchError {
    /// The request did not complete, returned a non-success status, or the
    /// body could not be decoded.
    #[error("Catalog transport error: {0}")]
    Transport(String),

    /// The request succeeded but the payload itself reports a failure.
    #[error("Catalog reported an error: {}", .0.as_deref().unwrap_or(DEFAULT_API_ERROR_MESSAGE))]
    ApiReported(Option<String>),
}

impl FetchError {
    pub fn transport(msg: impl Into<String>) -> Self {
        Self::Transport(msg.into())
    }

    /// The text the presentation layer displays for this failure.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Transport(_) => TRANSPORT_ERROR_MESSAGE.to_string(),
            Self::ApiReported(Some(msg)) if !msg.is_empty() => msg.clone(),
            Self::ApiReported(_) => DEFAULT_API_ERROR_MESSAGE.to_string(),
        }
    }
}

impl From<reqwest::Error> for FetchError {
    fn from(err: reqwest::Error) -> Self {
        Self::Transport(err.to_string())
    }
}

/// Source of movie summaries.
///
/// An empty query means "discover popular movies"; anything else is a title
/// search.
#[async_trait::async_trait]
pub trait MovieCatalog: Send + Sync {
    /// # Errors
    ///
    /// - [`FetchError::Transport`] when the call fails or the payload is malformed
    /// - [`FetchError::ApiReported`] when the payload flags a logical failure
    async fn search(&self, query: &str) -> Result<Vec<MovieSummary>, FetchError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_message_prefers_reported_text() {
        let err = FetchError::ApiReported(Some("Movie not found!".to_string()));
        assert_eq!(err.user_message(), "Movie not found!");
    }

    #[test]
    fn user_message_falls_back_to_defaults() {
        assert_eq!(
            FetchError::ApiReported(None).user_message(),
            DEFAULT_API_ERROR_MESSAGE
        );
        assert_eq!(
            FetchError::ApiReported(Some(String::new())).user_message(),
            DEFAULT_API_ERROR_MESSAGE
        );
        assert_eq!(
            FetchError::transport("connection refused").user_message(),
            TRANSPORT_ERROR_MESSAGE
        );
    }
}
