//! HTTP implementation of the comment backend.

use log::debug;

use super::CommentBackend;
use super::api::{CommentsResponse, IntervalsResponse};
use crate::OverlayError;
use crate::time::Timestamp;

/// Comment backend over the query-parameterized HTTP API.
#[derive(Debug, Clone)]
pub struct HttpCommentBackend {
    base_url: String,
    client: reqwest::Client,
}

impl HttpCommentBackend {
    /// Create a backend against the given base URL (no trailing slash).
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Create a backend reusing an existing client.
    #[must_use]
    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        Self {
            base_url: base_url.into(),
            client,
        }
    }

    /// The configured base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn range_query(queries: &[String], start: Timestamp, end: Timestamp) -> Vec<(String, String)> {
        queries
            .iter()
            .map(|query| ("channel".to_owned(), query.clone()))
            .chain([
                ("start".to_owned(), start.value().to_string()),
                ("end".to_owned(), end.value().to_string()),
            ])
            .collect()
    }
}

impl CommentBackend for HttpCommentBackend {
    async fn intervals(
        &self,
        queries: &[String],
        start: Timestamp,
        end: Timestamp,
    ) -> crate::Result<IntervalsResponse> {
        let url = format!("{}/intervals", self.base_url);
        debug!("GET {url} [{}, {})", start.value(), end.value());
        let response: IntervalsResponse = self
            .client
            .get(&url)
            .query(&Self::range_query(queries, start, end))
            .query(&[("bucket", "1m"), ("fill", "1")])
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        if response.status == "ok" {
            Ok(response)
        } else {
            Err(OverlayError::Status(response.status))
        }
    }

    async fn comments(
        &self,
        queries: &[String],
        start: Timestamp,
        end: Timestamp,
    ) -> crate::Result<CommentsResponse> {
        let url = format!("{}/comments", self.base_url);
        debug!("GET {url} [{}, {})", start.value(), end.value());
        let response: CommentsResponse = self
            .client
            .get(&url)
            .query(&Self::range_query(queries, start, end))
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;
        if response.status == "ok" {
            Ok(response)
        } else {
            Err(OverlayError::Status(response.status))
        }
    }
}
