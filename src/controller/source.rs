//! Where the controller gets its pages from.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::query::{FilterOptions, PageRequest, QueryDescription, ResultPage};
use crate::dto::api::{AdvocatesQuery, AdvocatesResponse};
use crate::repository::AdvocateReader;
use crate::services::advocates::{load_filter_options, search_advocates};

/// Why a fetch produced no page. None of these are fatal to the controller.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(String),

    #[error("server responded with status {0}")]
    Status(u16),

    #[error("record store failure: {0}")]
    Store(String),

    #[error("request timed out after {0:?}")]
    Timeout(Duration),

    #[error("controller is shut down")]
    Closed,
}

#[async_trait]
pub trait AdvocateSource: Send + Sync {
    /// One page of matches for `query`, with the total across all pages.
    async fn fetch_page(
        &self,
        query: &QueryDescription,
        page: PageRequest,
    ) -> Result<ResultPage, FetchError>;

    /// Selector options over the whole directory.
    async fn fetch_filter_options(&self) -> Result<FilterOptions, FetchError>;
}

/// Talks to `GET /api/advocates` on a running directory server.
#[derive(Debug, Clone)]
pub struct HttpAdvocateSource {
    client: reqwest::Client,
    base_url: String,
}

impl HttpAdvocateSource {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn get_bytes(&self, request: reqwest::RequestBuilder) -> Result<Vec<u8>, FetchError> {
        let response = request
            .send()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?;
        Ok(body.to_vec())
    }
}

/// Decodes a page payload. Anything unreadable counts as zero results.
fn decode_page(body: &[u8]) -> ResultPage {
    match serde_json::from_slice::<AdvocatesResponse>(body) {
        Ok(response) => response.into(),
        Err(err) => {
            log::warn!("Malformed advocates payload, treating as empty: {err}");
            ResultPage::empty()
        }
    }
}

#[async_trait]
impl AdvocateSource for HttpAdvocateSource {
    async fn fetch_page(
        &self,
        query: &QueryDescription,
        page: PageRequest,
    ) -> Result<ResultPage, FetchError> {
        let params = AdvocatesQuery::from_parts(query, page);
        let request = self.client.get(self.url("/api/advocates")).query(&params);
        let body = self.get_bytes(request).await?;
        Ok(decode_page(&body))
    }

    async fn fetch_filter_options(&self) -> Result<FilterOptions, FetchError> {
        let request = self.client.get(self.url("/api/advocates/filters"));
        let body = self.get_bytes(request).await?;
        serde_json::from_slice(&body).map_err(|e| FetchError::Transport(e.to_string()))
    }
}

/// Queries a record store in-process, off the async runtime.
pub struct RepositorySource<R> {
    repo: Arc<R>,
}

impl<R> RepositorySource<R> {
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl<R> AdvocateSource for RepositorySource<R>
where
    R: AdvocateReader + Send + Sync + 'static,
{
    async fn fetch_page(
        &self,
        query: &QueryDescription,
        page: PageRequest,
    ) -> Result<ResultPage, FetchError> {
        let repo = Arc::clone(&self.repo);
        let query = query.clone();

        tokio::task::spawn_blocking(move || search_advocates(repo.as_ref(), &query, page))
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?
            .map_err(|e| FetchError::Store(e.to_string()))
    }

    async fn fetch_filter_options(&self) -> Result<FilterOptions, FetchError> {
        let repo = Arc::clone(&self.repo);

        tokio::task::spawn_blocking(move || load_filter_options(repo.as_ref()))
            .await
            .map_err(|e| FetchError::Transport(e.to_string()))?
            .map_err(|e| FetchError::Store(e.to_string()))
    }
}
