use async_trait::async_trait;
use reqwest::{Client, Method, StatusCode};
use serde::Deserialize;
use serde_json::{json, Value};
use thiserror::Error;
use url::Url;

use super::mapper::SearchHit;
use super::movie::Movie;
use super::query::SearchRequest;
use crate::config::SearchConfig;

#[derive(Debug, Error)]
pub enum IndexError {
    #[error("invalid search index URL: {0}")]
    InvalidUrl(String),

    #[error("{0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to encode document: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("search index returned {status}: {body}")]
    Status { status: StatusCode, body: String },
}

/// Document store holding the movie catalog.
#[async_trait]
pub trait SearchIndex: Send + Sync {
    /// Store a new document and return the id the index assigned.
    async fn index(&self, movie: &Movie) -> Result<String, IndexError>;

    async fn update(&self, id: &str, movie: &Movie) -> Result<(), IndexError>;

    async fn delete(&self, id: &str) -> Result<(), IndexError>;

    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchHit>, IndexError>;

    async fn ping(&self) -> Result<(), IndexError>;
}

/// Elasticsearch over its REST API.
pub struct ElasticIndex {
    client: Client,
    base_url: Url,
    index: String,
}

#[derive(Debug, Deserialize)]
struct IndexResponse {
    #[serde(rename = "_id")]
    id: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    hits: HitsEnvelope,
}

#[derive(Debug, Deserialize)]
struct HitsEnvelope {
    #[serde(default)]
    hits: Vec<RawHit>,
}

#[derive(Debug, Deserialize)]
struct RawHit {
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "_source", default)]
    source: Value,
}

impl ElasticIndex {
    pub fn new(config: &SearchConfig) -> Result<Self, IndexError> {
        let base_url = Url::parse(&config.elastic_url).map_err(|_| IndexError::InvalidUrl(config.elastic_url.clone()))?;
        if base_url.cannot_be_a_base() {
            return Err(IndexError::InvalidUrl(config.elastic_url.clone()));
        }
        Ok(Self {
            client: Client::new(),
            base_url,
            index: config.movie_index.clone(),
        })
    }

    /// `<base>/<index>/<segments...>` with every segment percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url, IndexError> {
        let mut url = self.base_url.clone();
        {
            let mut path = url
                .path_segments_mut()
                .map_err(|_| IndexError::InvalidUrl(self.base_url.to_string()))?;
            path.pop_if_empty().push(&self.index);
            path.extend(segments);
        }
        Ok(url)
    }

    async fn send(&self, method: Method, url: Url, body: Option<Value>) -> Result<reqwest::Response, IndexError> {
        tracing::debug!("{} {}", method, url);
        let mut request = self.client.request(method, url);
        if let Some(body) = body {
            request = request.json(&body);
        }
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(IndexError::Status { status, body });
        }
        Ok(response)
    }
}

#[async_trait]
impl SearchIndex for ElasticIndex {
    async fn index(&self, movie: &Movie) -> Result<String, IndexError> {
        let url = self.endpoint(&["_doc"])?;
        let body = serde_json::to_value(movie.document())?;
        let created: IndexResponse = self.send(Method::POST, url, Some(body)).await?.json().await?;
        Ok(created.id)
    }

    async fn update(&self, id: &str, movie: &Movie) -> Result<(), IndexError> {
        let url = self.endpoint(&["_update", id])?;
        let body = json!({ "doc": serde_json::to_value(movie.document())? });
        self.send(Method::POST, url, Some(body)).await?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), IndexError> {
        let url = self.endpoint(&["_doc", id])?;
        self.send(Method::DELETE, url, None).await?;
        Ok(())
    }

    async fn search(&self, request: &SearchRequest) -> Result<Vec<SearchHit>, IndexError> {
        let url = self.endpoint(&["_search"])?;
        let response: SearchResponse = self
            .send(Method::POST, url, Some(request.to_json()))
            .await?
            .json()
            .await?;
        Ok(response
            .hits
            .hits
            .into_iter()
            .map(|hit| SearchHit {
                id: hit.id,
                source: hit.source,
            })
            .collect())
    }

    async fn ping(&self) -> Result<(), IndexError> {
        self.send(Method::GET, self.base_url.clone(), None).await?;
        Ok(())
    }
}
