use crate::protocol::{
    bulk_payload, bulk_results, outcome_from, BulkResponse, ErrorResponse, IndexResponse,
};
use async_trait::async_trait;
use graphsync_api::{DispatchError, Document, SearchIndexClient, UpsertOutcome};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Response, Url};
use thiserror::Error;
use tracing::{debug, warn};

/// Connection settings for the document store.
#[derive(Debug, Clone)]
pub struct ElasticsearchConfig {
    /// Base URL of the server, e.g. `http://localhost:9200`.
    pub url: String,
    /// API key sent as `Authorization: ApiKey <key>`.
    pub api_key: Option<String>,
}

impl ElasticsearchConfig {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            api_key: None,
        }
    }

    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

/// The configured endpoint cannot be used to reach a document store.
#[derive(Debug, Error)]
#[error("invalid Elasticsearch endpoint {url:?}: {reason}")]
pub struct InvalidEndpointError {
    url: String,
    reason: String,
}

/// [SearchIndexClient] implementation over the store's REST API.
///
/// The client performs no retries: dispatch failures are the caller's to log,
/// and a miss is repaired by the next change batch or a full re-index.
pub struct ElasticsearchClient {
    http: reqwest::Client,
    base: Url,
}

impl ElasticsearchClient {
    pub fn new(config: ElasticsearchConfig) -> Result<Self, InvalidEndpointError> {
        let invalid = |reason: String| InvalidEndpointError {
            url: config.url.clone(),
            reason,
        };

        let base = Url::parse(&config.url).map_err(|e| invalid(e.to_string()))?;
        if base.cannot_be_a_base() {
            return Err(invalid("not a base URL".to_owned()));
        }

        let mut headers = HeaderMap::new();
        if let Some(api_key) = &config.api_key {
            let value = HeaderValue::from_str(&format!("ApiKey {api_key}"))
                .map_err(|e| invalid(e.to_string()))?;
            headers.insert(AUTHORIZATION, value);
        }

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| invalid(e.to_string()))?;

        debug!("connecting to Elasticsearch at {base}");
        Ok(Self { http, base })
    }

    fn join(&self, path: &str) -> Result<Url, DispatchError> {
        self.base.join(path).map_err(DispatchError::transport)
    }
}

#[async_trait]
impl SearchIndexClient for ElasticsearchClient {
    async fn upsert(
        &self,
        index: &str,
        id: &str,
        body: &Document,
    ) -> Result<UpsertOutcome, DispatchError> {
        let url = self.join(&format!("{index}/_doc/{id}"))?;
        debug!("sending document {id} to index {index}");

        let response = self
            .http
            .put(url)
            .json(body)
            .send()
            .await
            .map_err(DispatchError::transport)?;

        if !response.status().is_success() {
            return Err(rejection(response).await);
        }
        let decoded: IndexResponse = response.json().await.map_err(DispatchError::transport)?;
        Ok(outcome_from(&decoded.result))
    }

    async fn bulk_upsert(
        &self,
        index: &str,
        documents: &[(String, Document)],
    ) -> Result<Vec<Result<UpsertOutcome, DispatchError>>, DispatchError> {
        if documents.is_empty() {
            return Ok(Vec::new());
        }
        let url = self.join("_bulk")?;
        debug!("sending {} documents to index {index}", documents.len());

        let response = self
            .http
            .post(url)
            .header(CONTENT_TYPE, "application/x-ndjson")
            .body(bulk_payload(index, documents))
            .send()
            .await
            .map_err(DispatchError::transport)?;

        if !response.status().is_success() {
            return Err(rejection(response).await);
        }
        let decoded: BulkResponse = response.json().await.map_err(DispatchError::transport)?;
        if decoded.errors {
            warn!("bulk request to index {index} reported per-document errors");
        }

        let results = bulk_results(decoded);
        if results.len() != documents.len() {
            warn!(
                "bulk response for index {index} reported {} items for {} documents",
                results.len(),
                documents.len()
            );
        }
        Ok(results)
    }
}

/// Turns a non-success response into the store-reported failure, falling back
/// to the HTTP status when the body is not the structured error format.
async fn rejection(response: Response) -> DispatchError {
    let status = response.status();
    match response.json::<ErrorResponse>().await {
        Ok(body) => body.error.into(),
        Err(_) => DispatchError::Rejected {
            kind: status.to_string(),
            reason: String::new(),
        },
    }
}
