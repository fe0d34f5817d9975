//! HTTP query engine adapter
//!
//! Each lookup is a `POST {base_url}/search/{source}` with a JSON body of
//! `{ "query": ..., "limit": ..., <params> }`. Responses follow the contract
//! parsed by [`parse_engine_response`].

use super::error::EngineError;
use super::response::parse_engine_response;
use crate::config::FileEngineConfig;
use async_trait::async_trait;
use serde_json::{Map, Value};
use snaxel_application::{LookupOptions, ProviderError, SourceProvider};
use snaxel_domain::{ResultItem, Source};
use std::time::Duration;
use tracing::debug;

/// Query engine reached over HTTP
pub struct HttpQueryEngine {
    client: reqwest::Client,
    base_url: String,
}

impl HttpQueryEngine {
    pub fn new(config: &FileEngineConfig) -> Result<Self, EngineError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, source: Source) -> String {
        format!("{}/search/{}", self.base_url, source.as_str())
    }
}

fn request_body(query: &str, options: &LookupOptions) -> Value {
    let mut body = Map::new();
    for (key, value) in &options.params {
        body.insert(key.clone(), Value::String(value.clone()));
    }
    body.insert("query".to_string(), Value::String(query.to_string()));
    body.insert("limit".to_string(), Value::from(options.limit));
    Value::Object(body)
}

fn transport_error(error: reqwest::Error) -> ProviderError {
    if error.is_timeout() {
        ProviderError::Timeout
    } else if error.is_connect() {
        ProviderError::Unavailable(error.to_string())
    } else {
        ProviderError::RequestFailed(error.to_string())
    }
}

#[async_trait]
impl SourceProvider for HttpQueryEngine {
    async fn lookup(
        &self,
        source: Source,
        query: &str,
        options: &LookupOptions,
    ) -> Result<Vec<ResultItem>, ProviderError> {
        let url = self.endpoint(source);
        debug!("POST {} (limit {})", url, options.limit);

        let response = self
            .client
            .post(&url)
            .json(&request_body(query, options))
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;

        if !status.is_success() {
            return Err(match parse_engine_response(&body) {
                Err(ProviderError::RequestFailed(message)) => ProviderError::RequestFailed(message),
                _ => ProviderError::RequestFailed(format!("engine returned HTTP {}", status)),
            });
        }

        let mut items = parse_engine_response(&body)?;
        items.truncate(options.limit);
        Ok(items)
    }
}
