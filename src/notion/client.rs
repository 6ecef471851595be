//! HTTP client for the Notion REST API

use async_trait::async_trait;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;

use super::{BlockChildren, DatabaseQuery, NotionApi, NotionError, QueryResponse, Result};
use crate::config::NotionConfig;

/// Notion API client, built once per process from configuration
pub struct NotionClient {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    api_version: String,
}

/// Error object returned by the API on non-2xx responses
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ApiErrorBody {
    code: String,
    message: String,
}

impl NotionClient {
    /// Create a new client
    pub fn new(config: &NotionConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            return Err(NotionError::MissingCredentials("NOTION_API_KEY"));
        }

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            api_version: config.api_version.clone(),
        })
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.client
            .request(method, format!("{}/{}", self.api_base, path))
            .bearer_auth(&self.api_key)
            .header("Notion-Version", &self.api_version)
    }

    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let error: ApiErrorBody = serde_json::from_str(&body).unwrap_or_default();
            return Err(NotionError::Api {
                status: status.as_u16(),
                code: error.code,
                message: error.message,
            });
        }

        Ok(serde_json::from_str(&body)?)
    }
}

#[async_trait]
impl NotionApi for NotionClient {
    async fn query_database(
        &self,
        database_id: &str,
        query: &DatabaseQuery,
    ) -> Result<QueryResponse> {
        tracing::debug!("Querying database {}", database_id);
        let request = self
            .request(Method::POST, &format!("databases/{}/query", database_id))
            .json(query);
        self.send(request).await
    }

    async fn list_block_children(
        &self,
        block_id: &str,
        start_cursor: Option<&str>,
    ) -> Result<BlockChildren> {
        tracing::debug!("Listing children of block {}", block_id);
        let mut request = self
            .request(Method::GET, &format!("blocks/{}/children", block_id))
            .query(&[("page_size", "100")]);
        if let Some(cursor) = start_cursor {
            request = request.query(&[("start_cursor", cursor)]);
        }
        self.send(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_api_key() {
        let config = NotionConfig::default();
        let err = NotionClient::new(&config).err().unwrap();
        assert!(matches!(err, NotionError::MissingCredentials("NOTION_API_KEY")));
    }

    #[test]
    fn test_api_base_is_normalized() {
        let config = NotionConfig {
            api_key: "secret".to_string(),
            api_base: "https://api.notion.com/v1/".to_string(),
            ..NotionConfig::default()
        };
        let client = NotionClient::new(&config).unwrap();
        assert_eq!(client.api_base, "https://api.notion.com/v1");
    }

    #[tokio::test]
    async fn test_unreachable_host_is_http_error() {
        let config = NotionConfig {
            api_key: "secret".to_string(),
            api_base: "http://127.0.0.1:9".to_string(),
            timeout_secs: 2,
            ..NotionConfig::default()
        };
        let client = NotionClient::new(&config).unwrap();
        let err = client
            .query_database("db", &DatabaseQuery::new())
            .await
            .err()
            .unwrap();
        assert!(matches!(err, NotionError::Http(_)));
    }
}
