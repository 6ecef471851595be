//! Notion API access
//!
//! The transport is hidden behind [`NotionApi`] so the content adapter can be
//! driven by [`NotionClient`] in production and by a canned double in tests.

mod client;
pub mod markdown;
mod model;
mod query;

#[cfg(test)]
pub(crate) mod mock;

use async_trait::async_trait;
use thiserror::Error;

pub use client::NotionClient;
pub use model::{Annotations, Block, BlockChildren, Page, QueryResponse, RichText};
pub use query::{Condition, DatabaseQuery, Direction, Filter, PropertyFilter, Sort, MAX_PAGE_SIZE};

/// Errors raised while talking to the Notion API
#[derive(Error, Debug)]
pub enum NotionError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Notion API error {status} ({code}): {message}")]
    Api {
        status: u16,
        code: String,
        message: String,
    },

    #[error("Failed to decode Notion response: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("Missing Notion credentials: {0}")]
    MissingCredentials(&'static str),
}

pub type Result<T> = std::result::Result<T, NotionError>;

/// The subset of the Notion REST API the blog needs
#[async_trait]
pub trait NotionApi: Send + Sync {
    /// `POST /databases/{id}/query`, one page of results
    async fn query_database(&self, database_id: &str, query: &DatabaseQuery)
        -> Result<QueryResponse>;

    /// `GET /blocks/{id}/children`, one page of results
    async fn list_block_children(
        &self,
        block_id: &str,
        start_cursor: Option<&str>,
    ) -> Result<BlockChildren>;
}
