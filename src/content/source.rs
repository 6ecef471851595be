//! Content source adapter over the Notion database
//!
//! Every `fetch_*` method is fail-open: transport, auth and schema failures
//! are logged and turned into an empty result, so a page can always render.
//! The `try_*` variants return the error instead.

use std::sync::Arc;

use super::Post;
use crate::config::{NotionConfig, PropertyNames};
use crate::notion::{self, markdown, DatabaseQuery, Filter, NotionApi, NotionClient, Sort};

/// Reads published posts from one Notion database
#[derive(Clone)]
pub struct ContentSource {
    api: Arc<dyn NotionApi>,
    database_id: String,
    properties: PropertyNames,
}

impl ContentSource {
    /// Create a source over an existing API client
    pub fn new(api: Arc<dyn NotionApi>, database_id: &str, properties: PropertyNames) -> Self {
        Self {
            api,
            database_id: database_id.to_string(),
            properties,
        }
    }

    /// Build the HTTP client from configuration
    pub fn from_config(config: &NotionConfig) -> notion::Result<Self> {
        if config.database_id.trim().is_empty() {
            return Err(notion::NotionError::MissingCredentials("NOTION_DATABASE_ID"));
        }
        let client = NotionClient::new(config)?;
        Ok(Self::new(
            Arc::new(client),
            &config.database_id,
            config.properties.clone(),
        ))
    }

    /// All published posts, newest first; empty on failure
    pub async fn fetch_published_posts(&self) -> Vec<Post> {
        match self.try_fetch_published_posts().await {
            Ok(posts) => posts,
            Err(e) => {
                tracing::error!("Error fetching blog posts: {}", e);
                Vec::new()
            }
        }
    }

    /// All published posts, newest first
    pub async fn try_fetch_published_posts(&self) -> notion::Result<Vec<Post>> {
        let query = DatabaseQuery::new()
            .filter(Filter::checkbox(&self.properties.published, true))
            .sort(Sort::descending(&self.properties.published_date))
            .page_size(notion::MAX_PAGE_SIZE);

        let mut posts = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let response = self
                .api
                .query_database(&self.database_id, &query.with_cursor(cursor.take()))
                .await?;
            posts.extend(
                response
                    .results
                    .iter()
                    .map(|page| Post::from_page(page, &self.properties)),
            );
            match response.next_cursor {
                Some(next) if response.has_more => cursor = Some(next),
                _ => break,
            }
        }

        tracing::debug!("Fetched {} published posts", posts.len());
        Ok(posts)
    }

    /// The published post with `slug`
    ///
    /// Returns `None` both when no post matches and when the query fails;
    /// use [`ContentSource::try_fetch_post_by_slug`] to tell them apart.
    pub async fn fetch_post_by_slug(&self, slug: &str) -> Option<Post> {
        match self.try_fetch_post_by_slug(slug).await {
            Ok(post) => post,
            Err(e) => {
                tracing::error!("Error fetching blog post by slug {:?}: {}", slug, e);
                None
            }
        }
    }

    /// The published post with `slug`, `Ok(None)` when there is none
    pub async fn try_fetch_post_by_slug(&self, slug: &str) -> notion::Result<Option<Post>> {
        let query = DatabaseQuery::new().filter(Filter::and(vec![
            Filter::rich_text_equals(&self.properties.slug, slug),
            Filter::checkbox(&self.properties.published, true),
        ]));

        let response = self.api.query_database(&self.database_id, &query).await?;
        Ok(response
            .results
            .first()
            .map(|page| Post::from_page(page, &self.properties)))
    }

    /// Body of a post as markdown; empty on failure
    pub async fn fetch_post_body(&self, id: &str) -> String {
        match markdown::page_to_markdown(self.api.as_ref(), id).await {
            Ok(body) => body,
            Err(e) => {
                tracing::error!("Error converting page {} to markdown: {}", id, e);
                String::new()
            }
        }
    }

    /// Slugs of all published posts
    pub async fn fetch_all_slugs(&self) -> Vec<String> {
        self.fetch_published_posts()
            .await
            .into_iter()
            .map(|post| post.slug)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notion::mock::{block, plain, MockNotionApi, PageSpec};
    use serde_json::json;

    fn source(api: MockNotionApi) -> ContentSource {
        ContentSource::new(Arc::new(api), "db", PropertyNames::default())
    }

    fn sample_pages() -> Vec<PageSpec> {
        vec![
            PageSpec::published("1", "Old", "old").date("2023-01-01"),
            PageSpec::published("2", "New", "new").date("2024-06-01").category("Tech"),
            PageSpec::published("3", "Hidden", "hidden").date("2024-07-01").draft(),
            PageSpec::published("4", "Middle", "middle").date("2024-01-01"),
        ]
    }

    #[tokio::test]
    async fn test_fetch_published_posts_newest_first() {
        let posts = source(MockNotionApi::new().with_pages(sample_pages()))
            .fetch_published_posts()
            .await;

        let slugs: Vec<_> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["new", "middle", "old"]);
        assert_eq!(posts[0].category.as_deref(), Some("Tech"));
    }

    #[tokio::test]
    async fn test_fetch_published_posts_sends_filter_and_sort() {
        let api = Arc::new(MockNotionApi::new().with_pages(sample_pages()));
        let source = ContentSource::new(api.clone(), "db", PropertyNames::default());
        source.fetch_published_posts().await;

        let queries = api.queries();
        assert_eq!(queries.len(), 1);
        assert_eq!(queries[0].filter, Some(Filter::checkbox("Published", true)));
        assert_eq!(queries[0].sorts, vec![Sort::descending("Published Date")]);
    }

    #[tokio::test]
    async fn test_fetch_published_posts_follows_cursor() {
        let pages = (0..150)
            .map(|_| PageSpec::published("x", "Same", "same").date("2024-01-01"))
            .collect();
        let api = Arc::new(MockNotionApi::new().with_pages(pages));
        let source = ContentSource::new(api.clone(), "db", PropertyNames::default());

        let posts = source.fetch_published_posts().await;
        assert_eq!(posts.len(), 150);

        let queries = api.queries();
        assert_eq!(queries.len(), 2);
        assert_eq!(queries[1].start_cursor.as_deref(), Some("100"));
    }

    #[tokio::test]
    async fn test_transport_failure_yields_empty_list() {
        let source = source(MockNotionApi::new().with_pages(sample_pages()).failing());
        assert!(source.fetch_published_posts().await.is_empty());
        assert!(source.try_fetch_published_posts().await.is_err());
        assert!(source.fetch_all_slugs().await.is_empty());
    }

    #[tokio::test]
    async fn test_fetch_post_by_slug() {
        let source = source(MockNotionApi::new().with_pages(sample_pages()));

        let post = source.fetch_post_by_slug("new").await.unwrap();
        assert_eq!(post.title, "New");

        assert!(source.fetch_post_by_slug("missing").await.is_none());
        // drafts are never returned
        assert!(source.fetch_post_by_slug("hidden").await.is_none());
    }

    #[tokio::test]
    async fn test_slug_lookup_distinguishes_failure_when_asked() {
        let ok = source(MockNotionApi::new().with_pages(sample_pages()));
        assert!(matches!(ok.try_fetch_post_by_slug("missing").await, Ok(None)));

        let broken = source(MockNotionApi::new().with_pages(sample_pages()).failing());
        assert!(broken.fetch_post_by_slug("new").await.is_none());
        assert!(broken.try_fetch_post_by_slug("new").await.is_err());
    }

    #[tokio::test]
    async fn test_fetch_post_body() {
        let api = MockNotionApi::new().with_blocks(
            "2",
            vec![block("p", "paragraph", json!({ "rich_text": plain("Hello Notion") }))],
        );
        assert_eq!(source(api).fetch_post_body("2").await, "Hello Notion");

        let broken = source(MockNotionApi::new().failing());
        assert_eq!(broken.fetch_post_body("2").await, "");
    }

    #[test]
    fn test_from_config_requires_database_id() {
        let config = NotionConfig {
            api_key: "secret".to_string(),
            ..NotionConfig::default()
        };
        assert!(ContentSource::from_config(&config).is_err());

        let config = NotionConfig {
            database_id: "db".to_string(),
            ..config
        };
        assert!(ContentSource::from_config(&config).is_ok());
    }
}
