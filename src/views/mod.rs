//! Listing and post pipelines
//!
//! Turns fetched posts into template view data and rendered pages. The
//! server runs these per request; the generator runs them once per output
//! file.

use anyhow::Result;

use crate::config::SiteConfig;
use crate::content::collection::{distinct_categories, filter_by_category, related_posts, search};
use crate::content::metadata::{estimate_reading_time, format_published_date};
use crate::content::{ContentSource, MarkdownRenderer, Post};
use crate::helpers::{escape_html, highlight_search_term, post_url, share_links, truncate};
use crate::pagination::{paginate, ListingLinks, ListingQuery, Paginator};
use crate::templates::{
    CategoryLink, ListingPage, NavPost, NotFoundPage, PostCard, PostPage, SiteData,
    TemplateRenderer,
};

const NO_RESULTS: &str = "검색 결과가 없습니다.";
const NO_POSTS: &str = "아직 게시된 글이 없습니다.";
const META_DESCRIPTION_LENGTH: usize = 160;

/// Filters and page requested for a listing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ListingRequest<'a> {
    pub search: Option<&'a str>,
    pub category: Option<&'a str>,
    pub page: usize,
}

impl<'a> From<&'a ListingQuery> for ListingRequest<'a> {
    fn from(query: &'a ListingQuery) -> Self {
        Self {
            search: query.search_term(),
            category: query.active_category(),
            page: query.page_number(),
        }
    }
}

/// Outcome of rendering a post request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rendered {
    Found(String),
    NotFound(String),
}

/// Renders pages for one site
pub struct Views {
    config: SiteConfig,
    site: SiteData,
    templates: TemplateRenderer,
    markdown: MarkdownRenderer,
}

impl Views {
    pub fn new(config: &SiteConfig) -> Result<Self> {
        Ok(Self {
            config: config.clone(),
            site: SiteData::from_config(config),
            templates: TemplateRenderer::new()?,
            markdown: MarkdownRenderer::with_options(&config.highlight_theme, false),
        })
    }

    pub fn config(&self) -> &SiteConfig {
        &self.config
    }

    /// Fetch, filter, paginate and render the listing for a query string
    pub async fn listing(&self, source: &ContentSource, query: &ListingQuery) -> Result<String> {
        let posts = source.fetch_published_posts().await;
        let page = self.listing_page(&posts, &ListingRequest::from(query), query, true);
        self.render_listing(&page)
    }

    /// Fetch and render one post; unknown slugs render the not found page
    pub async fn post(&self, source: &ContentSource, slug: &str) -> Result<Rendered> {
        let Some(post) = source.fetch_post_by_slug(slug).await else {
            tracing::debug!("Post not found: {}", slug);
            return Ok(Rendered::NotFound(self.render_not_found(&NotFoundPage::post_missing())?));
        };

        let (posts, body) = tokio::join!(
            source.fetch_published_posts(),
            source.fetch_post_body(&post.id)
        );

        let page = self.post_page(&post, &posts, &body)?;
        Ok(Rendered::Found(self.render_post(&page)?))
    }

    /// Search, then category filter, then paginate
    pub fn listing_page(
        &self,
        posts: &[Post],
        request: &ListingRequest<'_>,
        links: &dyn ListingLinks,
        search_enabled: bool,
    ) -> ListingPage {
        let mut matching = match request.search {
            Some(term) => search(posts, term),
            None => posts.to_vec(),
        };
        if let Some(category) = request.category {
            matching = filter_by_category(&matching, category);
        }

        let window = paginate(&matching, request.page, self.config.per_page);

        let categories = distinct_categories(posts)
            .into_iter()
            .map(|name| CategoryLink {
                href: links.category_href(Some(&name)),
                active: request.category == Some(name.as_str()),
                name,
            })
            .collect();

        let filtered = request.search.is_some() || request.category.is_some();

        ListingPage {
            meta_title: request.category.map(str::to_string),
            posts: window
                .items
                .iter()
                .map(|post| post_card(post, request.search))
                .collect(),
            categories,
            all_categories_href: links.category_href(None),
            active_category: request.category.map(str::to_string),
            search_term: request.search.map(str::to_string),
            search_enabled,
            total_posts: window.total_items,
            current_page: window.page,
            total_pages: window.total_pages,
            paginator: Paginator::new(window.page, window.total_pages, links),
            empty_message: if filtered { NO_RESULTS } else { NO_POSTS },
        }
    }

    /// View data for one post; `posts` is the published collection, newest first
    pub fn post_page(&self, post: &Post, posts: &[Post], body_markdown: &str) -> Result<PostPage> {
        let canonical_url = post_url(&self.config, &post.slug);
        let nav = |p: &Post| NavPost {
            title: p.title.clone(),
            href: p.path(),
        };

        Ok(PostPage {
            meta_title: Some(post.title.clone()),
            meta_description: truncate(
                post.summary.as_deref().unwrap_or(&post.title),
                META_DESCRIPTION_LENGTH,
                None,
            ),
            share_links: share_links(&post.title, &canonical_url),
            canonical_url,
            post: post_card(post, None),
            date_display: format_published_date(post, &self.config.date_format),
            body_html: self.markdown.render(body_markdown)?,
            reading_time: estimate_reading_time(body_markdown),
            related: related_posts(posts, post, self.config.related_limit)
                .iter()
                .map(|p| post_card(p, None))
                .collect(),
            prev: post.prev(posts).map(nav),
            next: post.next(posts).map(nav),
        })
    }

    pub fn render_listing(&self, page: &ListingPage) -> Result<String> {
        self.templates.render_listing(&self.site, page)
    }

    pub fn render_post(&self, page: &PostPage) -> Result<String> {
        self.templates.render_post(&self.site, page)
    }

    pub fn render_not_found(&self, page: &NotFoundPage) -> Result<String> {
        self.templates.render_not_found(&self.site, page)
    }
}

/// Card data for a post, highlighting `term` when searching
fn post_card(post: &Post, term: Option<&str>) -> PostCard {
    let mark = |text: &str| match term {
        Some(term) => highlight_search_term(text, term),
        None => escape_html(text),
    };

    PostCard {
        title: post.title.clone(),
        title_html: mark(&post.title),
        summary: post.summary.clone(),
        summary_html: post.summary.as_deref().map(mark),
        slug: post.slug.clone(),
        href: post.path(),
        category: post.category.clone(),
        thumbnail: post.thumbnail.clone(),
        date: post.published_date.clone(),
    }
}
