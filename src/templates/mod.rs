//! Built-in templates using the Tera template engine
//!
//! Templates are embedded in the binary; view data structs below are what
//! they render.

use anyhow::{Context as _, Result};
use chrono::Datelike;
use serde::Serialize;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::config::SiteConfig;
use crate::helpers::{format_iso_date, ShareLink};
use crate::pagination::Paginator;

/// Template renderer with the embedded theme
pub struct TemplateRenderer {
    tera: Tera,
}

impl TemplateRenderer {
    /// Create a new renderer with all templates loaded
    pub fn new() -> Result<Self> {
        let mut tera = Tera::default();

        tera.add_raw_templates(vec![
            ("layout.html", include_str!("theme/layout.html")),
            ("index.html", include_str!("theme/index.html")),
            ("post.html", include_str!("theme/post.html")),
            ("not_found.html", include_str!("theme/not_found.html")),
            // Partials
            (
                "partials/head.html",
                include_str!("theme/partials/head.html"),
            ),
            (
                "partials/header.html",
                include_str!("theme/partials/header.html"),
            ),
            (
                "partials/footer.html",
                include_str!("theme/partials/footer.html"),
            ),
            (
                "partials/post_card.html",
                include_str!("theme/partials/post_card.html"),
            ),
            (
                "partials/pager.html",
                include_str!("theme/partials/pager.html"),
            ),
        ])?;

        tera.register_filter("date_format", date_format_filter);

        Ok(Self { tera })
    }

    /// Render a template with given context
    pub fn render(&self, template_name: &str, context: &Context) -> Result<String> {
        self.tera
            .render(template_name, context)
            .with_context(|| format!("Failed to render {}", template_name))
    }

    /// Render the post listing
    pub fn render_listing(&self, site: &SiteData, page: &ListingPage) -> Result<String> {
        self.render("index.html", &page_context(site, page))
    }

    /// Render a single post
    pub fn render_post(&self, site: &SiteData, page: &PostPage) -> Result<String> {
        self.render("post.html", &page_context(site, page))
    }

    /// Render the not found page
    pub fn render_not_found(&self, site: &SiteData, page: &NotFoundPage) -> Result<String> {
        self.render("not_found.html", &page_context(site, page))
    }
}

fn page_context<T: Serialize>(site: &SiteData, page: &T) -> Context {
    let mut context = Context::new();
    context.insert("site", site);
    context.insert("page", page);
    context
}

/// Tera filter: format an ISO date with a Moment.js-style format
fn date_format_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("date_format", "value", String, value);
    let format = match args.get("format") {
        Some(val) => tera::try_get_value!("date_format", "format", String, val),
        None => "YYYY-MM-DD".to_string(),
    };

    Ok(tera::Value::String(format_iso_date(&s, &format)))
}

/// Data structures for template context

#[derive(Debug, Clone, Serialize)]
pub struct SiteData {
    pub title: String,
    pub description: String,
    pub author: String,
    pub language: String,
    pub url: String,
    pub date_format: String,
    pub year: i32,
    pub version: &'static str,
}

impl SiteData {
    pub fn from_config(config: &SiteConfig) -> Self {
        Self {
            title: config.title.clone(),
            description: config.description.clone(),
            author: config.author.clone(),
            language: config.language.clone(),
            url: config.base_url().to_string(),
            date_format: config.date_format.clone(),
            year: chrono::Local::now().year(),
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

/// A post as shown in a list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PostCard {
    pub title: String,
    /// Title with the search term highlighted (HTML)
    pub title_html: String,
    pub summary: Option<String>,
    /// Summary with the search term highlighted (HTML)
    pub summary_html: Option<String>,
    pub slug: String,
    pub href: String,
    pub category: Option<String>,
    pub thumbnail: Option<String>,
    /// ISO publication date
    pub date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryLink {
    pub name: String,
    pub href: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NavPost {
    pub title: String,
    pub href: String,
}

/// The post listing page
#[derive(Debug, Clone, Serialize)]
pub struct ListingPage {
    pub meta_title: Option<String>,
    pub posts: Vec<PostCard>,
    pub categories: Vec<CategoryLink>,
    pub all_categories_href: String,
    pub active_category: Option<String>,
    pub search_term: Option<String>,
    pub search_enabled: bool,
    /// Number of posts matching the filters, across all pages
    pub total_posts: usize,
    pub current_page: usize,
    pub total_pages: usize,
    pub paginator: Paginator,
    pub empty_message: &'static str,
}

/// A single post page
#[derive(Debug, Clone, Serialize)]
pub struct PostPage {
    pub meta_title: Option<String>,
    pub meta_description: String,
    pub canonical_url: String,
    pub post: PostCard,
    pub date_display: Option<String>,
    pub body_html: String,
    pub reading_time: u32,
    pub share_links: Vec<ShareLink>,
    pub related: Vec<PostCard>,
    pub prev: Option<NavPost>,
    pub next: Option<NavPost>,
}

/// The not found page
#[derive(Debug, Clone, Serialize)]
pub struct NotFoundPage {
    pub meta_title: Option<String>,
    pub message: String,
}

impl NotFoundPage {
    pub fn post_missing() -> Self {
        Self {
            meta_title: Some("페이지를 찾을 수 없습니다".to_string()),
            message: "요청하신 게시글을 찾을 수 없습니다.".to_string(),
        }
    }

    pub fn page_missing() -> Self {
        Self {
            meta_title: Some("페이지를 찾을 수 없습니다".to_string()),
            message: "요청하신 페이지를 찾을 수 없습니다.".to_string(),
        }
    }
}
