//! Site configuration (_config.yml)

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub author: String,
    pub language: String,

    // URL
    /// Site origin used for absolute links (sitemap, robots, share links);
    /// pages are always served from `/`
    pub url: String,

    // Listing
    pub per_page: usize,
    pub related_limit: usize,

    // Date format (Moment.js style), e.g. "YYYY년 M월 D일"
    pub date_format: String,

    // Directory
    pub public_dir: String,

    // Code highlighting theme name (syntect)
    pub highlight_theme: String,

    // Content source
    #[serde(default)]
    pub notion: NotionConfig,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "Blog".to_string(),
            description: String::new(),
            author: String::new(),
            language: "ko".to_string(),

            url: "http://localhost:3000".to_string(),

            per_page: 6,
            related_limit: 3,

            date_format: "YYYY-MM-DD".to_string(),

            public_dir: "public".to_string(),

            highlight_theme: "base16-ocean.dark".to_string(),

            notion: NotionConfig::default(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read config {:?}", path.as_ref()))?;
        let config: SiteConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config {:?}", path.as_ref()))?;
        Ok(config)
    }

    /// Apply environment overrides for credentials and the base URL
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(key) = non_empty("NOTION_API_KEY") {
            self.notion.api_key = key;
        }
        if let Some(id) = non_empty("NOTION_DATABASE_ID") {
            self.notion.database_id = id;
        }
        if let Some(url) = non_empty("BLOG_BASE_URL").or_else(|| non_empty("NEXT_PUBLIC_BASE_URL")) {
            self.url = url;
        }
    }

    /// Base URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }
}

/// Notion connection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NotionConfig {
    #[serde(skip_serializing)]
    pub api_key: String,
    pub database_id: String,
    pub api_base: String,
    pub api_version: String,
    pub timeout_secs: u64,
    #[serde(default)]
    pub properties: PropertyNames,
}

impl Default for NotionConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            database_id: String::new(),
            api_base: "https://api.notion.com/v1".to_string(),
            api_version: "2022-06-28".to_string(),
            timeout_secs: 30,
            properties: PropertyNames::default(),
        }
    }
}

/// Names of the database properties a post is read from
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PropertyNames {
    pub title: String,
    pub slug: String,
    pub published: String,
    pub published_date: String,
    pub summary: String,
    pub category: String,
    pub thumbnail: String,
}

impl Default for PropertyNames {
    fn default() -> Self {
        Self {
            title: "Name".to_string(),
            slug: "Slug".to_string(),
            published: "Published".to_string(),
            published_date: "Published Date".to_string(),
            summary: "Summary".to_string(),
            category: "Category".to_string(),
            thumbnail: "Files".to_string(),
        }
    }
}
