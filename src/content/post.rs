//! Post model

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::PropertyNames;
use crate::notion::Page;

/// A published blog post, as read from a Notion database row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Post {
    /// Notion page id
    pub id: String,

    /// Post title
    pub title: String,

    /// URL-friendly key; uniqueness is up to the database
    pub slug: String,

    /// Whether the post is published
    pub published: bool,

    /// Publication date (ISO 8601)
    pub published_date: Option<String>,

    /// Short description
    pub summary: Option<String>,

    /// Free-form category label
    pub category: Option<String>,

    /// Thumbnail image URL
    pub thumbnail: Option<String>,
}

impl Post {
    /// Create a post with only the required fields
    pub fn new(id: &str, title: &str, slug: &str) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            slug: slug.to_string(),
            published: true,
            published_date: None,
            summary: None,
            category: None,
            thumbnail: None,
        }
    }

    /// Read a post from a database row; missing properties take defaults
    pub fn from_page(page: &Page, names: &PropertyNames) -> Self {
        let non_empty = |s: Option<String>| s.filter(|s| !s.is_empty());

        Self {
            id: page.id.clone(),
            title: page.title_text(&names.title).unwrap_or_default(),
            slug: page.rich_text(&names.slug).unwrap_or_default(),
            published: page.checkbox(&names.published).unwrap_or(false),
            published_date: non_empty(page.date_start(&names.published_date)),
            summary: non_empty(page.rich_text(&names.summary)),
            category: non_empty(page.select_name(&names.category)),
            thumbnail: non_empty(page.first_file_url(&names.thumbnail)),
        }
    }

    /// Publication date as a calendar date
    pub fn published_on(&self) -> Option<NaiveDate> {
        let date = self.published_date.as_deref()?;
        date.get(..10)
            .and_then(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
    }

    /// Root-relative URL path of the post
    pub fn path(&self) -> String {
        crate::helpers::post_path(&self.slug)
    }

    /// Get the previous post in a list
    pub fn prev<'a>(&self, posts: &'a [Post]) -> Option<&'a Post> {
        let pos = posts.iter().position(|p| p.id == self.id)?;
        if pos > 0 {
            Some(&posts[pos - 1])
        } else {
            None
        }
    }

    /// Get the next post in a list
    pub fn next<'a>(&self, posts: &'a [Post]) -> Option<&'a Post> {
        let pos = posts.iter().position(|p| p.id == self.id)?;
        posts.get(pos + 1)
    }
}
