//! Pagination over a post collection and the navigation built on it

use serde::{Deserialize, Serialize};

use std::collections::BTreeMap;

use crate::helpers::{category_dirs, category_slug, encode_component};

/// Number of page links shown around the current page
pub const MAX_VISIBLE_PAGES: usize = 5;

/// One page of a collection
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageWindow<T> {
    pub items: Vec<T>,
    /// The requested page, even when out of range
    pub page: usize,
    pub page_size: usize,
    pub total_items: usize,
    pub total_pages: usize,
}

/// Slice `items` to the 1-based `page`
///
/// Pages outside `1..=total_pages` yield an empty window that still reports
/// the requested page and the real totals.
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> PageWindow<T> {
    let total_items = items.len();
    let total_pages = if page_size == 0 {
        0
    } else {
        total_items.div_ceil(page_size)
    };

    let window = if page == 0 || page > total_pages {
        Vec::new()
    } else {
        let start = (page - 1) * page_size;
        let end = (start + page_size).min(total_items);
        items[start..end].to_vec()
    };

    PageWindow {
        items: window,
        page,
        page_size,
        total_items,
        total_pages,
    }
}

/// Link targets used by a listing page
pub trait ListingLinks {
    /// Target of page `page` under the current filters
    fn page_href(&self, page: usize) -> String;

    /// Target of selecting `category`; selecting the active one, or `None`, clears it
    fn category_href(&self, category: Option<&str>) -> String;
}

/// Listing query parameters (`?q=&category=&page=`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ListingQuery {
    pub q: Option<String>,
    pub category: Option<String>,
    pub page: Option<String>,
}

impl ListingQuery {
    /// Trimmed search term, `None` when blank
    pub fn search_term(&self) -> Option<&str> {
        self.q.as_deref().map(str::trim).filter(|q| !q.is_empty())
    }

    /// Selected category, `None` when blank
    pub fn active_category(&self) -> Option<&str> {
        self.category.as_deref().filter(|c| !c.is_empty())
    }

    /// Requested page; absent, unparseable or non-positive means 1
    pub fn page_number(&self) -> usize {
        self.page
            .as_deref()
            .and_then(|p| p.trim().parse::<i64>().ok())
            .filter(|&p| p > 0)
            .map(|p| p as usize)
            .unwrap_or(1)
    }
}

impl ListingLinks for ListingQuery {
    fn page_href(&self, page: usize) -> String {
        build_href(self.search_term(), self.active_category(), Some(page))
    }

    /// Keeps the search term and drops the page
    fn category_href(&self, category: Option<&str>) -> String {
        let category = category.filter(|c| Some(*c) != self.active_category());
        build_href(self.search_term(), category, None)
    }
}

fn build_href(q: Option<&str>, category: Option<&str>, page: Option<usize>) -> String {
    let mut params = Vec::new();
    if let Some(q) = q {
        params.push(format!("q={}", encode_component(q)));
    }
    if let Some(category) = category {
        params.push(format!("category={}", encode_component(category)));
    }
    if let Some(page) = page {
        params.push(format!("page={}", page));
    }

    if params.is_empty() {
        "/".to_string()
    } else {
        format!("/?{}", params.join("&"))
    }
}

/// Path-style links for static output: `base`, `base/page/2/`, ...
#[derive(Debug, Clone)]
pub struct PathLinks {
    dirs: BTreeMap<String, String>,
    base: String,
    category: Option<String>,
}

impl PathLinks {
    /// Links for the unfiltered listing; `categories` names every category on the site
    pub fn new(categories: &[String]) -> Self {
        Self {
            dirs: category_dirs(categories),
            base: "/".to_string(),
            category: None,
        }
    }

    /// The same links, scoped to the listing of `category`
    pub fn for_category(&self, category: &str) -> Self {
        Self {
            dirs: self.dirs.clone(),
            base: format!("/{}/", self.category_path(category)),
            category: Some(category.to_string()),
        }
    }

    /// Output directory of a category listing, relative to the site root
    pub fn category_path(&self, category: &str) -> String {
        let dir = self
            .dirs
            .get(category)
            .cloned()
            .unwrap_or_else(|| category_slug(category));
        format!("categories/{}", dir)
    }
}

impl ListingLinks for PathLinks {
    fn page_href(&self, page: usize) -> String {
        if page <= 1 {
            self.base.clone()
        } else {
            format!("{}page/{}/", self.base, page)
        }
    }

    fn category_href(&self, category: Option<&str>) -> String {
        match category {
            Some(c) if Some(c) != self.category.as_deref() => format!("/{}/", self.category_path(c)),
            _ => "/".to_string(),
        }
    }
}

/// A numbered page link
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageLink {
    pub number: usize,
    pub href: String,
    pub current: bool,
}

/// Navigation for a paged listing
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Paginator {
    pub prev: Option<String>,
    pub next: Option<String>,
    /// Jump to page 1 when the window doesn't start there
    pub first: Option<PageLink>,
    pub leading_ellipsis: bool,
    pub pages: Vec<PageLink>,
    pub trailing_ellipsis: bool,
    /// Jump to the last page when the window doesn't end there
    pub last: Option<PageLink>,
}

impl Paginator {
    /// Navigation for `current` of `total`, empty when there is one page or none
    pub fn new(current: usize, total: usize, links: &dyn ListingLinks) -> Self {
        if total <= 1 {
            return Self::default();
        }

        let link = |number: usize| PageLink {
            number,
            href: links.page_href(number),
            current: number == current,
        };

        let center = current.clamp(1, total);
        let mut start = center.saturating_sub(MAX_VISIBLE_PAGES / 2).max(1);
        let end = (start + MAX_VISIBLE_PAGES - 1).min(total);
        if end - start < MAX_VISIBLE_PAGES - 1 {
            start = end.saturating_sub(MAX_VISIBLE_PAGES - 1).max(1);
        }

        Self {
            prev: (current > 1).then(|| links.page_href((current - 1).min(total))),
            next: (current < total).then(|| links.page_href(current.max(1) + 1)),
            first: (start > 1).then(|| link(1)),
            leading_ellipsis: start > 2,
            pages: (start..=end).map(&link).collect(),
            trailing_ellipsis: end + 1 < total,
            last: (end < total).then(|| link(total)),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}
