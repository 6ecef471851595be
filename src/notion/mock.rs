//! In-memory `NotionApi` double for tests

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use super::{
    Block, BlockChildren, Condition, DatabaseQuery, Direction, Filter, NotionApi, NotionError,
    Page, QueryResponse, Result,
};

/// Fields of a test post, turned into a Notion page with default property names
#[derive(Debug, Clone, Default)]
pub struct PageSpec {
    pub id: &'static str,
    pub title: &'static str,
    pub slug: &'static str,
    pub published: bool,
    pub date: Option<&'static str>,
    pub summary: Option<&'static str>,
    pub category: Option<&'static str>,
    pub thumbnail: Option<&'static str>,
}

impl PageSpec {
    pub fn published(id: &'static str, title: &'static str, slug: &'static str) -> Self {
        Self {
            id,
            title,
            slug,
            published: true,
            ..Self::default()
        }
    }

    pub fn date(mut self, date: &'static str) -> Self {
        self.date = Some(date);
        self
    }

    pub fn category(mut self, category: &'static str) -> Self {
        self.category = Some(category);
        self
    }

    pub fn summary(mut self, summary: &'static str) -> Self {
        self.summary = Some(summary);
        self
    }

    pub fn thumbnail(mut self, url: &'static str) -> Self {
        self.thumbnail = Some(url);
        self
    }

    pub fn draft(mut self) -> Self {
        self.published = false;
        self
    }

    pub fn to_page(&self) -> Page {
        let text = |s: Option<&str>| match s {
            Some(s) => json!([{ "type": "text", "plain_text": s }]),
            None => json!([]),
        };
        let files = match self.thumbnail {
            Some(url) => json!([{ "type": "external", "external": { "url": url } }]),
            None => json!([]),
        };
        serde_json::from_value(json!({
            "id": self.id,
            "properties": {
                "Name": { "type": "title", "title": text(Some(self.title)) },
                "Slug": { "type": "rich_text", "rich_text": text(Some(self.slug)) },
                "Published": { "type": "checkbox", "checkbox": self.published },
                "Published Date": {
                    "type": "date",
                    "date": self.date.map(|d| json!({ "start": d })).unwrap_or(Value::Null)
                },
                "Summary": { "type": "rich_text", "rich_text": text(self.summary) },
                "Category": {
                    "type": "select",
                    "select": self.category.map(|c| json!({ "name": c })).unwrap_or(Value::Null)
                },
                "Files": { "type": "files", "files": files }
            }
        }))
        .expect("valid page json")
    }
}

/// Build a block from its type and payload
pub fn block(id: &str, kind: &str, payload: Value) -> Block {
    let mut value = json!({ "id": id, "type": kind, "has_children": false });
    value[kind] = payload;
    serde_json::from_value(value).expect("valid block json")
}

/// Rich text array with a single plain fragment
pub fn plain(text: &str) -> Value {
    json!([{ "type": "text", "plain_text": text }])
}

pub struct MockNotionApi {
    pages: Vec<Page>,
    blocks: HashMap<String, Vec<Block>>,
    failing: bool,
    queries: Arc<Mutex<Vec<DatabaseQuery>>>,
}

impl MockNotionApi {
    pub fn new() -> Self {
        Self {
            pages: Vec::new(),
            blocks: HashMap::new(),
            failing: false,
            queries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn with_pages(mut self, pages: Vec<PageSpec>) -> Self {
        self.pages.extend(pages.iter().map(PageSpec::to_page));
        self
    }

    /// Children of `parent`; parents are flagged `has_children` automatically
    pub fn with_blocks(mut self, parent: &str, blocks: Vec<Block>) -> Self {
        for existing in self.blocks.values_mut() {
            for b in existing.iter_mut() {
                if b.id == parent {
                    b.has_children = true;
                }
            }
        }
        let blocks = blocks
            .into_iter()
            .map(|mut b| {
                if self.blocks.contains_key(&b.id) {
                    b.has_children = true;
                }
                b
            })
            .collect();
        self.blocks.insert(parent.to_string(), blocks);
        self
    }

    /// Every call fails as a transport error would
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    /// Queries received so far
    pub fn queries(&self) -> Vec<DatabaseQuery> {
        self.queries.lock().unwrap().clone()
    }

    fn outage() -> NotionError {
        NotionError::Api {
            status: 503,
            code: "service_unavailable".to_string(),
            message: "simulated outage".to_string(),
        }
    }
}

fn matches(filter: &Filter, page: &Page) -> bool {
    match filter {
        Filter::And { and } => and.iter().all(|f| matches(f, page)),
        Filter::Property(p) => match &p.condition {
            Condition::Checkbox { equals } => {
                page.checkbox(&p.property).unwrap_or(false) == *equals
            }
            Condition::RichText { equals } => {
                page.rich_text(&p.property).as_deref() == Some(equals.as_str())
            }
        },
    }
}

#[async_trait]
impl NotionApi for MockNotionApi {
    async fn query_database(
        &self,
        _database_id: &str,
        query: &DatabaseQuery,
    ) -> Result<QueryResponse> {
        self.queries.lock().unwrap().push(query.clone());
        if self.failing {
            return Err(Self::outage());
        }

        let mut results: Vec<Page> = self
            .pages
            .iter()
            .filter(|p| query.filter.as_ref().map_or(true, |f| matches(f, p)))
            .cloned()
            .collect();

        if let Some(sort) = query.sorts.first() {
            results.sort_by(|a, b| {
                let (a, b) = (a.date_start(&sort.property), b.date_start(&sort.property));
                match sort.direction {
                    Direction::Ascending => a.cmp(&b),
                    Direction::Descending => b.cmp(&a),
                }
            });
        }

        let start: usize = query
            .start_cursor
            .as_deref()
            .and_then(|c| c.parse().ok())
            .unwrap_or(0);
        let size = query.page_size.map_or(100, |s| s as usize);
        let end = (start + size).min(results.len());
        let has_more = end < results.len();

        Ok(QueryResponse {
            results: results.get(start..end).map(<[Page]>::to_vec).unwrap_or_default(),
            has_more,
            next_cursor: has_more.then(|| end.to_string()),
        })
    }

    async fn list_block_children(
        &self,
        block_id: &str,
        start_cursor: Option<&str>,
    ) -> Result<BlockChildren> {
        if self.failing {
            return Err(Self::outage());
        }

        // two blocks per page so callers exercise cursor handling
        let all = self.blocks.get(block_id).cloned().unwrap_or_default();
        let start: usize = start_cursor.and_then(|c| c.parse().ok()).unwrap_or(0);
        let end = (start + 2).min(all.len());
        let has_more = end < all.len();

        Ok(BlockChildren {
            results: all.get(start..end).map(<[Block]>::to_vec).unwrap_or_default(),
            has_more,
            next_cursor: has_more.then(|| end.to_string()),
        })
    }
}
