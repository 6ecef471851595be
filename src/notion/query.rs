//! Database query body for `POST /databases/{id}/query`

use serde::Serialize;

/// Maximum page size accepted by the Notion API
pub const MAX_PAGE_SIZE: u32 = 100;

/// A database query: filter, sorts and cursor
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DatabaseQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filter: Option<Filter>,

    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub sorts: Vec<Sort>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_cursor: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_size: Option<u32>,
}

impl DatabaseQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: Filter) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn sort(mut self, sort: Sort) -> Self {
        self.sorts.push(sort);
        self
    }

    pub fn page_size(mut self, size: u32) -> Self {
        self.page_size = Some(size.min(MAX_PAGE_SIZE));
        self
    }

    /// Same query continued from a cursor
    pub fn with_cursor(&self, cursor: Option<String>) -> Self {
        Self {
            start_cursor: cursor,
            ..self.clone()
        }
    }
}

/// A filter: a single property condition or a compound `and`
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Filter {
    Property(PropertyFilter),
    And { and: Vec<Filter> },
}

impl Filter {
    pub fn checkbox(property: &str, equals: bool) -> Self {
        Filter::Property(PropertyFilter {
            property: property.to_string(),
            condition: Condition::Checkbox { equals },
        })
    }

    pub fn rich_text_equals(property: &str, equals: &str) -> Self {
        Filter::Property(PropertyFilter {
            property: property.to_string(),
            condition: Condition::RichText {
                equals: equals.to_string(),
            },
        })
    }

    pub fn and(filters: Vec<Filter>) -> Self {
        Filter::And { and: filters }
    }
}

/// Condition on one property
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyFilter {
    pub property: String,
    #[serde(flatten)]
    pub condition: Condition,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    Checkbox { equals: bool },
    RichText { equals: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Ascending,
    Descending,
}

/// Sort on a property
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Sort {
    pub property: String,
    pub direction: Direction,
}

impl Sort {
    pub fn descending(property: &str) -> Self {
        Self {
            property: property.to_string(),
            direction: Direction::Descending,
        }
    }
}
