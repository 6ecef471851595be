//! Response objects returned by the Notion API
//!
//! Property values and block payloads are kept as raw JSON and read through
//! accessors that return `None` on any shape mismatch, so one malformed field
//! never fails a whole response.

use serde::Deserialize;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Result of a database query
#[derive(Debug, Clone, Default, Deserialize)]
pub struct QueryResponse {
    #[serde(default)]
    pub results: Vec<Page>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// A database row
#[derive(Debug, Clone, Deserialize)]
pub struct Page {
    pub id: String,
    #[serde(default)]
    pub properties: HashMap<String, Value>,
}

impl Page {
    pub fn property(&self, name: &str) -> Option<&Value> {
        self.properties.get(name)
    }

    /// Plain text of the first fragment of a `title` property
    pub fn title_text(&self, name: &str) -> Option<String> {
        self.string_at(name, "/title/0/plain_text")
    }

    /// Plain text of the first fragment of a `rich_text` property
    pub fn rich_text(&self, name: &str) -> Option<String> {
        self.string_at(name, "/rich_text/0/plain_text")
    }

    pub fn checkbox(&self, name: &str) -> Option<bool> {
        self.property(name)?.pointer("/checkbox")?.as_bool()
    }

    /// Start of a `date` property
    pub fn date_start(&self, name: &str) -> Option<String> {
        self.string_at(name, "/date/start")
    }

    /// Option name of a `select` property
    pub fn select_name(&self, name: &str) -> Option<String> {
        self.string_at(name, "/select/name")
    }

    /// URL of the first attachment of a `files` property
    pub fn first_file_url(&self, name: &str) -> Option<String> {
        let file = self.property(name)?.pointer("/files/0")?;
        file_url(file)
    }

    fn string_at(&self, name: &str, pointer: &str) -> Option<String> {
        self.property(name)?
            .pointer(pointer)?
            .as_str()
            .map(str::to_string)
    }
}

/// URL of a Notion file object (`external` or Notion-hosted `file`)
pub(crate) fn file_url(file: &Value) -> Option<String> {
    let url = match file.get("type").and_then(Value::as_str) {
        Some("external") => file.pointer("/external/url"),
        Some("file") => file.pointer("/file/url"),
        _ => file
            .pointer("/external/url")
            .or_else(|| file.pointer("/file/url")),
    };
    url.and_then(Value::as_str).map(str::to_string)
}

/// One page of block children
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BlockChildren {
    #[serde(default)]
    pub results: Vec<Block>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// A content block; the payload lives under the key named by `type`
#[derive(Debug, Clone, Deserialize)]
pub struct Block {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub has_children: bool,
    #[serde(flatten)]
    pub data: Map<String, Value>,
}

impl Block {
    pub fn payload(&self) -> Option<&Value> {
        self.data.get(&self.kind)
    }

    /// A string field of the payload
    pub fn field_str(&self, key: &str) -> Option<&str> {
        self.payload()?.get(key)?.as_str()
    }

    pub fn field_bool(&self, key: &str) -> Option<bool> {
        self.payload()?.get(key)?.as_bool()
    }

    /// Rich text stored under `key` in the payload
    pub fn rich_text_field(&self, key: &str) -> Vec<RichText> {
        self.payload()
            .and_then(|p| p.get(key))
            .map(rich_text_list)
            .unwrap_or_default()
    }

    /// The block's main text
    pub fn rich_text(&self) -> Vec<RichText> {
        self.rich_text_field("rich_text")
    }

    /// URL of a media-like payload (image, file, video, pdf, bookmark, embed)
    pub fn url(&self) -> Option<String> {
        let payload = self.payload()?;
        payload
            .get("url")
            .and_then(Value::as_str)
            .map(str::to_string)
            .or_else(|| file_url(payload))
    }
}

/// Decode a rich text array, dropping fragments that don't parse
pub(crate) fn rich_text_list(value: &Value) -> Vec<RichText> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|item| serde_json::from_value(item.clone()).ok())
                .collect()
        })
        .unwrap_or_default()
}

/// A rich text fragment
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RichText {
    #[serde(rename = "type", default)]
    pub kind: String,
    #[serde(default)]
    pub plain_text: String,
    #[serde(default)]
    pub href: Option<String>,
    #[serde(default)]
    pub annotations: Annotations,
    #[serde(default)]
    pub equation: Option<Equation>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Annotations {
    pub bold: bool,
    pub italic: bool,
    pub strikethrough: bool,
    pub underline: bool,
    pub code: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Equation {
    #[serde(default)]
    pub expression: String,
}
