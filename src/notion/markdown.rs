//! Notion blocks to markdown

use std::future::Future;
use std::pin::Pin;

use super::model::rich_text_list;
use super::{Block, NotionApi, Result, RichText};
use crate::helpers::escape_html;

/// A block together with its (already fetched) children
#[derive(Debug, Clone)]
pub struct BlockNode {
    pub block: Block,
    pub children: Vec<BlockNode>,
}

impl BlockNode {
    pub fn leaf(block: Block) -> Self {
        Self {
            block,
            children: Vec::new(),
        }
    }
}

/// Fetch a page's blocks, following cursors and descending into children
pub fn fetch_block_tree<'a>(
    api: &'a dyn NotionApi,
    block_id: &'a str,
) -> Pin<Box<dyn Future<Output = Result<Vec<BlockNode>>> + Send + 'a>> {
    Box::pin(async move {
        let mut blocks = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let page = api.list_block_children(block_id, cursor.as_deref()).await?;
            blocks.extend(page.results);
            match page.next_cursor {
                Some(next) if page.has_more => cursor = Some(next),
                _ => break,
            }
        }

        let mut nodes = Vec::with_capacity(blocks.len());
        for block in blocks {
            // sub-pages are separate documents
            let descend = block.has_children
                && !matches!(block.kind.as_str(), "child_page" | "child_database");
            let children = if descend {
                fetch_block_tree(api, &block.id).await?
            } else {
                Vec::new()
            };
            nodes.push(BlockNode { block, children });
        }
        Ok(nodes)
    })
}

/// Fetch a page and convert its body to markdown
pub async fn page_to_markdown(api: &dyn NotionApi, page_id: &str) -> Result<String> {
    let tree = fetch_block_tree(api, page_id).await?;
    Ok(blocks_to_markdown(&tree))
}

/// Convert a block tree to a markdown document
pub fn blocks_to_markdown(nodes: &[BlockNode]) -> String {
    let mut out = String::new();
    let mut number = 0;
    let mut prev_list = false;

    for node in nodes {
        let kind = node.block.kind.as_str();
        if kind == "numbered_list_item" {
            number += 1;
        } else {
            number = 0;
        }

        let Some(chunk) = render_block(node, number) else {
            continue;
        };

        let is_list = is_list_item(kind);
        if !out.is_empty() {
            out.push_str(if is_list && prev_list { "\n" } else { "\n\n" });
        }
        out.push_str(&chunk);
        prev_list = is_list;
    }

    out
}

fn is_list_item(kind: &str) -> bool {
    matches!(
        kind,
        "bulleted_list_item" | "numbered_list_item" | "to_do"
    )
}

fn render_block(node: &BlockNode, number: usize) -> Option<String> {
    let block = &node.block;
    let text = rich_text_to_markdown(&block.rich_text());
    let children = blocks_to_markdown(&node.children);

    let rendered = match block.kind.as_str() {
        "paragraph" => join_blocks(&text, &children),
        "heading_1" => join_blocks(&format!("# {}", text), &children),
        "heading_2" => join_blocks(&format!("## {}", text), &children),
        "heading_3" => join_blocks(&format!("### {}", text), &children),
        "bulleted_list_item" => list_item("- ", &text, &children),
        "numbered_list_item" => list_item(&format!("{}. ", number), &text, &children),
        "to_do" => {
            let mark = if block.field_bool("checked").unwrap_or(false) {
                "x"
            } else {
                " "
            };
            list_item(&format!("- [{}] ", mark), &text, &children)
        }
        "quote" => prefix_lines(&join_blocks(&text, &children), "> "),
        "callout" => {
            let icon = block
                .payload()
                .and_then(|p| p.pointer("/icon/emoji"))
                .and_then(|v| v.as_str());
            let head = match icon {
                Some(icon) => format!("{} {}", icon, text),
                None => text,
            };
            prefix_lines(&join_blocks(&head, &children), "> ")
        }
        "code" => {
            let language = match block.field_str("language") {
                Some("plain text") | None => "",
                Some(lang) => lang,
            };
            let code: String = block.rich_text().iter().map(|t| t.plain_text.as_str()).collect();
            format!("```{}\n{}\n```", language, code)
        }
        "divider" => "---".to_string(),
        "equation" => format!("$$\n{}\n$$", block.field_str("expression").unwrap_or("")),
        "image" => {
            let url = block.url()?;
            let caption = plain_text(&block.rich_text_field("caption"));
            format!("![{}]({})", caption, url)
        }
        "bookmark" | "link_preview" | "embed" | "video" | "file" | "pdf" | "audio" => {
            let url = block.url()?;
            let caption = plain_text(&block.rich_text_field("caption"));
            let label = if caption.is_empty() { url.clone() } else { caption };
            format!("[{}]({})", label, url)
        }
        "toggle" => format!(
            "<details>\n<summary>{}</summary>\n\n{}\n\n</details>",
            escape_html(&plain_text(&block.rich_text())),
            children
        ),
        "table" => render_table(&node.children)?,
        "child_page" => format!("**{}**", block.field_str("title").unwrap_or("")),
        "column_list" | "column" | "synced_block" => {
            if children.is_empty() {
                return None;
            }
            children
        }
        other => {
            tracing::debug!("Skipping unsupported block type {:?} ({})", other, block.id);
            return None;
        }
    };

    Some(rendered)
}

fn join_blocks(head: &str, children: &str) -> String {
    if children.is_empty() {
        head.to_string()
    } else if head.is_empty() {
        children.to_string()
    } else {
        format!("{}\n\n{}", head, children)
    }
}

/// A list item with its children indented to the content column
fn list_item(marker: &str, text: &str, children: &str) -> String {
    let mut item = format!("{}{}", marker, text);
    if !children.is_empty() {
        item.push('\n');
        item.push_str(&indent(children, marker.chars().count()));
    }
    item
}

fn indent(text: &str, width: usize) -> String {
    let pad = " ".repeat(width);
    text.lines()
        .map(|line| {
            if line.is_empty() {
                String::new()
            } else {
                format!("{}{}", pad, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn prefix_lines(text: &str, prefix: &str) -> String {
    text.lines()
        .map(|line| {
            if line.is_empty() {
                prefix.trim_end().to_string()
            } else {
                format!("{}{}", prefix, line)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_table(rows: &[BlockNode]) -> Option<String> {
    let rows: Vec<Vec<String>> = rows
        .iter()
        .filter(|row| row.block.kind == "table_row")
        .map(|row| {
            row.block
                .payload()
                .and_then(|p| p.get("cells"))
                .and_then(|cells| cells.as_array())
                .map(|cells| {
                    cells
                        .iter()
                        .map(|cell| rich_text_to_markdown(&rich_text_list(cell)).replace('|', "\\|"))
                        .collect()
                })
                .unwrap_or_default()
        })
        .collect();

    let width = rows.iter().map(Vec::len).max().filter(|w| *w > 0)?;
    let line = |cells: &[String]| {
        let mut padded: Vec<&str> = cells.iter().map(String::as_str).collect();
        padded.resize(width, "");
        format!("| {} |", padded.join(" | "))
    };

    let mut lines = vec![line(rows[0].as_slice()), format!("|{}", " --- |".repeat(width))];
    lines.extend(rows[1..].iter().map(|r| line(r.as_slice())));
    Some(lines.join("\n"))
}

fn plain_text(texts: &[RichText]) -> String {
    texts.iter().map(|t| t.plain_text.as_str()).collect()
}

/// Render rich text fragments with their annotations
pub fn rich_text_to_markdown(texts: &[RichText]) -> String {
    texts.iter().map(annotate).collect()
}

fn annotate(text: &RichText) -> String {
    if text.kind == "equation" {
        let expression = text
            .equation
            .as_ref()
            .map(|e| e.expression.as_str())
            .unwrap_or(&text.plain_text);
        return format!("${}$", expression);
    }

    let raw = text.plain_text.as_str();
    let core = raw.trim();
    if core.is_empty() {
        return raw.to_string();
    }

    // markers must hug the text, so surrounding whitespace stays outside
    let lead = raw.len() - raw.trim_start().len();
    let (leading, trailing) = (&raw[..lead], &raw[lead + core.len()..]);

    let a = &text.annotations;
    let mut s = core.to_string();
    if a.code {
        s = format!("`{}`", s);
    }
    if a.bold {
        s = format!("**{}**", s);
    }
    if a.italic {
        s = format!("_{}_", s);
    }
    if a.strikethrough {
        s = format!("~~{}~~", s);
    }
    if let Some(href) = &text.href {
        s = format!("[{}]({})", s, href);
    }

    format!("{}{}{}", leading, s, trailing)
}
