//! Markdown rendering with syntax highlighting

use anyhow::Result;
use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use crate::helpers::escape_html;

/// Markdown renderer with syntax highlighting
pub struct MarkdownRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
    line_numbers: bool,
}

/// Image being collected between its start and end events
struct PendingImage {
    src: String,
    title: String,
    alt: String,
}

impl MarkdownRenderer {
    /// Create a new markdown renderer
    pub fn new() -> Self {
        Self::with_options("base16-ocean.dark", false)
    }

    /// Create with custom settings
    pub fn with_options(theme: &str, line_numbers: bool) -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
            theme_name: theme.to_string(),
            line_numbers,
        }
    }

    /// Render markdown to HTML
    pub fn render(&self, markdown: &str) -> Result<String> {
        // GFM tables, task lists and strikethrough show up in Notion exports
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_MATH
            | Options::ENABLE_GFM;
        let parser = Parser::new_ext(markdown, options);

        let mut events: Vec<Event> = Vec::new();
        let mut in_code_block = false;
        let mut code_block_lang: Option<String> = None;
        let mut code_block_content = String::new();
        let mut image: Option<PendingImage> = None;

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(kind)) => {
                    in_code_block = true;
                    code_block_lang = match kind {
                        CodeBlockKind::Fenced(lang) => {
                            let lang = lang.to_string();
                            if lang.is_empty() {
                                None
                            } else {
                                Some(lang)
                            }
                        }
                        CodeBlockKind::Indented => None,
                    };
                    code_block_content.clear();
                }
                Event::End(TagEnd::CodeBlock) => {
                    let highlighted =
                        self.highlight_code(&code_block_content, code_block_lang.as_deref());
                    events.push(Event::Html(CowStr::from(highlighted)));
                    in_code_block = false;
                    code_block_lang = None;
                }
                Event::Text(text) if in_code_block => {
                    code_block_content.push_str(&text);
                }
                Event::Start(Tag::Image {
                    dest_url, title, ..
                }) => {
                    image = Some(PendingImage {
                        src: dest_url.to_string(),
                        title: title.to_string(),
                        alt: String::new(),
                    });
                }
                Event::Text(text) | Event::Code(text) if image.is_some() => {
                    if let Some(img) = image.as_mut() {
                        img.alt.push_str(&text);
                    }
                }
                Event::End(TagEnd::Image) => {
                    if let Some(img) = image.take() {
                        events.push(Event::Html(CowStr::from(image_tag(&img))));
                    }
                }
                // Raw HTML in the source is shown as text; only toggle markup passes
                Event::Html(raw) | Event::InlineHtml(raw) if !in_code_block && image.is_none() => {
                    if is_toggle_markup(&raw) {
                        events.push(Event::Html(raw));
                    } else {
                        events.push(Event::Text(raw));
                    }
                }
                _ => {
                    if !in_code_block && image.is_none() {
                        events.push(event);
                    }
                }
            }
        }

        let mut html_output = String::new();
        html::push_html(&mut html_output, events.into_iter());

        Ok(html_output)
    }

    /// Highlight a code block
    fn highlight_code(&self, code: &str, lang: Option<&str>) -> String {
        let lang = lang.unwrap_or("text");

        // Try to find syntax for the language
        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());

        let theme = self
            .theme_set
            .themes
            .get(&self.theme_name)
            .or_else(|| self.theme_set.themes.values().next());

        let highlighted = theme.and_then(|theme| {
            highlighted_html_for_string(code, &self.syntax_set, syntax, theme).ok()
        });

        match highlighted {
            Some(highlighted) if self.line_numbers => self.add_line_numbers(&highlighted, lang),
            Some(highlighted) => format!(
                r#"<figure class="highlight {}">{}</figure>"#,
                lang, highlighted
            ),
            None => {
                // Fallback to plain code block
                format!(
                    r#"<pre><code class="language-{}">{}</code></pre>"#,
                    lang,
                    escape_html(code)
                )
            }
        }
    }

    /// Add line numbers to highlighted code
    fn add_line_numbers(&self, code: &str, lang: &str) -> String {
        let lines: Vec<&str> = code.lines().collect();
        let line_count = lines.len();

        let mut gutter = String::new();
        let mut code_lines = String::new();

        for (i, line) in lines.iter().enumerate() {
            gutter.push_str(&format!(r#"<span class="line-number">{}</span>"#, i + 1));
            if i < line_count - 1 {
                gutter.push('\n');
            }

            code_lines.push_str(line);
            if i < line_count - 1 {
                code_lines.push('\n');
            }
        }

        format!(
            r#"<figure class="highlight {}"><table><tr><td class="gutter"><pre>{}</pre></td><td class="code"><pre>{}</pre></td></tr></table></figure>"#,
            lang, gutter, code_lines
        )
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

/// `<details>`, `</details>` and a `<summary>` holding plain text, one per line
fn is_toggle_markup(raw: &str) -> bool {
    let mut lines = raw.lines().map(str::trim).filter(|l| !l.is_empty()).peekable();
    if lines.peek().is_none() {
        return false;
    }

    lines.all(|line| {
        line == "<details>"
            || line == "</details>"
            || line
                .strip_prefix("<summary>")
                .and_then(|rest| rest.strip_suffix("</summary>"))
                .is_some_and(|text| !text.contains(['<', '>']))
    })
}

fn image_tag(img: &PendingImage) -> String {
    let title = if img.title.is_empty() {
        String::new()
    } else {
        format!(r#" title="{}""#, escape_html(&img.title))
    };
    format!(
        r#"<img src="{}" alt="{}"{} class="rounded-lg" loading="lazy">"#,
        escape_html(&img.src),
        escape_html(&img.alt),
        title
    )
}
