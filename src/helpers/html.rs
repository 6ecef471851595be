//! HTML helper functions

use regex::RegexBuilder;

/// Escape HTML special characters
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Wrap every case-insensitive occurrence of `term` in a `<mark>` tag
///
/// The text is HTML-escaped; the term is matched literally.
///
/// # Examples
/// ```ignore
/// highlight_search_term("Notion Tips", "notion") // -> "<mark ...>Notion</mark> Tips"
/// ```
pub fn highlight_search_term(text: &str, term: &str) -> String {
    let term = term.trim();
    if term.is_empty() {
        return escape_html(text);
    }

    let re = match RegexBuilder::new(&regex::escape(term))
        .case_insensitive(true)
        .build()
    {
        Ok(re) => re,
        Err(_) => return escape_html(text),
    };

    let mut result = String::with_capacity(text.len() + 32);
    let mut last = 0;
    for m in re.find_iter(text) {
        result.push_str(&escape_html(&text[last..m.start()]));
        result.push_str(r#"<mark class="search-highlight">"#);
        result.push_str(&escape_html(m.as_str()));
        result.push_str("</mark>");
        last = m.end();
    }
    result.push_str(&escape_html(&text[last..]));

    result
}

/// Truncate a string to a specified length
pub fn truncate(s: &str, length: usize, omission: Option<&str>) -> String {
    let omission = omission.unwrap_or("...");

    if s.chars().count() <= length {
        s.to_string()
    } else {
        let truncated: String = s
            .chars()
            .take(length.saturating_sub(omission.chars().count()))
            .collect();
        format!("{}{}", truncated.trim_end(), omission)
    }
}
