//! Values derived from a post for presentation

use super::Post;
use crate::helpers::format_iso_date;

/// Assumed reading speed in words per minute
pub const WORDS_PER_MINUTE: usize = 200;

/// Estimated reading time in whole minutes, never less than one
///
/// Words are whitespace-separated tokens for every script, CJK included, so
/// this is an approximation rather than a linguistic word count.
pub fn estimate_reading_time(text: &str) -> u32 {
    let words = text.split_whitespace().count();
    words.div_ceil(WORDS_PER_MINUTE).max(1) as u32
}

/// Publication date of a post for display, `None` when the post has none
pub fn format_published_date(post: &Post, format: &str) -> Option<String> {
    post.published_date
        .as_deref()
        .map(|date| format_iso_date(date, format))
}
