//! Operations over an in-memory post collection
//!
//! All of these preserve the source order (newest first); none of them
//! re-sort or score.

use std::collections::BTreeSet;

use super::Post;

/// Posts whose title, summary or category contains `query`, ignoring case
///
/// A blank query returns the input unchanged.
pub fn search(posts: &[Post], query: &str) -> Vec<Post> {
    let query = query.trim();
    if query.is_empty() {
        return posts.to_vec();
    }

    let needle = query.to_lowercase();
    let contains = |field: &str| field.to_lowercase().contains(&needle);

    posts
        .iter()
        .filter(|post| {
            contains(post.title.as_str())
                || post.summary.as_deref().is_some_and(contains)
                || post.category.as_deref().is_some_and(contains)
        })
        .cloned()
        .collect()
}

/// Posts whose category is exactly `category`
pub fn filter_by_category(posts: &[Post], category: &str) -> Vec<Post> {
    posts
        .iter()
        .filter(|post| post.category.as_deref() == Some(category))
        .cloned()
        .collect()
}

/// Distinct categories in ascending order
pub fn distinct_categories(posts: &[Post]) -> Vec<String> {
    posts
        .iter()
        .filter_map(|post| post.category.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Number of posts per category, in ascending category order
pub fn category_counts(posts: &[Post]) -> Vec<(String, usize)> {
    distinct_categories(posts)
        .into_iter()
        .map(|name| {
            let count = posts
                .iter()
                .filter(|p| p.category.as_deref() == Some(name.as_str()))
                .count();
            (name, count)
        })
        .collect()
}

/// Up to `limit` posts to suggest alongside `current`
///
/// This is a stable two-bucket partition rather than a similarity ranking:
/// posts sharing the current post's category come first, then everything
/// else, each bucket in its original order. The current post itself is never
/// included.
pub fn related_posts(posts: &[Post], current: &Post, limit: usize) -> Vec<Post> {
    let (same, rest): (Vec<&Post>, Vec<&Post>) = posts
        .iter()
        .filter(|post| post.slug != current.slug)
        .partition(|post| current.category.is_some() && post.category == current.category);

    same.into_iter()
        .chain(rest)
        .take(limit)
        .cloned()
        .collect()
}
