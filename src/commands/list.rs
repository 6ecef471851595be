//! List site content

use anyhow::Result;
use std::fmt::Write;

use crate::content::collection::category_counts;
use crate::content::{ContentSource, Post};

/// List published posts or categories
pub async fn run(source: &ContentSource, content_type: &str) -> Result<()> {
    let posts = source.try_fetch_published_posts().await?;
    print!("{}", format_listing(&posts, content_type)?);
    Ok(())
}

fn format_listing(posts: &[Post], content_type: &str) -> Result<String> {
    let mut out = String::new();

    match content_type {
        "post" | "posts" => {
            writeln!(out, "Posts ({}):", posts.len())?;
            for post in posts {
                let date = post
                    .published_on()
                    .map(|d| d.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|| "----------".to_string());
                write!(out, "  {} - {} [{}]", date, post.title, post.slug)?;
                if let Some(category) = &post.category {
                    write!(out, " ({})", category)?;
                }
                out.push('\n');
            }
        }
        "category" | "categories" => {
            let mut categories = category_counts(posts);
            categories.sort_by(|a, b| b.1.cmp(&a.1));
            writeln!(out, "Categories ({}):", categories.len())?;
            for (category, count) in categories {
                writeln!(out, "  {} ({})", category, count)?;
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, category",
                content_type
            );
        }
    }

    Ok(out)
}
