//! Content module - posts, their source, and operations over them

pub mod collection;
mod markdown;
pub mod metadata;
mod post;
pub mod source;

pub use markdown::MarkdownRenderer;
pub use post::Post;
pub use source::ContentSource;
