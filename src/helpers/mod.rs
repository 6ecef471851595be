//! Helper functions for views and templates
//!
//! URL generation, share links, HTML escaping and date formatting.

mod date;
mod html;
mod share;
mod url;

pub use date::*;
pub use html::*;
pub use share::*;
pub use url::*;
