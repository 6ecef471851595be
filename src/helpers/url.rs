//! URL helper functions

use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS, NON_ALPHANUMERIC};
use std::collections::{BTreeMap, HashSet};
use std::fmt::Write;

use crate::config::SiteConfig;

/// Characters escaped inside a single path segment
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Characters escaped in a query value (everything but unreserved)
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Generate a full URL including the domain
///
/// # Examples
/// ```ignore
/// full_url_for(&config, "/sitemap.xml") // -> "https://example.com/sitemap.xml"
/// ```
pub fn full_url_for(config: &SiteConfig, path: &str) -> String {
    format!("{}/{}", config.base_url(), path.trim_start_matches('/'))
}

/// Path of a post page, relative to the site root
pub fn post_path(slug: &str) -> String {
    format!("/blog/{}", encode_path_segment(slug))
}

/// Absolute URL of a post page
pub fn post_url(config: &SiteConfig, slug: &str) -> String {
    full_url_for(config, &post_path(slug))
}

/// Whether `slug` can be used as a single path segment on disk
pub fn is_usable_slug(slug: &str) -> bool {
    !slug.is_empty() && !slug.starts_with('.') && !slug.contains(['/', '\\'])
}

/// Directory name of a category listing in static output
///
/// Names that slugify to nothing ("..", "!!!") fall back to the hex of
/// their bytes, so the result is always a plain segment.
pub fn category_slug(name: &str) -> String {
    let slug = slug::slugify(name);
    if !slug.is_empty() {
        return slug;
    }

    let mut hex = String::from("category-");
    for byte in name.bytes() {
        let _ = write!(hex, "{:02x}", byte);
    }
    hex
}

/// Map each category name to a distinct directory name
///
/// Names sharing a slug get a numeric suffix in the order given
/// ("C" -> "c", "C++" -> "c-2").
pub fn category_dirs(names: &[String]) -> BTreeMap<String, String> {
    let mut taken = HashSet::new();
    let mut dirs = BTreeMap::new();

    for name in names {
        let base = category_slug(name);
        let mut dir = base.clone();
        let mut n = 1;
        while !taken.insert(dir.clone()) {
            n += 1;
            dir = format!("{}-{}", base, n);
        }
        if n > 1 {
            tracing::warn!("Category {:?} shares the slug {:?}, using {:?}", name, base, dir);
        }
        dirs.insert(name.clone(), dir);
    }

    dirs
}

/// Percent-encode a value for use as one path segment
pub fn encode_path_segment(segment: &str) -> String {
    utf8_percent_encode(segment, PATH_SEGMENT).to_string()
}

/// Percent-encode a value for use in a query string
pub fn encode_component(value: &str) -> String {
    utf8_percent_encode(value, COMPONENT).to_string()
}
