//! Sitemap and robots documents

use crate::helpers::encode_path_segment;

/// Build `sitemap.xml` for the home page and every post slug
pub fn sitemap_xml(base_url: &str, slugs: &[String]) -> String {
    let base_url = base_url.trim_end_matches('/');

    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    xml.push('\n');
    xml.push_str(r#"<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">"#);
    xml.push('\n');
    push_url(&mut xml, base_url, "daily", "1.0");

    for slug in slugs {
        let loc = format!("{}/blog/{}", base_url, encode_path_segment(slug));
        push_url(&mut xml, &loc, "weekly", "0.8");
    }

    xml.push_str("</urlset>\n");
    xml
}

fn push_url(xml: &mut String, loc: &str, changefreq: &str, priority: &str) {
    xml.push_str("  <url>\n");
    xml.push_str(&format!("    <loc>{}</loc>\n", escape_xml(loc)));
    xml.push_str(&format!("    <changefreq>{}</changefreq>\n", changefreq));
    xml.push_str(&format!("    <priority>{}</priority>\n", priority));
    xml.push_str("  </url>\n");
}

/// Build `robots.txt` allowing everything and pointing at the sitemap
pub fn robots_txt(base_url: &str) -> String {
    format!(
        "User-agent: *\nAllow: /\n\nSitemap: {}/sitemap.xml\n",
        base_url.trim_end_matches('/')
    )
}

/// Escape XML special characters
fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
