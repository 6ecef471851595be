//! Generator module - writes the whole blog as static files

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

use crate::content::collection::distinct_categories;
use crate::content::{ContentSource, Post};
use crate::helpers::is_usable_slug;
use crate::pagination::PathLinks;
use crate::seo::{robots_txt, sitemap_xml};
use crate::templates::NotFoundPage;
use crate::views::{ListingRequest, Views};
use crate::Blog;

/// Static site generator
pub struct Generator {
    blog: Blog,
    views: Views,
}

impl Generator {
    /// Create a new generator
    pub fn new(blog: &Blog) -> Result<Self> {
        Ok(Self {
            blog: blog.clone(),
            views: Views::new(&blog.config)?,
        })
    }

    /// Fetch everything once and write the site
    pub async fn generate(&self, source: &ContentSource) -> Result<()> {
        // An outage should fail the build rather than publish an empty site
        let posts = source
            .try_fetch_published_posts()
            .await
            .context("Failed to fetch posts from Notion")?;
        tracing::info!("Fetched {} published posts", posts.len());

        let mut bodies = Vec::with_capacity(posts.len());
        for post in &posts {
            tracing::debug!("Fetching body of {}", post.slug);
            bodies.push(source.fetch_post_body(&post.id).await);
        }

        self.write_site(&posts, &bodies)
    }

    /// Write every page for `posts`; `bodies[i]` is the markdown of `posts[i]`
    pub fn write_site(&self, posts: &[Post], bodies: &[String]) -> Result<()> {
        fs::create_dir_all(&self.blog.public_dir)?;

        let categories = distinct_categories(posts);
        let links = PathLinks::new(&categories);

        // Home listing
        self.generate_listing_pages(posts, None, &links, PathBuf::new())?;

        // Category listings
        for category in &categories {
            let dir = PathBuf::from(links.category_path(category));
            let scoped = links.for_category(category);
            self.generate_listing_pages(posts, Some(category.as_str()), &scoped, dir)?;
        }

        self.generate_post_pages(posts, bodies)?;
        self.generate_not_found_page()?;
        self.generate_seo_files(posts)?;
        self.generate_search_index(posts)?;

        Ok(())
    }

    /// Generate a listing with pagination under `dir`
    fn generate_listing_pages(
        &self,
        posts: &[Post],
        category: Option<&str>,
        links: &PathLinks,
        dir: PathBuf,
    ) -> Result<()> {
        let mut page_num = 1;
        loop {
            let request = ListingRequest {
                search: None,
                category,
                page: page_num,
            };
            let page = self.views.listing_page(posts, &request, links, false);
            let html = self.views.render_listing(&page)?;

            let output_path = if page_num == 1 {
                dir.join("index.html")
            } else {
                dir.join(format!("page/{}/index.html", page_num))
            };
            self.write(&output_path, &html)?;

            // Page 1 is written even when there are no posts
            if page_num >= page.total_pages {
                break;
            }
            page_num += 1;
        }

        Ok(())
    }

    /// Generate individual post pages
    fn generate_post_pages(&self, posts: &[Post], bodies: &[String]) -> Result<()> {
        for (post, body) in posts.iter().zip(bodies) {
            if !is_usable_slug(&post.slug) {
                tracing::warn!("Skipping post with unusable slug {:?}: {}", post.slug, post.title);
                continue;
            }

            let page = self.views.post_page(post, posts, body)?;
            let html = self.views.render_post(&page)?;

            let output_path = Path::new("blog").join(&post.slug).join("index.html");
            self.write(&output_path, &html)?;
        }

        Ok(())
    }

    fn generate_not_found_page(&self) -> Result<()> {
        let html = self.views.render_not_found(&NotFoundPage::page_missing())?;
        self.write(Path::new("404.html"), &html)
    }

    /// Generate sitemap.xml and robots.txt
    fn generate_seo_files(&self, posts: &[Post]) -> Result<()> {
        let base_url = self.blog.config.base_url();
        let slugs: Vec<String> = posts
            .iter()
            .filter(|p| is_usable_slug(&p.slug))
            .map(|p| p.slug.clone())
            .collect();

        self.write(Path::new("sitemap.xml"), &sitemap_xml(base_url, &slugs))?;
        self.write(Path::new("robots.txt"), &robots_txt(base_url))?;
        tracing::info!("Generated sitemap.xml and robots.txt");

        Ok(())
    }

    /// Generate search index (JSON)
    fn generate_search_index(&self, posts: &[Post]) -> Result<()> {
        let search_data: Vec<serde_json::Value> = posts
            .iter()
            .filter(|p| is_usable_slug(&p.slug))
            .map(|p| {
                serde_json::json!({
                    "title": p.title,
                    "url": p.path(),
                    "summary": p.summary,
                    "category": p.category,
                    "date": p.published_date,
                })
            })
            .collect();

        let json = serde_json::to_string_pretty(&search_data)?;
        self.write(Path::new("search.json"), &json)?;
        tracing::info!("Generated search.json");

        Ok(())
    }

    /// Write `content` to `relative` under the public directory
    fn write(&self, relative: &Path, content: &str) -> Result<()> {
        let output_path = self.blog.public_dir.join(relative);
        if let Some(parent) = output_path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create dir {:?}", parent))?;
        }
        fs::write(&output_path, content)
            .with_context(|| format!("Failed to write {:?}", output_path))?;
        tracing::debug!("Generated: {:?}", output_path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::notion::mock::{block, plain, MockNotionApi, PageSpec};
    use serde_json::json;
    use std::sync::Arc;

    fn blog(dir: &Path) -> Blog {
        let config = SiteConfig {
            url: "https://blog.example.com".to_string(),
            per_page: 2,
            ..SiteConfig::default()
        };
        Blog::with_config(dir, config)
    }

    fn read(blog: &Blog, relative: &str) -> String {
        fs::read_to_string(blog.public_dir.join(relative)).unwrap()
    }

    fn sample_api() -> MockNotionApi {
        MockNotionApi::new()
            .with_pages(vec![
                PageSpec::published("1", "Notion Tips", "notion-tips")
                    .date("2024-03-04")
                    .category("Dev Log")
                    .summary("Notion as a CMS"),
                PageSpec::published("2", "Kimchi", "kimchi")
                    .date("2024-03-03")
                    .category("Food"),
                PageSpec::published("3", "Rust Async", "rust-async")
                    .date("2024-03-02")
                    .category("Dev Log"),
                PageSpec::published("4", "Axum", "axum")
                    .date("2024-03-01")
                    .category("Dev Log"),
                PageSpec::published("5", "Draft", "draft").draft(),
            ])
            .with_blocks(
                "1",
                vec![block("b1", "paragraph", json!({ "rich_text": plain("Body of tips") }))],
            )
    }

    #[tokio::test]
    async fn test_generate_site() {
        let dir = tempfile::tempdir().unwrap();
        let blog = blog(dir.path());
        let source = ContentSource::new(Arc::new(sample_api()), "db", Default::default());

        Generator::new(&blog).unwrap().generate(&source).await.unwrap();

        let index = read(&blog, "index.html");
        assert!(index.contains(r#"href="/blog/notion-tips""#));
        assert!(index.contains(r#"href="/page/2/""#));
        assert!(index.contains(r#"href="/categories/dev-log/""#));
        assert!(!index.contains(r#"name="q""#));

        let page2 = read(&blog, "page/2/index.html");
        assert!(page2.contains(r#"href="/blog/axum""#));
        assert!(!blog.public_dir.join("page/3/index.html").exists());

        let category = read(&blog, "categories/dev-log/index.html");
        assert!(category.contains(r#"href="/blog/notion-tips""#));
        assert!(!category.contains(r#"href="/blog/kimchi""#));
        assert!(blog.public_dir.join("categories/dev-log/page/2/index.html").exists());
        assert!(blog.public_dir.join("categories/food/index.html").exists());

        let post = read(&blog, "blog/notion-tips/index.html");
        assert!(post.contains("<p>Body of tips</p>"));
        assert!(!blog.public_dir.join("blog/draft").exists());

        assert!(read(&blog, "404.html").contains("404"));
        assert!(read(&blog, "sitemap.xml").contains("<loc>https://blog.example.com/blog/axum</loc>"));
        assert!(read(&blog, "robots.txt").contains("Sitemap: https://blog.example.com/sitemap.xml"));
    }

    #[tokio::test]
    async fn test_search_index() {
        let dir = tempfile::tempdir().unwrap();
        let blog = blog(dir.path());
        let source = ContentSource::new(Arc::new(sample_api()), "db", Default::default());

        Generator::new(&blog).unwrap().generate(&source).await.unwrap();

        let index: Vec<serde_json::Value> =
            serde_json::from_str(&read(&blog, "search.json")).unwrap();
        assert_eq!(index.len(), 4);
        assert_eq!(index[0]["title"], "Notion Tips");
        assert_eq!(index[0]["url"], "/blog/notion-tips");
        assert_eq!(index[0]["summary"], "Notion as a CMS");
        assert_eq!(index[0]["category"], "Dev Log");
        assert_eq!(index[0]["date"], "2024-03-04");
        assert!(index[1]["summary"].is_null());
    }

    #[tokio::test]
    async fn test_generate_fails_on_outage() {
        let dir = tempfile::tempdir().unwrap();
        let blog = blog(dir.path());
        let source = ContentSource::new(
            Arc::new(MockNotionApi::new().failing()),
            "db",
            Default::default(),
        );

        assert!(Generator::new(&blog).unwrap().generate(&source).await.is_err());
        assert!(!blog.public_dir.join("index.html").exists());
    }

    #[test]
    fn test_category_names_stay_inside_their_own_directories() {
        let dir = tempfile::tempdir().unwrap();
        let blog = blog(dir.path());

        let mut posts = Vec::new();
        for (id, slug, category) in [
            ("1", "alpha", "Tech"),
            ("2", "beta", ".."),
            ("3", "gamma", "C++"),
            ("4", "delta", "C"),
        ] {
            let mut post = Post::new(id, slug, slug);
            post.category = Some(category.to_string());
            posts.push(post);
        }
        let bodies = vec![String::new(); posts.len()];

        Generator::new(&blog).unwrap().write_site(&posts, &bodies).unwrap();

        let index = read(&blog, "index.html");
        assert!(index.contains(r#"href="/blog/alpha""#));
        assert!(index.contains(r#"href="/blog/beta""#));
        assert!(index.contains(r#"href="/categories/category-2e2e/""#));

        let dotdot = read(&blog, "categories/category-2e2e/index.html");
        assert!(dotdot.contains(r#"href="/blog/beta""#));
        assert!(!dotdot.contains(r#"href="/blog/alpha""#));

        let c = read(&blog, "categories/c/index.html");
        assert!(c.contains(r#"href="/blog/delta""#));
        assert!(!c.contains(r#"href="/blog/gamma""#));

        let cpp = read(&blog, "categories/c-2/index.html");
        assert!(cpp.contains(r#"href="/blog/gamma""#));
        assert!(!cpp.contains(r#"href="/blog/delta""#));
    }

    #[test]
    fn test_unusable_slugs_are_left_out_of_sitemap_and_index() {
        let dir = tempfile::tempdir().unwrap();
        let blog = blog(dir.path());
        let posts = vec![
            Post::new("1", "Good", "good"),
            Post::new("2", "Empty", ""),
            Post::new("3", "Up", "../up"),
        ];
        let bodies = vec![String::new(); posts.len()];

        Generator::new(&blog).unwrap().write_site(&posts, &bodies).unwrap();

        let sitemap = read(&blog, "sitemap.xml");
        assert!(sitemap.contains("<loc>https://blog.example.com/blog/good</loc>"));
        assert!(!sitemap.contains("<loc>https://blog.example.com/blog/</loc>"));
        assert!(!sitemap.contains("up</loc>"));
        assert!(blog.public_dir.join("blog/good/index.html").exists());
        assert!(!blog.public_dir.join("up").exists());

        let index: Vec<serde_json::Value> =
            serde_json::from_str(&read(&blog, "search.json")).unwrap();
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_links_share_one_origin() {
        let dir = tempfile::tempdir().unwrap();
        // a leftover `root` key is ignored; `url` is the only base
        let config: SiteConfig =
            serde_yaml::from_str("url: https://b.example/\nroot: /notes/\n").unwrap();
        let blog = Blog::with_config(dir.path(), config);
        let posts = vec![Post::new("1", "Alpha", "alpha")];

        Generator::new(&blog).unwrap().write_site(&posts, &[String::new()]).unwrap();

        assert!(read(&blog, "index.html").contains(r#"href="/blog/alpha""#));
        assert!(read(&blog, "index.html").contains(r#"<a href="/"><strong>"#));
        assert!(read(&blog, "blog/alpha/index.html")
            .contains(r#"<link rel="canonical" href="https://b.example/blog/alpha">"#));
        assert!(read(&blog, "sitemap.xml").contains("<loc>https://b.example/blog/alpha</loc>"));
    }

    #[test]
    fn test_write_site_without_posts() {
        let dir = tempfile::tempdir().unwrap();
        let blog = blog(dir.path());

        Generator::new(&blog).unwrap().write_site(&[], &[]).unwrap();

        assert!(read(&blog, "index.html").contains("아직 게시된 글이 없습니다."));
        assert!(!blog.public_dir.join("page/2").exists());
        assert!(!blog.public_dir.join("categories").exists());
        assert_eq!(read(&blog, "search.json").trim(), "[]");
    }
}
