//! Generate static files

use anyhow::Result;

use crate::content::ContentSource;
use crate::generator::Generator;
use crate::Blog;

/// Generate the static site from `source`
pub async fn run(blog: &Blog, source: &ContentSource) -> Result<()> {
    let start = std::time::Instant::now();

    let generator = Generator::new(blog)?;
    generator.generate(source).await?;

    let duration = start.elapsed();
    tracing::info!(
        "Generated {:?} in {:.2}s",
        blog.public_dir,
        duration.as_secs_f64()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SiteConfig;
    use crate::notion::mock::{MockNotionApi, PageSpec};
    use std::sync::Arc;

    #[tokio::test]
    async fn test_run_writes_public_dir() {
        let dir = tempfile::tempdir().unwrap();
        let blog = Blog::with_config(dir.path(), SiteConfig::default());
        let api = MockNotionApi::new()
            .with_pages(vec![PageSpec::published("1", "Hello", "hello").date("2024-01-01")]);
        let source = ContentSource::new(Arc::new(api), "db", Default::default());

        run(&blog, &source).await.unwrap();

        assert!(blog.public_dir.join("index.html").exists());
        assert!(blog.public_dir.join("blog/hello/index.html").exists());
    }
}
