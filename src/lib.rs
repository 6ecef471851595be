//! notion-blog: a blog front end backed by a Notion database
//!
//! Posts are read from a Notion database, converted to markdown and rendered
//! with built-in Tera templates, either per request by the HTTP server or
//! once into a static site.

pub mod commands;
pub mod config;
pub mod content;
pub mod generator;
pub mod helpers;
pub mod notion;
pub mod pagination;
pub mod seo;
pub mod server;
pub mod templates;
pub mod views;

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};

/// The main blog application
#[derive(Clone)]
pub struct Blog {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Public (output) directory
    pub public_dir: PathBuf,
}

impl Blog {
    /// Create a blog from a directory, reading `_config.yml` (or `config_file`)
    /// and environment overrides
    pub fn new<P: AsRef<Path>>(base_dir: P, config_file: Option<&Path>) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();

        // .env next to the site, then the process environment
        let _ = dotenvy::from_path(base_dir.join(".env"));

        let config_path = match config_file {
            Some(path) if path.is_absolute() => path.to_path_buf(),
            Some(path) => base_dir.join(path),
            None => base_dir.join("_config.yml"),
        };

        let mut config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else if config_file.is_some() {
            anyhow::bail!("Config file not found: {:?}", config_path);
        } else {
            config::SiteConfig::default()
        };
        config.apply_env();

        Ok(Self::with_config(base_dir, config))
    }

    /// Create a blog from an already loaded configuration
    pub fn with_config<P: AsRef<Path>>(base_dir: P, config: config::SiteConfig) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();
        let public_dir = base_dir.join(&config.public_dir);

        Self {
            config,
            base_dir,
            public_dir,
        }
    }

    /// Connect to the configured Notion database
    pub fn content_source(&self) -> Result<content::ContentSource> {
        content::ContentSource::from_config(&self.config.notion)
            .context("Failed to set up the Notion client")
    }

    /// Generate the static site
    pub async fn generate(&self) -> Result<()> {
        let source = self.content_source()?;
        commands::generate::run(self, &source).await
    }

    /// Clean the public directory
    pub fn clean(&self) -> Result<()> {
        commands::clean::run(self)
    }
}
