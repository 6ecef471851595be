//! CLI entry point for notion-blog

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use notion_blog::Blog;

#[derive(Parser)]
#[command(name = "notion-blog")]
#[command(author = "Yukang Chen")]
#[command(version)]
#[command(about = "A blog front end that renders posts from a Notion database", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Config file, relative to the base directory (defaults to _config.yml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the blog server
    #[command(alias = "s")]
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// IP address to bind to
        #[arg(short, long, default_value = "localhost")]
        ip: String,
    },

    /// Generate static files
    #[command(alias = "g")]
    Generate,

    /// List published content
    List {
        /// Type of content to list (post, category)
        #[arg(default_value = "post")]
        r#type: String,
    },

    /// Clean the public folder
    Clean,

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "notion_blog=debug,info"
    } else {
        "notion_blog=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir().context("Failed to read the current directory")?,
    };

    // .env in the working directory, if any
    let _ = dotenvy::dotenv();

    match cli.command {
        Commands::Serve { port, ip } => {
            let blog = Blog::new(&base_dir, cli.config.as_deref())?;
            tracing::info!("Starting server at http://{}:{}", ip, port);
            notion_blog::server::start(&blog, &ip, port).await?;
        }

        Commands::Generate => {
            let blog = Blog::new(&base_dir, cli.config.as_deref())?;
            tracing::info!("Generating static files...");
            blog.generate().await?;
            println!("Generated successfully!");
        }

        Commands::List { r#type } => {
            let blog = Blog::new(&base_dir, cli.config.as_deref())?;
            let source = blog.content_source()?;
            notion_blog::commands::list::run(&source, &r#type).await?;
        }

        Commands::Clean => {
            let blog = Blog::new(&base_dir, cli.config.as_deref())?;
            tracing::info!("Cleaning public folder...");
            blog.clean()?;
            println!("Cleaned successfully!");
        }

        Commands::Version => {
            println!("notion-blog version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
