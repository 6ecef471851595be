//! HTTP server rendering pages per request

use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::content::ContentSource;
use crate::pagination::ListingQuery;
use crate::seo::{robots_txt, sitemap_xml};
use crate::templates::NotFoundPage;
use crate::views::{Rendered, Views};
use crate::Blog;

/// Server state
pub struct AppState {
    pub views: Views,
    pub source: ContentSource,
}

impl AppState {
    pub fn new(blog: &Blog, source: ContentSource) -> Result<Self> {
        Ok(Self {
            views: Views::new(&blog.config)?,
            source,
        })
    }
}

/// Build the router
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/blog/:slug", get(post_handler))
        .route("/sitemap.xml", get(sitemap_handler))
        .route("/robots.txt", get(robots_handler))
        .fallback(fallback_handler)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the server
pub async fn start(blog: &Blog, ip: &str, port: u16) -> Result<()> {
    let source = blog.content_source()?;
    let state = Arc::new(AppState::new(blog, source)?);
    let app = router(state);

    // Parse address - handle "localhost" specially
    let bind_ip = if ip == "localhost" { "127.0.0.1" } else { ip };
    let addr: SocketAddr = format!("{}:{}", bind_ip, port).parse()?;

    println!("Server running at http://{}:{}", ip, port);
    println!("Press Ctrl+C to stop.");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

async fn index_handler(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListingQuery>,
) -> Response {
    match state.views.listing(&state.source, &query).await {
        Ok(html) => Html(html).into_response(),
        Err(e) => render_error(e),
    }
}

async fn post_handler(State(state): State<Arc<AppState>>, Path(slug): Path<String>) -> Response {
    match state.views.post(&state.source, &slug).await {
        Ok(Rendered::Found(html)) => Html(html).into_response(),
        Ok(Rendered::NotFound(html)) => (StatusCode::NOT_FOUND, Html(html)).into_response(),
        Err(e) => render_error(e),
    }
}

async fn sitemap_handler(State(state): State<Arc<AppState>>) -> Response {
    let slugs = state.source.fetch_all_slugs().await;
    let xml = sitemap_xml(state.views.config().base_url(), &slugs);
    ([(header::CONTENT_TYPE, "application/xml")], xml).into_response()
}

async fn robots_handler(State(state): State<Arc<AppState>>) -> Response {
    let body = robots_txt(state.views.config().base_url());
    ([(header::CONTENT_TYPE, "text/plain")], body).into_response()
}

async fn fallback_handler(State(state): State<Arc<AppState>>) -> Response {
    match state.views.render_not_found(&NotFoundPage::page_missing()) {
        Ok(html) => (StatusCode::NOT_FOUND, Html(html)).into_response(),
        Err(e) => render_error(e),
    }
}

fn render_error(e: anyhow::Error) -> Response {
    tracing::error!("Render failed: {:#}", e);
    (StatusCode::INTERNAL_SERVER_ERROR, "Server error").into_response()
}
