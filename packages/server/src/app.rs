//! Application state and router construction.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use knowledge::{ChatModel, Embedder, KnowledgeStore, PageFetcher};

use crate::config::DEFAULT_MAX_CONTENT_CHARS;
use crate::routes::{
    crawl_handler, extract_handler, health_handler, merge_handler, mindmap_handler,
    search_handler,
};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn KnowledgeStore>,
    pub chat: Arc<dyn ChatModel>,
    pub embedder: Arc<dyn Embedder>,
    pub fetcher: Arc<PageFetcher>,
    pub max_content_chars: usize,
}

impl AppState {
    /// Create application state with the default content ceiling.
    pub fn new(
        store: Arc<dyn KnowledgeStore>,
        chat: Arc<dyn ChatModel>,
        embedder: Arc<dyn Embedder>,
    ) -> Self {
        Self {
            store,
            chat,
            embedder,
            fetcher: Arc::new(PageFetcher::new()),
            max_content_chars: DEFAULT_MAX_CONTENT_CHARS,
        }
    }

    /// Override the extraction input ceiling.
    pub fn with_max_content_chars(mut self, max_content_chars: usize) -> Self {
        self.max_content_chars = max_content_chars;
        self
    }
}

/// Build the Axum application router.
pub fn build_app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/crawl", post(crawl_handler))
        .route("/extract", post(extract_handler))
        .route("/merge", post(merge_handler))
        .route("/search", post(search_handler))
        .route("/mindmap", get(mindmap_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
