use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use knowledge::NewPage;

use crate::app::AppState;
use crate::error::ApiError;

#[derive(Deserialize)]
pub struct CrawlRequest {
    pub url: String,
}

#[derive(Serialize)]
pub struct CrawlResponse {
    pub page_id: i64,
    pub title: String,
    pub content: String,
}

/// Fetch a page, reduce it to plain text, and store it.
pub async fn crawl_handler(
    State(state): State<AppState>,
    Json(request): Json<CrawlRequest>,
) -> Result<Json<CrawlResponse>, ApiError> {
    if request.url.trim().is_empty() {
        return Err(ApiError::BadRequest("url must not be empty".to_string()));
    }

    info!(url = %request.url, "crawl requested");
    let page = state.fetcher.fetch(&request.url).await?;

    let page_id = state
        .store
        .store_page(&NewPage {
            url: page.url,
            title: page.title.clone(),
            content: page.content.clone(),
        })
        .await?;

    info!(page_id, title = %page.title, "page stored");
    Ok(Json(CrawlResponse {
        page_id,
        title: page.title,
        content: page.content,
    }))
}
