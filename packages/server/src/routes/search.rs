use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use knowledge::ScoredKnowledge;

use crate::app::AppState;
use crate::error::ApiError;

fn default_limit() -> usize {
    5
}

#[derive(Deserialize)]
pub struct SearchRequest {
    pub query: String,

    #[serde(default = "default_limit")]
    pub limit: usize,
}

#[derive(Serialize)]
pub struct SearchResponse {
    pub results: Vec<ScoredKnowledge>,
}

/// Rank stored knowledge items against a query by embedding similarity.
pub async fn search_handler(
    State(state): State<AppState>,
    Json(request): Json<SearchRequest>,
) -> Result<Json<SearchResponse>, ApiError> {
    if request.query.trim().is_empty() {
        return Err(ApiError::BadRequest("query must not be empty".to_string()));
    }

    let embedding = state.embedder.embed(&request.query).await?;
    let results = state
        .store
        .search_similar(&embedding, request.limit)
        .await?;

    info!(
        query = %request.query,
        result_count = results.len(),
        "similarity search complete"
    );
    Ok(Json(SearchResponse { results }))
}
