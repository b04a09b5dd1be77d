use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use knowledge::{merge_knowledge, KnowledgeMap};

use crate::app::AppState;
use crate::error::ApiError;

#[derive(Deserialize)]
pub struct MergeRequest {
    pub items: Vec<KnowledgeMap>,
}

#[derive(Serialize)]
pub struct MergeResponse {
    pub knowledge: KnowledgeMap,
}

/// Merge knowledge maps into a single de-duplicated map.
pub async fn merge_handler(
    State(state): State<AppState>,
    Json(request): Json<MergeRequest>,
) -> Result<Json<MergeResponse>, ApiError> {
    if request.items.is_empty() {
        return Err(ApiError::BadRequest("items must not be empty".to_string()));
    }

    info!(input_count = request.items.len(), "merge requested");
    let knowledge = merge_knowledge(state.chat.as_ref(), &request.items).await?;

    Ok(Json(MergeResponse { knowledge }))
}
