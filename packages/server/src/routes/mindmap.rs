use axum::extract::State;
use axum::Json;

use knowledge::{build_mindmap, knowledge_map_from_items, MindMap};

use crate::app::AppState;
use crate::error::ApiError;

const ROOT_LABEL: &str = "Knowledge Base";

/// Render the accumulated knowledge as a mind-map graph.
pub async fn mindmap_handler(State(state): State<AppState>) -> Result<Json<MindMap>, ApiError> {
    let items = state.store.all_items().await?;
    let knowledge = knowledge_map_from_items(&items);
    Ok(Json(build_mindmap(ROOT_LABEL, &knowledge)))
}
