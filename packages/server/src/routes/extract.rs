use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use knowledge::{extract_knowledge, CategoryVectors, Embedder, KnowledgeMap};
use moonshot_client::truncate_chars;

use crate::app::AppState;
use crate::error::ApiError;

#[derive(Deserialize)]
pub struct ExtractRequest {
    pub content: String,

    /// When present, the extracted knowledge (and embeddings, best-effort)
    /// is persisted against this page.
    #[serde(default)]
    pub page_id: Option<i64>,
}

#[derive(Serialize)]
pub struct ExtractResponse {
    pub knowledge: KnowledgeMap,
}

/// Extract categorized knowledge from plain text.
pub async fn extract_handler(
    State(state): State<AppState>,
    Json(request): Json<ExtractRequest>,
) -> Result<Json<ExtractResponse>, ApiError> {
    if request.content.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "content must not be empty".to_string(),
        ));
    }

    let content = truncate_chars(&request.content, state.max_content_chars);
    info!(content_len = content.len(), "extraction requested");

    let knowledge = extract_knowledge(state.chat.as_ref(), content).await?;
    info!(categories = knowledge.len(), "extraction complete");

    if let Some(page_id) = request.page_id {
        let vectors = embed_knowledge(state.embedder.as_ref(), &knowledge).await;
        state
            .store
            .store_knowledge(page_id, &knowledge, &vectors)
            .await?;
        info!(page_id, "knowledge stored");
    }

    Ok(Json(ExtractResponse { knowledge }))
}

/// Embed every knowledge value, category by category.
///
/// Embedding failures are not fatal: the affected category is stored without
/// vectors and excluded from similarity search.
async fn embed_knowledge(embedder: &dyn Embedder, knowledge: &KnowledgeMap) -> CategoryVectors {
    let mut vectors = CategoryVectors::new();
    for (category, values) in knowledge.iter() {
        let texts: Vec<&str> = values.iter().map(|v| v.as_str()).collect();
        match embedder.embed_batch(&texts).await {
            Ok(batch) => {
                vectors.insert(category.to_string(), batch);
            }
            Err(e) => {
                warn!(category, error = %e, "embedding failed; storing without vectors");
            }
        }
    }
    vectors
}
