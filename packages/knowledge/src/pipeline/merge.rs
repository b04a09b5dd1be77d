//! Merging multiple knowledge maps into one.

use tracing::debug;

use crate::canonical::KnowledgeMap;
use crate::error::Result;
use crate::model::{ChatModel, ModelRequest};
use crate::pipeline::prompts::{format_merge_user, MERGE_SYSTEM_PROMPT};
use crate::pipeline::parse_model_response;

/// Sampling temperature for merging; lower than extraction.
pub const MERGE_TEMPERATURE: f32 = 0.1;

/// Output ceiling for merge calls. Merged content can be large, so the model
/// gets a generous allowance to echo it back.
pub const MERGE_MAX_TOKENS: u32 = 4000;

/// Merge knowledge maps into a single de-duplicated map.
///
/// De-duplication semantics are delegated to the model; this orchestrator
/// faithfully transmits every input (sequence order preserved in the prompt)
/// and canonicalizes whatever comes back. A single input is returned
/// unchanged with no model call; an empty input yields an empty map. This is
/// a single-shot batch operation: adding one more map means re-sending the
/// full batch.
pub async fn merge_knowledge<M>(model: &M, inputs: &[KnowledgeMap]) -> Result<KnowledgeMap>
where
    M: ChatModel + ?Sized,
{
    match inputs {
        [] => Ok(KnowledgeMap::new()),
        [single] => Ok(single.clone()),
        _ => {
            let payload = serde_json::to_string(inputs)?;
            debug!(input_count = inputs.len(), "merging knowledge maps");

            let request = ModelRequest {
                system: MERGE_SYSTEM_PROMPT.to_string(),
                user: format_merge_user(&payload),
                temperature: MERGE_TEMPERATURE,
                max_tokens: Some(MERGE_MAX_TOKENS),
                json_output: true,
            };

            let raw = model.complete(request).await?;
            parse_model_response(&raw)
        }
    }
}
