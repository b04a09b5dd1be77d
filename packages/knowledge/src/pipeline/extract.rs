//! Knowledge extraction from plain text.

use tracing::debug;

use crate::canonical::KnowledgeMap;
use crate::error::Result;
use crate::model::{ChatModel, ModelRequest};
use crate::pipeline::prompts::{format_extract_user, EXTRACT_SYSTEM_PROMPT};
use crate::pipeline::parse_model_response;

/// Sampling temperature for extraction; low to favor determinism.
pub const EXTRACT_TEMPERATURE: f32 = 0.2;

/// Extract categorized knowledge from plain text.
///
/// The caller is responsible for bounding the input length (the HTTP layer
/// truncates to its content ceiling before calling in). One model call, one
/// repair attempt, no retries.
pub async fn extract_knowledge<M>(model: &M, content: &str) -> Result<KnowledgeMap>
where
    M: ChatModel + ?Sized,
{
    let request = ModelRequest {
        system: EXTRACT_SYSTEM_PROMPT.to_string(),
        user: format_extract_user(content),
        temperature: EXTRACT_TEMPERATURE,
        max_tokens: None,
        json_output: true,
    };

    let raw = model.complete(request).await?;
    debug!(response_len = raw.len(), "extraction response received");

    parse_model_response(&raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::KnowledgeError;
    use crate::testing::MockChatModel;

    #[tokio::test]
    async fn test_extracts_from_clean_response() {
        let model = MockChatModel::new().with_response(r#"{"school": ["PKU"]}"#);
        let knowledge = extract_knowledge(&model, "PKU was founded in 1898.")
            .await
            .unwrap();
        assert_eq!(knowledge.get("school"), Some(&["PKU".to_string()][..]));
    }

    #[tokio::test]
    async fn test_extracts_from_fenced_response() {
        let model = MockChatModel::new().with_response("```json\n{\"a\": [\"1\"]}\n```");
        let knowledge = extract_knowledge(&model, "text").await.unwrap();
        assert_eq!(knowledge.get("a"), Some(&["1".to_string()][..]));
    }

    #[tokio::test]
    async fn test_scalar_values_canonicalized() {
        let model = MockChatModel::new().with_response(r#"{"motto": "seek truth"}"#);
        let knowledge = extract_knowledge(&model, "text").await.unwrap();
        assert_eq!(knowledge.get("motto"), Some(&["seek truth".to_string()][..]));
    }

    #[tokio::test]
    async fn test_request_shape() {
        let model = MockChatModel::new().with_response("{}");
        extract_knowledge(&model, "some page text").await.unwrap();

        let calls = model.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].system, EXTRACT_SYSTEM_PROMPT);
        assert!(calls[0].user.contains("some page text"));
        assert!((calls[0].temperature - 0.2).abs() < f32::EPSILON);
        assert!(calls[0].json_output);
    }

    #[tokio::test]
    async fn test_unparseable_response_is_malformed() {
        let model = MockChatModel::new().with_response("I could not find any JSON }{");
        let err = extract_knowledge(&model, "text").await.unwrap_err();
        assert!(matches!(err, KnowledgeError::MalformedResponse { .. }));
    }

    #[tokio::test]
    async fn test_transport_failure_surfaces() {
        // mock with no scripted responses fails the call itself
        let model = MockChatModel::new();
        let err = extract_knowledge(&model, "text").await.unwrap_err();
        assert!(matches!(err, KnowledgeError::Transport(_)));
    }
}
