//! Extraction and merge orchestration.
//!
//! Each orchestrator builds a prompt, makes exactly one model call, and runs
//! the shared response-parsing path over the result. There is no retry loop:
//! a transport or parse failure after the single repair attempt surfaces to
//! the caller.

pub mod extract;
pub mod merge;
pub mod prompts;

pub use extract::extract_knowledge;
pub use merge::merge_knowledge;
pub use prompts::{
    format_extract_user, format_merge_user, EXTRACT_SYSTEM_PROMPT, MERGE_SYSTEM_PROMPT,
};

use serde_json::Value;
use tracing::debug;

use crate::canonical::{canonicalize, KnowledgeMap};
use crate::error::{KnowledgeError, Result};
use crate::repair::{repair, strip_code_fence};

/// Parse a raw model response into a [`KnowledgeMap`].
///
/// Fence-trim first, then a direct parse; only on parse failure run the
/// repair pipeline and parse once more. A second failure is terminal and
/// carries both texts for diagnostics.
pub fn parse_model_response(raw: &str) -> Result<KnowledgeMap> {
    let trimmed = strip_code_fence(raw);
    match serde_json::from_str::<Value>(trimmed) {
        Ok(value) => canonicalize(&value),
        Err(parse_err) => {
            debug!(error = %parse_err, "direct parse failed, attempting repair");
            let repaired = repair(trimmed);
            match serde_json::from_str::<Value>(&repaired) {
                Ok(value) => canonicalize(&value),
                Err(_) => Err(KnowledgeError::MalformedResponse {
                    original: raw.to_string(),
                    repaired,
                }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid_response() {
        let knowledge = parse_model_response(r#"{"a": ["x"]}"#).unwrap();
        assert_eq!(knowledge.get("a"), Some(&["x".to_string()][..]));
    }

    #[test]
    fn test_parse_fenced_response() {
        let knowledge = parse_model_response("```json\n{\"a\": [\"1\"]}\n```").unwrap();
        assert_eq!(knowledge.get("a"), Some(&["1".to_string()][..]));
    }

    #[test]
    fn test_parse_repairs_near_json() {
        let knowledge = parse_model_response("{\"名称\": 北大, \"年份\": [1998]").unwrap();
        assert_eq!(knowledge.get("名称"), Some(&["北大".to_string()][..]));
        assert_eq!(knowledge.get("年份"), Some(&["1998".to_string()][..]));
    }

    #[test]
    fn test_parse_failure_carries_diagnostics() {
        let err = parse_model_response("not json at all }{").unwrap_err();
        match err {
            KnowledgeError::MalformedResponse { original, repaired } => {
                assert_eq!(original, "not json at all }{");
                assert!(!repaired.is_empty());
            }
            other => panic!("expected MalformedResponse, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_array_is_schema_violation() {
        // a fenced array parses but fails canonicalization
        let err = parse_model_response("```json\n[1, 2]\n```").unwrap_err();
        assert!(matches!(err, KnowledgeError::SchemaViolation { .. }));
    }
}
