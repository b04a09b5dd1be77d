//! Testing utilities including mock implementations.
//!
//! Useful for testing applications that use the knowledge pipeline without
//! making real model or network calls.

use std::collections::VecDeque;
use std::sync::Mutex;

use async_trait::async_trait;
use sha2::{Digest, Sha256};

use crate::error::{KnowledgeError, Result};
use crate::model::{ChatModel, Embedder, ModelRequest};

/// A mock chat model that replays scripted responses.
///
/// Responses are consumed in order; a call with no scripted response left
/// fails with a transport error. All requests are recorded for assertions.
#[derive(Default)]
pub struct MockChatModel {
    responses: Mutex<VecDeque<String>>,
    calls: Mutex<Vec<ModelRequest>>,
}

impl MockChatModel {
    /// Create a mock with no scripted responses.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response to be returned by the next unanswered call.
    pub fn with_response(self, response: impl Into<String>) -> Self {
        self.responses.lock().unwrap().push_back(response.into());
        self
    }

    /// All requests made so far.
    pub fn calls(&self) -> Vec<ModelRequest> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of requests made so far.
    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

#[async_trait]
impl ChatModel for MockChatModel {
    async fn complete(&self, request: ModelRequest) -> Result<String> {
        self.calls.lock().unwrap().push(request);
        self.responses.lock().unwrap().pop_front().ok_or_else(|| {
            KnowledgeError::Transport(Box::new(std::io::Error::new(
                std::io::ErrorKind::Other,
                "mock model has no scripted response",
            )))
        })
    }
}

/// A deterministic embedder for tests.
///
/// Hashes the text with SHA-256 and expands the digest into a vector, so the
/// same text always embeds identically.
pub struct MockEmbedder {
    dim: usize,
}

impl Default for MockEmbedder {
    fn default() -> Self {
        Self::new()
    }
}

impl MockEmbedder {
    /// Create a mock embedder with the default dimension.
    pub fn new() -> Self {
        Self { dim: 1024 }
    }

    /// Set the embedding dimension.
    pub fn with_dim(mut self, dim: usize) -> Self {
        self.dim = dim;
        self
    }
}

#[async_trait]
impl Embedder for MockEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let mut hasher = Sha256::new();
        hasher.update(text.as_bytes());
        let hash = hasher.finalize();

        Ok((0..self.dim)
            .map(|i| {
                let byte = hash[i % 32] as f32;
                (byte / 127.5) - 1.0
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_model_replays_in_order() {
        let model = MockChatModel::new()
            .with_response("first")
            .with_response("second");

        let request = ModelRequest {
            system: "s".into(),
            user: "u".into(),
            temperature: 0.0,
            max_tokens: None,
            json_output: false,
        };

        assert_eq!(model.complete(request.clone()).await.unwrap(), "first");
        assert_eq!(model.complete(request.clone()).await.unwrap(), "second");
        assert!(model.complete(request).await.is_err());
        assert_eq!(model.call_count(), 3);
    }

    #[tokio::test]
    async fn test_mock_embedder_is_deterministic() {
        let embedder = MockEmbedder::new().with_dim(8);
        let a = embedder.embed("hello").await.unwrap();
        let b = embedder.embed("hello").await.unwrap();
        let c = embedder.embed("world").await.unwrap();
        assert_eq!(a.len(), 8);
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
