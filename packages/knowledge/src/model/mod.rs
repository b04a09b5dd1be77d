//! Model trait abstractions.
//!
//! The pipeline talks to the LLM service through [`ChatModel`] and to the
//! embedding service through [`Embedder`], so orchestration logic can be
//! tested against mocks without network access.

use async_trait::async_trait;

use crate::error::Result;

#[cfg(feature = "moonshot")]
mod moonshot;

/// A single chat completion request.
///
/// Mirrors what the LLM service consumes: a system instruction, a user
/// message, sampling temperature, an optional output-length ceiling, and a
/// flag requesting strict JSON output.
#[derive(Debug, Clone)]
pub struct ModelRequest {
    pub system: String,
    pub user: String,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
    pub json_output: bool,
}

/// Chat completion access.
///
/// Implementations wrap a specific provider and make exactly one outbound
/// call per `complete` invocation; the pipeline never retries.
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Send one chat completion and return the raw response text.
    async fn complete(&self, request: ModelRequest) -> Result<String>;
}

/// Embedding generation.
#[async_trait]
pub trait Embedder: Send + Sync {
    /// Generate an embedding vector for one text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embeddings for multiple texts.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.embed(text).await?);
        }
        Ok(results)
    }
}
