//! Moonshot implementations of the model traits.

use async_trait::async_trait;
use moonshot_client::{ChatRequest, EmbeddingClient, Message, MoonshotClient};

use crate::error::{KnowledgeError, Result};
use crate::model::{ChatModel, Embedder, ModelRequest};

#[async_trait]
impl ChatModel for MoonshotClient {
    async fn complete(&self, request: ModelRequest) -> Result<String> {
        let mut chat = ChatRequest::new(self.model())
            .message(Message::system(request.system))
            .message(Message::user(request.user))
            .temperature(request.temperature);
        if let Some(max_tokens) = request.max_tokens {
            chat = chat.max_tokens(max_tokens);
        }
        if request.json_output {
            chat = chat.json_mode();
        }

        let response = self
            .chat_completion(chat)
            .await
            .map_err(|e| KnowledgeError::Transport(Box::new(e)))?;
        Ok(response.content)
    }
}

#[async_trait]
impl Embedder for EmbeddingClient {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.create_embedding(text)
            .await
            .map_err(|e| KnowledgeError::Embedding(e.to_string()))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        self.create_embeddings_batch(texts)
            .await
            .map_err(|e| KnowledgeError::Embedding(e.to_string()))
    }
}
