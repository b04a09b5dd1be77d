//! Pure Moonshot REST API client
//!
//! A clean, minimal client for the Moonshot API with no domain-specific logic.
//! Moonshot exposes an OpenAI-compatible wire format, so the same types also
//! drive the embedding client for BGE-M3 style `/embeddings` endpoints.
//!
//! # Example
//!
//! ```rust,ignore
//! use moonshot_client::{MoonshotClient, ChatRequest, Message};
//!
//! let client = MoonshotClient::from_env()?;
//!
//! let response = client.chat_completion(ChatRequest {
//!     model: "moonshot-v1-8k".into(),
//!     messages: vec![Message::user("Hello!")],
//!     ..Default::default()
//! }).await?;
//! ```

pub mod error;
pub mod types;

pub use error::{MoonshotError, Result};
pub use types::*;

use reqwest::Client;
use tracing::{debug, warn};

const DEFAULT_BASE_URL: &str = "https://api.moonshot.cn/v1";
const DEFAULT_MODEL: &str = "moonshot-v1-8k";
const DEFAULT_EMBEDDING_BASE_URL: &str = "https://api.bgem3.com/v1";

/// Pure Moonshot API client.
#[derive(Clone)]
pub struct MoonshotClient {
    http_client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl MoonshotClient {
    /// Create a new Moonshot client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    /// Create from environment variable `MOONSHOT_API_KEY`.
    ///
    /// `MOONSHOT_BASE_URL` and `MOONSHOT_MODEL` override the defaults.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("MOONSHOT_API_KEY")
            .map_err(|_| MoonshotError::Config("MOONSHOT_API_KEY not set".into()))?;
        let mut client = Self::new(api_key);
        if let Ok(url) = std::env::var("MOONSHOT_BASE_URL") {
            client.base_url = url;
        }
        if let Ok(model) = std::env::var("MOONSHOT_MODEL") {
            client.model = model;
        }
        Ok(client)
    }

    /// Set a custom base URL (for proxies or compatible providers).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the default chat model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Get the default chat model.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Chat completion.
    ///
    /// Send messages to the chat completion API and get a response.
    pub async fn chat_completion(&self, request: ChatRequest) -> Result<ChatResponse> {
        let start = std::time::Instant::now();

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Moonshot request failed");
                MoonshotError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "Moonshot API error");
            return Err(MoonshotError::Api(format!(
                "Moonshot API error: {}",
                error_text
            )));
        }

        let chat_response: types::ChatResponseRaw = response
            .json()
            .await
            .map_err(|e| MoonshotError::Parse(e.to_string()))?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| MoonshotError::Api("No response from Moonshot".into()))?;

        debug!(
            model = %request.model,
            duration_ms = start.elapsed().as_millis(),
            "Moonshot chat completion"
        );

        Ok(ChatResponse {
            content,
            usage: chat_response.usage,
        })
    }
}

/// Client for an OpenAI-compatible embedding endpoint (BGE-M3).
#[derive(Clone)]
pub struct EmbeddingClient {
    http_client: Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl EmbeddingClient {
    /// Create a new embedding client with the given API key and base URL.
    pub fn new(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            api_key: api_key.into(),
            base_url: base_url.into(),
            model: "bge-m3".to_string(),
        }
    }

    /// Create from environment variable `BGE_API_KEY`.
    ///
    /// `BGE_BASE_URL` and `BGE_MODEL` override the defaults.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("BGE_API_KEY")
            .map_err(|_| MoonshotError::Config("BGE_API_KEY not set".into()))?;
        let base_url = std::env::var("BGE_BASE_URL")
            .unwrap_or_else(|_| DEFAULT_EMBEDDING_BASE_URL.to_string());
        let mut client = Self::new(api_key, base_url);
        if let Ok(model) = std::env::var("BGE_MODEL") {
            client.model = model;
        }
        Ok(client)
    }

    /// Set the embedding model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Create an embedding for a single text.
    pub async fn create_embedding(&self, text: &str) -> Result<Vec<f32>> {
        let mut embeddings = self.create_embeddings_batch(&[text]).await?;
        embeddings
            .pop()
            .ok_or_else(|| MoonshotError::Api("No embedding in response".into()))
    }

    /// Create embeddings for multiple texts in one request.
    pub async fn create_embeddings_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let request = types::EmbeddingRequest {
            model: self.model.clone(),
            input: texts.iter().map(|t| t.to_string()).collect(),
        };

        let response = self
            .http_client
            .post(format!("{}/embeddings", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Embedding request failed");
                MoonshotError::Network(e.to_string())
            })?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(error = %error_text, "Embedding API error");
            return Err(MoonshotError::Api(format!(
                "Embedding API error: {}",
                error_text
            )));
        }

        let embed_response: types::EmbeddingResponse = response
            .json()
            .await
            .map_err(|e| MoonshotError::Parse(e.to_string()))?;

        Ok(embed_response
            .data
            .into_iter()
            .map(|d| d.embedding)
            .collect())
    }
}
