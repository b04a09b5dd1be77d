//! Typed errors for the knowledge pipeline.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.
//!
//! Every error here is terminal for the operation that raised it: there is
//! no retry loop anywhere in this crate. Callers log once at the boundary
//! where the error is finally surfaced.

use thiserror::Error;

/// Errors that can occur during knowledge operations.
#[derive(Debug, Error)]
pub enum KnowledgeError {
    /// The model call could not be completed (network, timeout, non-2xx)
    #[error("model transport failure: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The model's output could not be parsed even after fence-trimming
    /// and one repair pass. Carries both texts for diagnostics.
    #[error("model response is not parseable JSON (original {} bytes, repaired {} bytes)", .original.len(), .repaired.len())]
    MalformedResponse { original: String, repaired: String },

    /// Parsed JSON was not an object at the top level
    #[error("expected a JSON object, found {found}")]
    SchemaViolation { found: &'static str },

    /// Similarity requested on a zero-norm or mismatched-length vector pair
    #[error("degenerate vector: {reason}")]
    DegenerateVector { reason: String },

    /// Page fetch failed
    #[error("crawl failed: {0}")]
    Crawl(#[from] CrawlError),

    /// Storage operation failed
    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Embedding generation failed
    #[error("embedding error: {0}")]
    Embedding(String),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),
}

/// Errors that can occur while fetching a page.
#[derive(Debug, Error)]
pub enum CrawlError {
    /// Invalid URL format
    #[error("invalid URL: {url}")]
    InvalidUrl { url: String },

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Non-success HTTP status
    #[error("HTTP status {status} fetching {url}")]
    Status { url: String, status: u16 },

    /// Connection timeout
    #[error("timeout fetching: {url}")]
    Timeout { url: String },

    /// Response body exceeded the size ceiling
    #[error("response too large: {size} bytes (max {max})")]
    TooLarge { size: usize, max: usize },

    /// Page yielded no usable text content
    #[error("page has no usable text content: {url}")]
    EmptyContent { url: String },
}

/// Result type alias for knowledge operations.
pub type Result<T> = std::result::Result<T, KnowledgeError>;

/// Result type alias for crawl operations.
pub type CrawlResult<T> = std::result::Result<T, CrawlError>;
