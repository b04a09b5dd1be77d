//! Knowledge extraction, repair, and merge pipeline.
//!
//! Fetched web pages are reduced to plain text, sent to an LLM that extracts
//! categorized key/value knowledge, and the near-JSON response is repaired
//! and normalized into a canonical `category -> array-of-strings` shape.
//! Multiple knowledge maps can be merged into one de-duplicated map, and
//! stored items are ranked against query embeddings by cosine similarity.
//!
//! # Design
//!
//! - The repair engine and canonicalizer are pure functions with no I/O,
//!   safe to call concurrently.
//! - Each orchestrator ([`extract_knowledge`], [`merge_knowledge`]) makes at
//!   most one model call and never retries; failures surface as typed
//!   [`KnowledgeError`] values.
//! - Model access goes through the [`ChatModel`] / [`Embedder`] traits so
//!   the pipeline is testable against the mocks in [`testing`].
//!
//! # Usage
//!
//! ```rust,ignore
//! use knowledge::{extract_knowledge, merge_knowledge};
//! use moonshot_client::MoonshotClient;
//!
//! let model = MoonshotClient::from_env()?;
//! let first = extract_knowledge(&model, &page_text).await?;
//! let second = extract_knowledge(&model, &other_text).await?;
//! let merged = merge_knowledge(&model, &[first, second]).await?;
//! ```
//!
//! # Modules
//!
//! - [`repair`] - best-effort repair of near-JSON text
//! - [`canonical`] - the [`KnowledgeMap`] shape and normalization into it
//! - [`pipeline`] - extraction and merge orchestration
//! - [`similarity`] - cosine similarity and ranking
//! - [`model`] - [`ChatModel`] / [`Embedder`] trait abstractions
//! - [`ingest`] - page fetching and HTML-to-text extraction
//! - [`store`] - persistence for pages, knowledge, and vectors
//! - [`mindmap`] - node/edge graph projection for rendering
//! - [`testing`] - mock implementations for tests

pub mod canonical;
pub mod error;
pub mod ingest;
pub mod mindmap;
pub mod model;
pub mod pipeline;
pub mod repair;
pub mod similarity;
pub mod store;
pub mod testing;

// Re-export core types at crate root
pub use canonical::{canonicalize, KnowledgeMap};
pub use error::{CrawlError, KnowledgeError, Result};
pub use mindmap::{build_mindmap, MindMap, MindMapEdge, MindMapNode, NodeKind};
pub use model::{ChatModel, Embedder, ModelRequest};
pub use pipeline::{extract_knowledge, merge_knowledge, parse_model_response};
pub use repair::{repair, strip_code_fence};
pub use similarity::{cosine_similarity, rank_by_similarity, Scored};

// Re-export ingestion
pub use ingest::{FetchedPage, PageFetcher};

// Re-export stores
pub use store::{
    knowledge_map_from_items, CategoryVectors, KnowledgeItem, KnowledgeStore, MemoryStore,
    NewPage, ScoredKnowledge, StoredPage,
};

#[cfg(feature = "sqlite")]
pub use store::SqliteStore;
