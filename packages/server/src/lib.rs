//! HTTP surface for the knowledge extraction pipeline.
//!
//! Exposes the pipeline as a small JSON API:
//!
//! - `GET  /health`  - liveness plus store connectivity
//! - `POST /crawl`   - fetch a page, reduce to text, store it
//! - `POST /extract` - extract categorized knowledge from text
//! - `POST /merge`   - merge knowledge maps into one
//! - `POST /search`  - rank stored knowledge by embedding similarity
//! - `GET  /mindmap` - node/edge graph of the accumulated knowledge

pub mod app;
pub mod config;
pub mod error;
pub mod routes;

pub use app::{build_app, AppState};
pub use config::Config;
pub use error::ApiError;
