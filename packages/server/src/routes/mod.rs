//! HTTP route handlers.

pub mod crawl;
pub mod extract;
pub mod health;
pub mod merge;
pub mod mindmap;
pub mod search;

pub use crawl::crawl_handler;
pub use extract::extract_handler;
pub use health::health_handler;
pub use merge::merge_handler;
pub use mindmap::mindmap_handler;
pub use search::search_handler;
