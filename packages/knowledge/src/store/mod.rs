//! Storage for pages, knowledge items, and their embedding vectors.
//!
//! The store keeps fetched pages, the knowledge extracted from them (one row
//! per category value), and an optional embedding vector per row for
//! similarity search.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::canonical::KnowledgeMap;
use crate::error::Result;
use crate::similarity::rank_by_similarity;

pub mod memory;

#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use memory::MemoryStore;

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;

/// A page about to be stored.
#[derive(Debug, Clone)]
pub struct NewPage {
    pub url: String,
    pub title: String,
    pub content: String,
}

/// A stored page.
#[derive(Debug, Clone, Serialize)]
pub struct StoredPage {
    pub id: i64,
    pub url: String,
    pub title: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// One stored knowledge value with its optional embedding.
#[derive(Debug, Clone)]
pub struct KnowledgeItem {
    pub id: i64,
    pub page_id: i64,
    pub category: String,
    pub content: String,
    pub vector: Option<Vec<f32>>,
}

/// A knowledge item ranked against a query vector.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredKnowledge {
    pub id: i64,
    pub page_id: i64,
    pub category: String,
    pub content: String,
    pub similarity: f32,
}

/// Embedding vectors per category, aligned index-for-index with the values
/// of a [`KnowledgeMap`]. Categories or positions without a vector are
/// stored vector-less and skipped by similarity search.
pub type CategoryVectors = HashMap<String, Vec<Vec<f32>>>;

/// Persistence for pages and extracted knowledge.
#[async_trait]
pub trait KnowledgeStore: Send + Sync {
    /// Check that the backing store is reachable.
    async fn ping(&self) -> Result<()>;

    /// Store a page, returning its id.
    async fn store_page(&self, page: &NewPage) -> Result<i64>;

    /// Fetch a stored page by id.
    async fn get_page(&self, page_id: i64) -> Result<Option<StoredPage>>;

    /// Store a page's knowledge map, one item per category value, with
    /// whatever embedding vectors are available.
    async fn store_knowledge(
        &self,
        page_id: i64,
        knowledge: &KnowledgeMap,
        vectors: &CategoryVectors,
    ) -> Result<()>;

    /// All knowledge items for one page, in storage order.
    async fn items_for_page(&self, page_id: i64) -> Result<Vec<KnowledgeItem>>;

    /// All knowledge items, in storage order.
    async fn all_items(&self) -> Result<Vec<KnowledgeItem>>;

    /// Rebuild the knowledge map for a page from its stored items.
    async fn knowledge_for_page(&self, page_id: i64) -> Result<KnowledgeMap> {
        let items = self.items_for_page(page_id).await?;
        Ok(knowledge_map_from_items(&items))
    }

    /// Rank stored knowledge items by similarity to a query vector.
    ///
    /// Items without a vector, or with a degenerate one, are skipped. Ties
    /// keep storage order.
    async fn search_similar(&self, query: &[f32], limit: usize) -> Result<Vec<ScoredKnowledge>> {
        let items = self.all_items().await?;
        Ok(rank_items(items, query, limit))
    }
}

/// Group stored items back into a [`KnowledgeMap`].
pub fn knowledge_map_from_items(items: &[KnowledgeItem]) -> KnowledgeMap {
    let mut map = KnowledgeMap::new();
    for item in items {
        map.extend_category(item.category.clone(), [item.content.clone()]);
    }
    map
}

fn rank_items(items: Vec<KnowledgeItem>, query: &[f32], limit: usize) -> Vec<ScoredKnowledge> {
    let candidates = items.into_iter().filter_map(|mut item| {
        let vector = item.vector.take()?;
        Some((item, vector))
    });

    rank_by_similarity(query, candidates, limit)
        .into_iter()
        .map(|scored| ScoredKnowledge {
            id: scored.item.id,
            page_id: scored.item.page_id,
            category: scored.item.category,
            content: scored.item.content,
            similarity: scored.similarity,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item(id: i64, category: &str, content: &str, vector: Option<Vec<f32>>) -> KnowledgeItem {
        KnowledgeItem {
            id,
            page_id: 1,
            category: category.to_string(),
            content: content.to_string(),
            vector,
        }
    }

    #[test]
    fn test_knowledge_map_from_items_groups_by_category() {
        let items = vec![
            item(1, "name", "PKU", None),
            item(2, "campus", "Yanyuan", None),
            item(3, "name", "Peking University", None),
        ];
        let map = knowledge_map_from_items(&items);
        assert_eq!(
            map.get("name"),
            Some(&["PKU".to_string(), "Peking University".to_string()][..])
        );
        assert_eq!(map.get("campus"), Some(&["Yanyuan".to_string()][..]));
    }

    #[test]
    fn test_rank_items_skips_vectorless_rows() {
        let items = vec![
            item(1, "a", "no vector", None),
            item(2, "b", "match", Some(vec![1.0, 0.0])),
            item(3, "c", "weak", Some(vec![0.1, 0.995])),
        ];
        let ranked = rank_items(items, &[1.0, 0.0], 10);
        assert_eq!(ranked.len(), 2);
        assert_eq!(ranked[0].id, 2);
        assert_eq!(ranked[1].id, 3);
    }
}
