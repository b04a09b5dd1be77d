//! In-memory storage implementation for testing and development.

use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use crate::canonical::KnowledgeMap;
use crate::error::Result;
use crate::store::{CategoryVectors, KnowledgeItem, KnowledgeStore, NewPage, StoredPage};

/// In-memory store for pages and knowledge items.
///
/// Useful for testing and development. Not suitable for production as data
/// is lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    pages: RwLock<Vec<StoredPage>>,
    items: RwLock<Vec<KnowledgeItem>>,
}

impl MemoryStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all stored data.
    pub fn clear(&self) {
        self.pages.write().unwrap().clear();
        self.items.write().unwrap().clear();
    }

    /// Number of stored pages.
    pub fn page_count(&self) -> usize {
        self.pages.read().unwrap().len()
    }

    /// Number of stored knowledge items.
    pub fn item_count(&self) -> usize {
        self.items.read().unwrap().len()
    }
}

#[async_trait]
impl KnowledgeStore for MemoryStore {
    async fn ping(&self) -> Result<()> {
        Ok(())
    }

    async fn store_page(&self, page: &NewPage) -> Result<i64> {
        let mut pages = self.pages.write().unwrap();
        let id = pages.len() as i64 + 1;
        pages.push(StoredPage {
            id,
            url: page.url.clone(),
            title: page.title.clone(),
            content: page.content.clone(),
            created_at: Utc::now(),
        });
        Ok(id)
    }

    async fn get_page(&self, page_id: i64) -> Result<Option<StoredPage>> {
        Ok(self
            .pages
            .read()
            .unwrap()
            .iter()
            .find(|p| p.id == page_id)
            .cloned())
    }

    async fn store_knowledge(
        &self,
        page_id: i64,
        knowledge: &KnowledgeMap,
        vectors: &CategoryVectors,
    ) -> Result<()> {
        let mut items = self.items.write().unwrap();
        for (category, values) in knowledge.iter() {
            for (index, value) in values.iter().enumerate() {
                let vector = vectors
                    .get(category)
                    .and_then(|category_vectors| category_vectors.get(index))
                    .cloned();
                let id = items.len() as i64 + 1;
                items.push(KnowledgeItem {
                    id,
                    page_id,
                    category: category.to_string(),
                    content: value.clone(),
                    vector,
                });
            }
        }
        Ok(())
    }

    async fn items_for_page(&self, page_id: i64) -> Result<Vec<KnowledgeItem>> {
        Ok(self
            .items
            .read()
            .unwrap()
            .iter()
            .filter(|item| item.page_id == page_id)
            .cloned()
            .collect())
    }

    async fn all_items(&self) -> Result<Vec<KnowledgeItem>> {
        Ok(self.items.read().unwrap().clone())
    }
}
