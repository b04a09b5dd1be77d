//! SQLite storage implementation.
//!
//! A file-based storage backend using SQLite. Good for:
//! - Local development
//! - Single-server deployments
//! - Testing with persistent data

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};
use sqlx::FromRow;

use crate::canonical::KnowledgeMap;
use crate::error::{KnowledgeError, Result};
use crate::store::{CategoryVectors, KnowledgeItem, KnowledgeStore, NewPage, StoredPage};

/// SQLite-based knowledge store.
pub struct SqliteStore {
    pool: SqlitePool,
}

#[derive(FromRow)]
struct PageRow {
    id: i64,
    url: String,
    title: String,
    content: String,
    created_at: DateTime<Utc>,
}

impl From<PageRow> for StoredPage {
    fn from(row: PageRow) -> Self {
        Self {
            id: row.id,
            url: row.url,
            title: row.title,
            content: row.content,
            created_at: row.created_at,
        }
    }
}

#[derive(FromRow)]
struct ItemRow {
    id: i64,
    page_id: i64,
    category: String,
    content: String,
    vector: Option<Vec<u8>>,
}

impl From<ItemRow> for KnowledgeItem {
    fn from(row: ItemRow) -> Self {
        Self {
            id: row.id,
            page_id: row.page_id,
            category: row.category,
            content: row.content,
            vector: row.vector.as_deref().map(blob_to_vector),
        }
    }
}

impl SqliteStore {
    /// Create a new SQLite store with the given connection URL.
    ///
    /// # Example URLs
    /// - `sqlite://knowledge.db?mode=rwc` - File-based database
    /// - `sqlite::memory:` - In-memory database (use [`Self::in_memory`])
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .map_err(storage_error)?;

        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    /// Create an in-memory SQLite store (for testing).
    ///
    /// A single connection, since every in-memory connection is its own
    /// database.
    pub async fn in_memory() -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .map_err(storage_error)?;

        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    /// Run database migrations.
    async fn run_migrations(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS pages (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                url TEXT NOT NULL,
                title TEXT NOT NULL DEFAULT '',
                content TEXT NOT NULL,
                created_at TEXT NOT NULL
            );
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS knowledge_items (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                page_id INTEGER NOT NULL,
                category TEXT NOT NULL,
                content TEXT NOT NULL,
                vector BLOB,
                created_at TEXT NOT NULL,
                FOREIGN KEY (page_id) REFERENCES pages (id)
            );

            CREATE INDEX IF NOT EXISTS idx_knowledge_items_page_id
                ON knowledge_items(page_id);
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(())
    }
}

#[async_trait]
impl KnowledgeStore for SqliteStore {
    async fn ping(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(storage_error)?;
        Ok(())
    }

    async fn store_page(&self, page: &NewPage) -> Result<i64> {
        let result = sqlx::query(
            "INSERT INTO pages (url, title, content, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&page.url)
        .bind(&page.title)
        .bind(&page.content)
        .bind(Utc::now())
        .execute(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(result.last_insert_rowid())
    }

    async fn get_page(&self, page_id: i64) -> Result<Option<StoredPage>> {
        let row: Option<PageRow> = sqlx::query_as(
            "SELECT id, url, title, content, created_at FROM pages WHERE id = ?",
        )
        .bind(page_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(row.map(StoredPage::from))
    }

    async fn store_knowledge(
        &self,
        page_id: i64,
        knowledge: &KnowledgeMap,
        vectors: &CategoryVectors,
    ) -> Result<()> {
        for (category, values) in knowledge.iter() {
            for (index, value) in values.iter().enumerate() {
                let vector_blob = vectors
                    .get(category)
                    .and_then(|category_vectors| category_vectors.get(index))
                    .map(|v| vector_to_blob(v));

                sqlx::query(
                    "INSERT INTO knowledge_items (page_id, category, content, vector, created_at) \
                     VALUES (?, ?, ?, ?, ?)",
                )
                .bind(page_id)
                .bind(category)
                .bind(value)
                .bind(vector_blob)
                .bind(Utc::now())
                .execute(&self.pool)
                .await
                .map_err(storage_error)?;
            }
        }
        Ok(())
    }

    async fn items_for_page(&self, page_id: i64) -> Result<Vec<KnowledgeItem>> {
        let rows: Vec<ItemRow> = sqlx::query_as(
            "SELECT id, page_id, category, content, vector FROM knowledge_items \
             WHERE page_id = ? ORDER BY id",
        )
        .bind(page_id)
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(rows.into_iter().map(KnowledgeItem::from).collect())
    }

    async fn all_items(&self) -> Result<Vec<KnowledgeItem>> {
        let rows: Vec<ItemRow> = sqlx::query_as(
            "SELECT id, page_id, category, content, vector FROM knowledge_items ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(storage_error)?;

        Ok(rows.into_iter().map(KnowledgeItem::from).collect())
    }
}

/// Encode an embedding vector as little-endian f32 bytes.
fn vector_to_blob(vector: &[f32]) -> Vec<u8> {
    vector.iter().flat_map(|f| f.to_le_bytes()).collect()
}

/// Decode little-endian f32 bytes back into a vector.
fn blob_to_vector(blob: &[u8]) -> Vec<f32> {
    blob.chunks_exact(4)
        .map(|chunk| {
            let mut arr = [0u8; 4];
            arr.copy_from_slice(chunk);
            f32::from_le_bytes(arr)
        })
        .collect()
}

fn storage_error(e: sqlx::Error) -> KnowledgeError {
    KnowledgeError::Storage(Box::new(e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn sample_knowledge() -> KnowledgeMap {
        [
            ("name".to_string(), vec!["PKU".to_string()]),
            ("founded".to_string(), vec!["1898".to_string()]),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_vector_blob_roundtrip() {
        let vector = vec![1.0f32, -0.5, 3.25];
        assert_eq!(blob_to_vector(&vector_to_blob(&vector)), vector);
    }

    #[tokio::test]
    async fn test_page_roundtrip() {
        let store = SqliteStore::in_memory().await.unwrap();
        let id = store
            .store_page(&NewPage {
                url: "https://example.com".into(),
                title: "Example".into(),
                content: "page text".into(),
            })
            .await
            .unwrap();

        let page = store.get_page(id).await.unwrap().unwrap();
        assert_eq!(page.url, "https://example.com");
        assert_eq!(page.content, "page text");
        assert!(store.get_page(id + 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_knowledge_roundtrip_with_vectors() {
        let store = SqliteStore::in_memory().await.unwrap();
        let mut vectors = HashMap::new();
        vectors.insert("name".to_string(), vec![vec![1.0f32, 0.0]]);

        store
            .store_knowledge(1, &sample_knowledge(), &vectors)
            .await
            .unwrap();

        let items = store.items_for_page(1).await.unwrap();
        assert_eq!(items.len(), 2);
        let name_item = items.iter().find(|i| i.category == "name").unwrap();
        assert_eq!(name_item.vector, Some(vec![1.0, 0.0]));
        let founded_item = items.iter().find(|i| i.category == "founded").unwrap();
        assert!(founded_item.vector.is_none());

        let rebuilt = store.knowledge_for_page(1).await.unwrap();
        assert_eq!(rebuilt, sample_knowledge());
    }

    #[tokio::test]
    async fn test_search_similar() {
        let store = SqliteStore::in_memory().await.unwrap();
        let mut vectors = HashMap::new();
        vectors.insert("name".to_string(), vec![vec![0.0f32, 1.0]]);
        vectors.insert("founded".to_string(), vec![vec![1.0f32, 0.0]]);

        store
            .store_knowledge(1, &sample_knowledge(), &vectors)
            .await
            .unwrap();

        let results = store.search_similar(&[1.0, 0.0], 1).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].category, "founded");
    }

    #[tokio::test]
    async fn test_ping() {
        let store = SqliteStore::in_memory().await.unwrap();
        store.ping().await.unwrap();
    }
}
