// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! In-memory vector store.
//!
//! Backs tests and credential-free local runs. Same contract as the
//! Postgres store, including insertion-order scans.

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{ScannedRecord, StoreError, VectorStore};
use crate::embeddings::{embed, Embedding};

#[derive(Debug, Clone)]
struct Record {
    id: Uuid,
    text: String,
    embedding: Embedding,
}

/// Process-local store over a `Vec` guarded by an async lock. The `Vec`
/// preserves insertion order for scans.
#[derive(Debug, Default)]
pub struct MemoryVectorStore {
    records: RwLock<Vec<Record>>,
}

impl MemoryVectorStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently stored.
    pub async fn count(&self) -> usize {
        self.records.read().await.len()
    }
}

#[async_trait]
impl VectorStore for MemoryVectorStore {
    async fn insert_many(&self, chunks: &[String]) -> Result<Vec<Uuid>, StoreError> {
        // Embed outside the lock; a single push section keeps the batch
        // atomic with respect to concurrent scans.
        let new_records: Vec<Record> = chunks
            .iter()
            .map(|chunk| Record {
                id: Uuid::new_v4(),
                text: chunk.clone(),
                embedding: embed(chunk),
            })
            .collect();
        let ids = new_records.iter().map(|r| r.id).collect();

        let mut records = self.records.write().await;
        records.extend(new_records);
        Ok(ids)
    }

    async fn scan_all(&self) -> Result<Vec<ScannedRecord>, StoreError> {
        let records = self.records.read().await;
        Ok(records
            .iter()
            .map(|r| ScannedRecord {
                text: r.text.clone(),
                embedding: r.embedding.clone(),
            })
            .collect())
    }

    async fn delete_by_ids(&self, ids: &[Uuid]) -> Result<(), StoreError> {
        let mut records = self.records.write().await;
        records.retain(|r| !ids.contains(&r.id));
        Ok(())
    }

    async fn delete_all(&self) -> Result<(), StoreError> {
        self.records.write().await.clear();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn insert_empty_batch_returns_no_ids_and_leaves_store_unchanged() {
        let store = MemoryVectorStore::new();
        let ids = store.insert_many(&[]).await.unwrap();
        assert!(ids.is_empty());
        assert_eq!(store.count().await, 0);
    }

    #[tokio::test]
    async fn scan_reports_inserted_texts_with_their_embeddings() {
        let store = MemoryVectorStore::new();
        let chunks = vec!["first chunk".to_string(), "second chunk".to_string()];
        let ids = store.insert_many(&chunks).await.unwrap();
        assert_eq!(ids.len(), 2);
        assert_ne!(ids[0], ids[1]);

        let records = store.scan_all().await.unwrap();
        assert_eq!(records.len(), 2);
        for (record, chunk) in records.iter().zip(&chunks) {
            assert_eq!(&record.text, chunk);
            assert_eq!(record.embedding, embed(chunk));
        }
    }

    #[tokio::test]
    async fn scan_preserves_insertion_order_across_batches() {
        let store = MemoryVectorStore::new();
        store.insert_many(&["a".to_string()]).await.unwrap();
        store
            .insert_many(&["b".to_string(), "c".to_string()])
            .await
            .unwrap();

        let texts: Vec<String> = store
            .scan_all()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.text)
            .collect();
        assert_eq!(texts, vec!["a", "b", "c"]);
    }

    #[tokio::test]
    async fn delete_by_ids_removes_exactly_the_named_records() {
        let store = MemoryVectorStore::new();
        let ids = store
            .insert_many(&["x".to_string(), "y".to_string(), "z".to_string()])
            .await
            .unwrap();

        store.delete_by_ids(&[ids[0], ids[2]]).await.unwrap();
        let remaining = store.scan_all().await.unwrap();
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].text, "y");
    }

    #[tokio::test]
    async fn delete_by_ids_silently_ignores_unknown_ids() {
        let store = MemoryVectorStore::new();
        let ids = store.insert_many(&["keep".to_string()]).await.unwrap();
        store.delete_by_ids(&[Uuid::new_v4()]).await.unwrap();
        assert_eq!(store.count().await, 1);
        store.delete_by_ids(&ids).await.unwrap();
        assert_eq!(store.count().await, 0);
    }

    #[tokio::test]
    async fn delete_all_empties_the_store() {
        let store = MemoryVectorStore::new();
        store
            .insert_many(&["one".to_string(), "two".to_string()])
            .await
            .unwrap();
        store.delete_all().await.unwrap();
        assert_eq!(store.count().await, 0);
        assert!(store.scan_all().await.unwrap().is_empty());
    }
}
