// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Similarity ranking over the vector store.
//!
//! Ranking is a full scan scored by plain dot product. Stored and query
//! vectors are unit-normalized, so the dot product already equals cosine
//! similarity; the norms are not divided out again.

use std::sync::Arc;

use crate::embeddings::embed;
use crate::store::{StoreError, VectorStore};

pub struct Retriever {
    store: Arc<dyn VectorStore>,
}

impl Retriever {
    pub fn new(store: Arc<dyn VectorStore>) -> Self {
        Self { store }
    }

    /// Return the texts of the up-to-`k` records most similar to `query`,
    /// in descending similarity. Ties keep scan (insertion) order via the
    /// stable sort. An empty store yields an empty result, not an error.
    pub async fn retrieve(&self, query: &str, k: usize) -> Result<Vec<String>, StoreError> {
        let query_embedding = embed(query);
        let records = self.store.scan_all().await?;
        if records.is_empty() {
            return Ok(Vec::new());
        }

        let mut scored: Vec<(f64, String)> = records
            .into_iter()
            .map(|record| (query_embedding.dot(&record.embedding), record.text))
            .collect();
        scored.sort_by(|a, b| b.0.partial_cmp(&a.0).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(k);

        Ok(scored.into_iter().map(|(_, text)| text).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryVectorStore;

    async fn seeded(texts: &[&str]) -> Retriever {
        let store = Arc::new(MemoryVectorStore::new());
        let chunks: Vec<String> = texts.iter().map(|t| t.to_string()).collect();
        store.insert_many(&chunks).await.unwrap();
        Retriever::new(store)
    }

    #[tokio::test]
    async fn empty_store_returns_empty_result() {
        let retriever = Retriever::new(Arc::new(MemoryVectorStore::new()));
        let results = retriever.retrieve("anything", 5).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn identical_text_ranks_first() {
        let retriever = seeded(&[
            "a treatise on shipbuilding",
            "the whale surfaced at dawn",
            "recipes for bread and butter",
        ])
        .await;

        let results = retriever
            .retrieve("the whale surfaced at dawn", 1)
            .await
            .unwrap();
        assert_eq!(results, vec!["the whale surfaced at dawn".to_string()]);
    }

    #[tokio::test]
    async fn returns_at_most_k_texts() {
        let retriever = seeded(&["one", "two", "three", "four"]).await;
        assert_eq!(retriever.retrieve("one", 2).await.unwrap().len(), 2);
        assert_eq!(retriever.retrieve("one", 10).await.unwrap().len(), 4);
        assert!(retriever.retrieve("one", 0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn ordering_is_descending_by_dot_product() {
        let retriever = seeded(&["zzzz unrelated text", "match me exactly"]).await;
        let results = retriever.retrieve("match me exactly", 2).await.unwrap();
        assert_eq!(results[0], "match me exactly");
        assert_eq!(results[1], "zzzz unrelated text");
    }

    #[tokio::test]
    async fn ties_keep_insertion_order() {
        // Identical texts embed identically, so their scores tie exactly.
        let retriever = seeded(&["same text", "same text", "same text"]).await;
        let results = retriever.retrieve("same text", 3).await.unwrap();
        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|t| t == "same text"));

        // Distinct ties: pad so both score zero against an orthogonal query.
        let retriever = seeded(&["\u{1}first", "\u{1}second"]).await;
        let results = retriever.retrieve("", 2).await.unwrap();
        assert_eq!(results, vec!["\u{1}first".to_string(), "\u{1}second".to_string()]);
    }
}
