// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Durable vector storage: (identifier, text, embedding) records with
//! insert, full scan, and delete-by-identifier-set operations.
//!
//! Retrieval always does a full scan, so the persisted layout is a flat
//! append-mostly row collection with no secondary indexes.

pub mod memory;
pub mod postgres;

pub use memory::MemoryVectorStore;
pub use postgres::PgVectorStore;

use async_trait::async_trait;
use thiserror::Error;
use uuid::Uuid;

use crate::embeddings::{Embedding, EmbeddingError};

#[derive(Error, Debug)]
pub enum StoreError {
    /// Connectivity or query failure in the backing database. Propagated to
    /// the request boundary; the core performs no retries.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A persisted row decoded into an invalid embedding.
    #[error("corrupt stored embedding: {0}")]
    CorruptEmbedding(#[from] EmbeddingError),
}

/// One record as reported by a full scan.
#[derive(Debug, Clone)]
pub struct ScannedRecord {
    pub text: String,
    pub embedding: Embedding,
}

/// Persistent collection of (id, text, embedding) records.
///
/// `scan_all` reports records in insertion order; the retriever relies on
/// that order being stable so similarity ties break deterministically.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Embed and persist a batch of chunks, returning the generated record
    /// identifiers in input order. The batch is atomic: on failure no
    /// partial set of rows remains.
    async fn insert_many(&self, chunks: &[String]) -> Result<Vec<Uuid>, StoreError>;

    /// Full, unfiltered read of every current record, in insertion order.
    async fn scan_all(&self) -> Result<Vec<ScannedRecord>, StoreError>;

    /// Remove exactly the records whose id is in `ids`. Non-existent ids are
    /// silently ignored.
    async fn delete_by_ids(&self, ids: &[Uuid]) -> Result<(), StoreError>;

    /// Remove every record in the store (used by the periodic global sweep).
    async fn delete_all(&self) -> Result<(), StoreError>;
}
