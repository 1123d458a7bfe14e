// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Postgres-backed vector store.
//!
//! Rows live in a single `book_embeddings` table: `{id UUID, text TEXT,
//! embedding FLOAT8[]}` plus a serial position column that keeps scans in
//! insertion order. The schema is created lazily on first connect, so no
//! separate migration step exists.

use async_trait::async_trait;
use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use uuid::Uuid;

use super::{ScannedRecord, StoreError, VectorStore};
use crate::embeddings::{embed, Embedding};

pub struct PgVectorStore {
    pool: PgPool,
}

impl PgVectorStore {
    /// Connect and ensure the backing table exists. Fails fast with the
    /// underlying database error if the server is unreachable.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await?;
        let store = Self { pool };
        store.ensure_schema().await?;
        Ok(store)
    }

    async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(
            "CREATE TABLE IF NOT EXISTS book_embeddings (
                pos BIGSERIAL,
                id UUID PRIMARY KEY,
                text TEXT NOT NULL,
                embedding FLOAT8[] NOT NULL
            )",
        )
        .execute(&self.pool)
        .await?;
        Ok(())
    }
}

#[async_trait]
impl VectorStore for PgVectorStore {
    async fn insert_many(&self, chunks: &[String]) -> Result<Vec<Uuid>, StoreError> {
        // One transaction per batch: either every chunk lands or none do.
        let mut tx = self.pool.begin().await?;
        let mut ids = Vec::with_capacity(chunks.len());
        for chunk in chunks {
            let id = Uuid::new_v4();
            let embedding = embed(chunk).into_vec();
            sqlx::query("INSERT INTO book_embeddings (id, text, embedding) VALUES ($1, $2, $3)")
                .bind(id)
                .bind(chunk)
                .bind(&embedding)
                .execute(&mut *tx)
                .await?;
            ids.push(id);
        }
        tx.commit().await?;
        Ok(ids)
    }

    async fn scan_all(&self) -> Result<Vec<ScannedRecord>, StoreError> {
        let rows = sqlx::query("SELECT text, embedding FROM book_embeddings ORDER BY pos")
            .fetch_all(&self.pool)
            .await?;

        rows.into_iter()
            .map(|row| -> Result<ScannedRecord, StoreError> {
                let text: String = row.try_get("text")?;
                let components: Vec<f64> = row.try_get("embedding")?;
                Ok(ScannedRecord {
                    text,
                    embedding: Embedding::from_components(components)?,
                })
            })
            .collect()
    }

    async fn delete_by_ids(&self, ids: &[Uuid]) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM book_embeddings WHERE id = ANY($1)")
            .bind(ids.to_vec())
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn delete_all(&self) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM book_embeddings")
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
