// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Boundary facade over the retrieval core: the operations the routing
//! layer calls.
//!
//! Session-validity outcomes are values, never errors; store and
//! connectivity failures propagate as [`NodeError`] for the boundary layer
//! to turn into a server-error response.

use std::sync::Arc;

use thiserror::Error;
use tracing::info;

use crate::completion::CompletionClient;
use crate::retriever::Retriever;
use crate::sessions::{SessionError, SessionRegistry};
use crate::store::{StoreError, VectorStore};

#[derive(Error, Debug)]
pub enum NodeError {
    #[error("unknown session: {0}")]
    UnknownSession(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

impl From<SessionError> for NodeError {
    fn from(err: SessionError) -> Self {
        match err {
            SessionError::Unknown(id) => NodeError::UnknownSession(id),
            SessionError::Store(e) => NodeError::Store(e),
        }
    }
}

/// Receipt for a successful ingest.
#[derive(Debug, Clone)]
pub struct IngestReceipt {
    pub session_id: String,
    pub chunks_stored: usize,
}

/// Outcome of an answer request. An unknown or expired session is a normal
/// result, not a failure, and never reaches the completion API.
#[derive(Debug)]
pub enum AnswerOutcome {
    Answered {
        answer: String,
        references: Vec<String>,
    },
    InvalidSession,
}

pub struct QaNode {
    store: Arc<dyn VectorStore>,
    registry: SessionRegistry,
    retriever: Retriever,
    completion: CompletionClient,
    top_k: usize,
}

impl QaNode {
    pub fn new(
        store: Arc<dyn VectorStore>,
        registry: SessionRegistry,
        completion: CompletionClient,
        top_k: usize,
    ) -> Self {
        let retriever = Retriever::new(Arc::clone(&store));
        Self {
            store,
            registry,
            retriever,
            completion,
            top_k,
        }
    }

    pub async fn create_session(&self) -> String {
        self.registry.create().await
    }

    /// Persist pre-chunked texts under a session and restart its expiry
    /// timer. Chunks arrive already windowed by the extraction collaborator.
    pub async fn ingest(
        &self,
        session_id: &str,
        chunks: &[String],
    ) -> Result<IngestReceipt, NodeError> {
        let ids = self.store.insert_many(chunks).await?;
        let chunks_stored = ids.len();
        self.registry.track(session_id, ids).await?;
        info!(session_id = %session_id, chunks = chunks_stored, "document ingested");
        Ok(IngestReceipt {
            session_id: session_id.to_string(),
            chunks_stored,
        })
    }

    /// Retrieve top-K context for `query` and generate an answer.
    pub async fn answer(&self, session_id: &str, query: &str) -> Result<AnswerOutcome, NodeError> {
        if !self.registry.contains(session_id).await {
            return Ok(AnswerOutcome::InvalidSession);
        }

        let references = self.retriever.retrieve(query, self.top_k).await?;
        let answer = self.completion.generate_answer(query, &references).await;
        Ok(AnswerOutcome::Answered { answer, references })
    }

    /// End a session and delete its records. `Ok(false)` when the session is
    /// unknown or already gone.
    pub async fn end_session(&self, session_id: &str) -> Result<bool, NodeError> {
        Ok(self.registry.end(session_id).await?)
    }
}
