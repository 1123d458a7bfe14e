// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Session registry: process-wide map from session id to the record ids it
//! owns, with a single-shot expiry timer per session.
//!
//! Each upload (re)starts the session's timer; when it fires, or when the
//! session is ended explicitly, the session's records are deleted from the
//! vector store. Both paths share one removal routine, so the second trigger
//! is always a no-op: the entry is already gone from the registry.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use uuid::Uuid;

use crate::store::{StoreError, VectorStore};

#[derive(Error, Debug)]
pub enum SessionError {
    #[error("unknown session: {0}")]
    Unknown(String),
    #[error(transparent)]
    Store(#[from] StoreError),
}

struct SessionEntry {
    doc_ids: Vec<Uuid>,
    expiry: Option<JoinHandle<()>>,
}

struct Inner {
    sessions: Mutex<HashMap<String, SessionEntry>>,
    store: Arc<dyn VectorStore>,
    timeout: Duration,
}

/// Cheaply cloneable handle to the shared registry state; expiry tasks hold
/// a clone so they can remove their own session when the timer fires.
#[derive(Clone)]
pub struct SessionRegistry {
    inner: Arc<Inner>,
}

impl SessionRegistry {
    pub fn new(store: Arc<dyn VectorStore>, timeout: Duration) -> Self {
        Self {
            inner: Arc::new(Inner {
                sessions: Mutex::new(HashMap::new()),
                store,
                timeout,
            }),
        }
    }

    /// Register a fresh session with an empty owned-id list and no timer.
    pub async fn create(&self) -> String {
        let session_id = Uuid::new_v4().to_string();
        let mut sessions = self.inner.sessions.lock().await;
        sessions.insert(
            session_id.clone(),
            SessionEntry {
                doc_ids: Vec::new(),
                expiry: None,
            },
        );
        info!(session_id = %session_id, "session created");
        session_id
    }

    /// Whether the session is currently live (not yet expired or ended).
    pub async fn contains(&self, session_id: &str) -> bool {
        self.inner.sessions.lock().await.contains_key(session_id)
    }

    /// Append newly stored record ids to the session and restart its expiry
    /// timer. Exactly one timer is pending per session afterwards; its
    /// countdown starts now, not at the first upload.
    pub async fn track(&self, session_id: &str, ids: Vec<Uuid>) -> Result<(), SessionError> {
        let mut sessions = self.inner.sessions.lock().await;
        let entry = sessions
            .get_mut(session_id)
            .ok_or_else(|| SessionError::Unknown(session_id.to_string()))?;

        entry.doc_ids.extend(ids);
        if let Some(previous) = entry.expiry.take() {
            previous.abort();
        }
        entry.expiry = Some(self.spawn_expiry(session_id.to_string()));
        Ok(())
    }

    /// End a session explicitly. Returns `Ok(false)` when the session is
    /// unknown or already gone; ending twice is a no-op.
    pub async fn end(&self, session_id: &str) -> Result<bool, SessionError> {
        self.remove_and_delete(session_id, true).await
    }

    /// Live session count.
    pub async fn len(&self) -> usize {
        self.inner.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    fn spawn_expiry(&self, session_id: String) -> JoinHandle<()> {
        let registry = self.clone();
        let timeout = self.inner.timeout;
        tokio::spawn(async move {
            tokio::time::sleep(timeout).await;
            // abort_timer=false: aborting our own handle here would cancel
            // this task before the store delete runs.
            match registry.remove_and_delete(&session_id, false).await {
                Ok(true) => {
                    info!(session_id = %session_id, "session expired, records deleted")
                }
                Ok(false) => {} // already ended manually
                Err(e) => {
                    warn!(session_id = %session_id, error = %e, "failed to delete expired session records")
                }
            }
        })
    }

    /// Shared removal routine for manual end and timer expiry: atomically
    /// take the session out of the registry, then delete its records.
    async fn remove_and_delete(
        &self,
        session_id: &str,
        abort_timer: bool,
    ) -> Result<bool, SessionError> {
        let entry = {
            let mut sessions = self.inner.sessions.lock().await;
            sessions.remove(session_id)
        };
        let Some(mut entry) = entry else {
            return Ok(false);
        };

        if abort_timer {
            if let Some(pending) = entry.expiry.take() {
                pending.abort();
            }
        }

        if !entry.doc_ids.is_empty() {
            self.inner.store.delete_by_ids(&entry.doc_ids).await?;
        }
        Ok(true)
    }
}
