// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Periodic global store wipe.
//!
//! A coarse safety net that clears every record on a fixed interval,
//! independent of the per-session expiry timers. It runs unconditionally and
//! will also drop records still owned by live sessions.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::store::VectorStore;

/// Spawn the long-lived sweep task. The returned handle can be aborted on
/// shutdown; failures are logged and the loop continues.
pub fn spawn(store: Arc<dyn VectorStore>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(interval).await;
            info!("starting global store cleanup");
            match store.delete_all().await {
                Ok(()) => info!("global store cleanup completed"),
                Err(e) => warn!(error = %e, "global store cleanup failed"),
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryVectorStore, VectorStore};

    async fn settle() {
        for _ in 0..10 {
            tokio::task::yield_now().await;
        }
    }

    #[tokio::test(start_paused = true)]
    async fn sweep_wipes_the_store_each_interval() {
        let store = Arc::new(MemoryVectorStore::new());
        store.insert_many(&["doc".to_string()]).await.unwrap();

        let handle = spawn(store.clone(), Duration::from_secs(60));
        settle().await; // let the sweep loop register its first sleep

        // Nothing happens before the first interval elapses.
        tokio::time::advance(Duration::from_secs(59)).await;
        settle().await;
        assert_eq!(store.count().await, 1);

        tokio::time::advance(Duration::from_secs(2)).await;
        settle().await;
        assert_eq!(store.count().await, 0);

        // It keeps running: records inserted later are wiped on the next tick.
        store.insert_many(&["again".to_string()]).await.unwrap();
        tokio::time::advance(Duration::from_secs(61)).await;
        settle().await;
        assert_eq!(store.count().await, 0);

        handle.abort();
    }
}
