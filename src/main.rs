// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use std::env;
use std::sync::Arc;

use anyhow::Result;
use pdf_qa_node::{
    api, sweep, CompletionClient, Config, PgVectorStore, PlainTextExtractor, QaNode,
    SessionRegistry, TextExtractor, VectorStore,
};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    // Initialize tracing subscriber for logging
    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    tracing_subscriber::fmt::init();

    let config = Config::from_env();

    let database_url = config.require_database_url()?;
    info!("connecting to Postgres vector store");
    let store: Arc<dyn VectorStore> = Arc::new(PgVectorStore::connect(database_url).await?);

    let registry = SessionRegistry::new(Arc::clone(&store), config.session_timeout);
    let completion = CompletionClient::new(config.together_api_key.clone());
    if config.together_api_key.is_none() {
        warn!("TOGETHER_API_KEY is not set; answer generation will return an error message");
    }

    let node = Arc::new(QaNode::new(
        Arc::clone(&store),
        registry,
        completion,
        config.top_k,
    ));

    // Periodic full-store wipe, independent of per-session expiry.
    let sweep_task = sweep::spawn(Arc::clone(&store), config.sweep_interval);

    let extractor: Arc<dyn TextExtractor> = Arc::new(PlainTextExtractor);

    tokio::select! {
        result = api::start_server(node, extractor, config.api_port) => result?,
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received");
        }
    }

    sweep_task.abort();
    Ok(())
}
