// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
pub mod api;
pub mod chunker;
pub mod completion;
pub mod config;
pub mod embeddings;
pub mod extract;
pub mod node;
pub mod retriever;
pub mod sessions;
pub mod store;
pub mod sweep;

// Re-export the main types
pub use completion::CompletionClient;
pub use config::Config;
pub use embeddings::{embed, Embedding, EmbeddingError, EMBEDDING_DIM};
pub use extract::{PlainTextExtractor, TextExtractor};
pub use node::{AnswerOutcome, IngestReceipt, NodeError, QaNode};
pub use retriever::Retriever;
pub use sessions::{SessionError, SessionRegistry};
pub use store::{MemoryVectorStore, PgVectorStore, ScannedRecord, StoreError, VectorStore};
