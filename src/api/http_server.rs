// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tracing::error;

use crate::chunker::chunk_pages;
use crate::extract::TextExtractor;
use crate::node::{AnswerOutcome, NodeError, QaNode};

const INVALID_SESSION_MESSAGE: &str = "Invalid session ID or expired session.";

#[derive(Clone)]
struct AppState {
    node: Arc<QaNode>,
    extractor: Arc<dyn TextExtractor>,
}

/// Build the application router. Exposed separately from [`start_server`] so
/// tests can drive it without binding a socket.
pub fn router(node: Arc<QaNode>, extractor: Arc<dyn TextExtractor>) -> Router {
    let state = AppState { node, extractor };

    Router::new()
        .route("/health", get(health_handler))
        .route("/test", get(test_handler))
        .route("/upload", post(upload_handler))
        .route("/query", get(query_handler))
        .route("/end_session", post(end_session_handler))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}

pub async fn start_server(
    node: Arc<QaNode>,
    extractor: Arc<dyn TextExtractor>,
    port: u16,
) -> anyhow::Result<()> {
    let app = router(node, extractor);
    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!("API server listening on {}", addr);

    axum::serve(listener, app).await?;
    Ok(())
}

async fn health_handler() -> impl IntoResponse {
    Json(json!({ "status": "healthy" }))
}

#[derive(Deserialize)]
struct TestParams {
    input_string: String,
}

async fn test_handler(Query(params): Query<TestParams>) -> impl IntoResponse {
    Json(json!({ "message": params.input_string }))
}

#[derive(Deserialize)]
struct UploadParams {
    session_id: Option<String>,
}

async fn upload_handler(
    State(state): State<AppState>,
    Query(params): Query<UploadParams>,
    body: Bytes,
) -> Response {
    let pages = match state.extractor.extract(&body) {
        Ok(pages) => pages,
        Err(e) => {
            error!(error = %e, "text extraction failed");
            return internal_error("Error processing document");
        }
    };
    let chunks = chunk_pages(&pages);

    let session_id = match params.session_id {
        Some(id) => id,
        None => state.node.create_session().await,
    };

    match state.node.ingest(&session_id, &chunks).await {
        Ok(receipt) => Json(json!({
            "message": "Document uploaded and processed.",
            "session_id": receipt.session_id,
            "chunks": receipt.chunks_stored,
        }))
        .into_response(),
        Err(NodeError::UnknownSession(_)) => invalid_session(),
        Err(e) => {
            error!(error = %e, session_id = %session_id, "ingest failed");
            internal_error("Error processing document")
        }
    }
}

#[derive(Deserialize)]
struct QueryParams {
    session_id: String,
    query: String,
}

async fn query_handler(
    State(state): State<AppState>,
    Query(params): Query<QueryParams>,
) -> Response {
    match state.node.answer(&params.session_id, &params.query).await {
        Ok(AnswerOutcome::Answered { answer, references }) => Json(json!({
            "query": params.query,
            "answer": answer,
            "references": references,
        }))
        .into_response(),
        Ok(AnswerOutcome::InvalidSession) => invalid_session(),
        Err(e) => {
            error!(error = %e, session_id = %params.session_id, "query failed");
            internal_error("Error querying document")
        }
    }
}

#[derive(Deserialize)]
struct EndSessionParams {
    session_id: String,
}

async fn end_session_handler(
    State(state): State<AppState>,
    Query(params): Query<EndSessionParams>,
) -> Response {
    match state.node.end_session(&params.session_id).await {
        Ok(true) => Json(json!({ "message": "Session data cleared successfully." })).into_response(),
        Ok(false) => {
            Json(json!({ "message": "Session ID not found or already deleted." })).into_response()
        }
        Err(e) => {
            error!(error = %e, session_id = %params.session_id, "end_session failed");
            internal_error("Error ending session")
        }
    }
}

fn invalid_session() -> Response {
    Json(json!({ "error": INVALID_SESSION_MESSAGE })).into_response()
}

fn internal_error(message: &str) -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "error": message })),
    )
        .into_response()
}
