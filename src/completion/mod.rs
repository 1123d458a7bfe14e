// Copyright (c) 2025 Fabstir
// SPDX-License-Identifier: BUSL-1.1
//! Remote completion API client (Together-style chat completions).
//!
//! The client builds one prompt from the retrieved context texts plus the
//! literal query and forwards it verbatim as a single user message. Every
//! failure at this boundary — missing credential, transport error, API
//! error — degrades to a textual error response instead of propagating.

use serde::{Deserialize, Serialize};
use tracing::warn;

pub const DEFAULT_BASE_URL: &str = "https://api.together.xyz";
pub const DEFAULT_MODEL: &str = "meta-llama/Llama-Vision-Free";

pub struct CompletionClient {
    client: reqwest::Client,
    api_key: Option<String>,
    base_url: String,
    model: String,
}

#[derive(Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Serialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ResponseMessage,
}

#[derive(Deserialize)]
struct ResponseMessage {
    content: String,
}

impl CompletionClient {
    /// An absent or empty credential is treated as missing; requests then
    /// short-circuit without any network call.
    pub fn new(api_key: Option<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.filter(|key| !key.is_empty()),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        }
    }

    pub fn with_base_url(mut self, url: &str) -> Self {
        self.base_url = url.trim_end_matches('/').to_string();
        self
    }

    pub fn with_model(mut self, model: &str) -> Self {
        self.model = model.to_string();
        self
    }

    /// Prompt layout: retrieved texts as one undifferentiated context block,
    /// then the literal question.
    pub fn build_prompt(query: &str, context: &[String]) -> String {
        format!(
            "Given the following context:\n\n{}\n\nAnswer the question: {}",
            context.join("\n\n"),
            query
        )
    }

    /// Generate an answer for `query` grounded in `context`. Always returns
    /// text: failures come back as `"Error: ..."` strings.
    pub async fn generate_answer(&self, query: &str, context: &[String]) -> String {
        let Some(api_key) = &self.api_key else {
            return "Error: Missing API Key. Please set TOGETHER_API_KEY in the environment variables."
                .to_string();
        };

        let prompt = Self::build_prompt(query, context);
        match self.complete(api_key, prompt).await {
            Ok(answer) => answer,
            Err(e) => {
                warn!(error = %e, "completion request failed");
                format!("Error: {e}")
            }
        }
    }

    async fn complete(&self, api_key: &str, prompt: String) -> anyhow::Result<String> {
        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage {
                role: "user".to_string(),
                content: prompt,
            }],
        };

        let response = self
            .client
            .post(format!("{}/v1/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json::<ChatResponse>()
            .await?;

        response
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| anyhow::anyhow!("completion response contained no choices"))
    }
}
