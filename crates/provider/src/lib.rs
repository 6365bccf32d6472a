use std::env;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value;
use thiserror::Error;
use tracing::debug;

const OPENAI_RESPONSES_URL: &str = "https://api.openai.com/v1/responses";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const CONNECT_TIMEOUT: Duration = Duration::from_secs(6);
const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Why a completion call failed. The dispatcher propagates these
/// untouched; the transport turns them into a user-safe reply.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("completion request timed out")]
    Timeout,
    #[error("failed to reach completion endpoint: {0}")]
    Connection(String),
    #[error("completion endpoint rejected credentials: {0}")]
    Auth(String),
    #[error("completion response was malformed: {0}")]
    MalformedResponse(String),
    #[error("completion request failed: {0}")]
    Unknown(String),
}

/// External language-model service supplying the free-text fallback
/// answer when no intent matches.
#[async_trait]
pub trait CompletionProvider: Send + Sync {
    async fn complete(
        &self,
        system_instruction: &str,
        user_message: &str,
    ) -> Result<String, ProviderError>;
}

/// OpenAI Responses API backend. Stateless per call: no conversation
/// history is kept between messages.
#[derive(Debug, Clone)]
pub struct OpenAiProvider {
    client: Client,
    api_key: String,
    model: String,
}

impl OpenAiProvider {
    pub fn new(api_key: String, model: String) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(CONNECT_TIMEOUT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("failed to build HTTP client")?;

        Ok(Self {
            client,
            api_key,
            model,
        })
    }

    /// Build from `HEMLINE_OPENAI_API_KEY` / `HEMLINE_OPENAI_MODEL`.
    /// A missing key is a startup error, not a runtime one.
    pub fn from_env() -> Result<Self> {
        let api_key = env::var("HEMLINE_OPENAI_API_KEY")
            .context("HEMLINE_OPENAI_API_KEY must be set for the completion fallback")?;
        let model =
            env::var("HEMLINE_OPENAI_MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        Self::new(api_key, model)
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl CompletionProvider for OpenAiProvider {
    async fn complete(
        &self,
        system_instruction: &str,
        user_message: &str,
    ) -> Result<String, ProviderError> {
        let payload = serde_json::json!({
            "model": self.model,
            "input": [
                {
                    "role": "system",
                    "content": [
                        { "type": "input_text", "text": system_instruction }
                    ]
                },
                {
                    "role": "user",
                    "content": [
                        { "type": "input_text", "text": user_message }
                    ]
                }
            ]
        });

        let response = self
            .client
            .post(OPENAI_RESPONSES_URL)
            .bearer_auth(self.api_key.as_str())
            .json(&payload)
            .send()
            .await
            .map_err(classify_send_error)?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Auth(format!(
                "status {}: {}",
                status.as_u16(),
                body
            )));
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProviderError::Unknown(format!(
                "status {}: {}",
                status.as_u16(),
                body
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|error| ProviderError::MalformedResponse(error.to_string()))?;

        debug!(model = %self.model, "completion received");

        extract_output_text(&body)
            .filter(|text| !text.trim().is_empty())
            .ok_or_else(|| {
                ProviderError::MalformedResponse("completion output text missing".to_string())
            })
    }
}

fn classify_send_error(error: reqwest::Error) -> ProviderError {
    if error.is_timeout() {
        ProviderError::Timeout
    } else if error.is_connect() {
        ProviderError::Connection(error.to_string())
    } else {
        ProviderError::Unknown(error.to_string())
    }
}

/// Pull the assistant text out of a Responses API body: either the
/// top-level `output_text` convenience field or the `output_text`
/// parts nested under `output[].content[]`.
fn extract_output_text(payload: &Value) -> Option<String> {
    if let Some(value) = payload.get("output_text").and_then(|value| value.as_str()) {
        return Some(value.to_string());
    }

    let output = payload.get("output")?.as_array()?;
    let mut chunks = Vec::new();
    for item in output {
        if let Some(content) = item.get("content").and_then(|value| value.as_array()) {
            for content_item in content {
                if content_item
                    .get("type")
                    .and_then(|value| value.as_str())
                    .map(|value| value == "output_text")
                    .unwrap_or(false)
                {
                    if let Some(text) = content_item.get("text").and_then(|value| value.as_str()) {
                        chunks.push(text.to_string());
                    }
                }
            }
        }
    }

    if chunks.is_empty() {
        None
    } else {
        Some(chunks.join("\n\n"))
    }
}
