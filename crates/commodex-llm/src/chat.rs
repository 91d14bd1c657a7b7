//! Chat-message endpoint backend.
//!
//! Speaks the OpenAI-compatible chat shape: a `messages` array in, the first
//! choice's message content out. The system/user pair maps directly onto two
//! messages.

use crate::{classify_error_status, CompletionOptions, LlmBackend, LlmError, DEFAULT_TIMEOUT_SECS};
use commodex_domain::ExtractionPrompt;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Backend for chat-completion endpoints.
pub struct ChatBackend {
    api_url: String,
    api_token: String,
    model: Option<String>,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct ChatRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    model: Option<String>,
    messages: Vec<Message>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Serialize)]
struct Message {
    role: &'static str,
    content: String,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: String,
}

impl ChatBackend {
    /// Create a backend for the given endpoint URL and bearer token.
    pub fn new(api_url: impl Into<String>, api_token: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();

        Self {
            api_url: api_url.into(),
            api_token: api_token.into(),
            model: None,
            client,
        }
    }

    /// Set the model name to send with each request. Endpoints that serve a
    /// single model ignore it.
    pub fn with_model(mut self, model: Option<String>) -> Self {
        self.model = model;
        self
    }

    /// Replace the HTTP client timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        if let Ok(client) = reqwest::Client::builder().timeout(timeout).build() {
            self.client = client;
        }
        self
    }

    /// Request a completion from the chat endpoint.
    pub async fn complete_async(
        &self,
        prompt: &ExtractionPrompt,
        options: &CompletionOptions,
    ) -> Result<String, LlmError> {
        let payload = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                Message {
                    role: "system",
                    content: prompt.system.clone(),
                },
                Message {
                    role: "user",
                    content: prompt.user.clone(),
                },
            ],
            temperature: options.temperature,
            max_tokens: options.max_tokens,
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_token)
            .json(&payload)
            .send()
            .await
            .map_err(|e| LlmError::RequestFailed(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(classify_error_status(status.as_u16(), body));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("failed to parse reply: {e}")))?;

        parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .ok_or_else(|| LlmError::InvalidResponse("no choices in response".to_string()))
    }
}

impl LlmBackend for ChatBackend {
    fn complete(
        &self,
        prompt: &ExtractionPrompt,
        options: &CompletionOptions,
    ) -> Result<String, LlmError> {
        let runtime = tokio::runtime::Runtime::new()
            .map_err(|e| LlmError::RequestFailed(format!("failed to start runtime: {e}")))?;
        runtime.block_on(self.complete_async(prompt, options))
    }

    fn name(&self) -> &'static str {
        "chat"
    }
}
