//! Single-prompt serving-endpoint backend.
//!
//! Speaks the payload shape of model-serving endpoints that take one
//! formatted prompt per input and return a `predictions` array, e.g.
//! Databricks foundation-model serving. The system/user pair is flattened
//! into a single llama-style framed prompt.

use crate::{classify_error_status, CompletionOptions, LlmBackend, LlmError, DEFAULT_TIMEOUT_SECS};
use commodex_domain::ExtractionPrompt;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Backend for single-prompt serving endpoints.
pub struct PromptBackend {
    api_url: String,
    api_token: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct ServingRequest {
    inputs: Vec<ServingInput>,
}

#[derive(Serialize)]
struct ServingInput {
    prompt: String,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Deserialize)]
struct ServingResponse {
    predictions: Vec<String>,
}

impl PromptBackend {
    /// Create a backend for the given endpoint URL and bearer token.
    pub fn new(api_url: impl Into<String>, api_token: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .unwrap_or_default();

        Self {
            api_url: api_url.into(),
            api_token: api_token.into(),
            client,
        }
    }

    /// Replace the HTTP client timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        if let Ok(client) = reqwest::Client::builder().timeout(timeout).build() {
            self.client = client;
        }
        self
    }

    /// Flatten the system/user pair into one framed prompt string.
    fn flatten_prompt(prompt: &ExtractionPrompt) -> String {
        format!(
            "<|system|>\n{}\n</|system|>\n\n<|user|>\n{}\n</|user|>",
            prompt.system, prompt.user
        )
    }

    /// Request a completion from the serving endpoint.
    pub async fn complete_async(
        &self,
        prompt: &ExtractionPrompt,
        options: &CompletionOptions,
    ) -> Result<String, LlmError> {
        let payload = ServingRequest {
            inputs: vec![ServingInput {
                prompt: Self::flatten_prompt(prompt),
                temperature: options.temperature,
                max_tokens: options.max_tokens,
            }],
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

        let parsed: ServingResponse = response
            .json()
            .await
            .map_err(|e| LlmError::InvalidResponse(format!("failed to parse reply: {e}")))?;

        parsed
            .predictions
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::InvalidResponse("no predictions in response".to_string()))
    }
}

impl LlmBackend for PromptBackend {
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
        "serving"
    }
}
