//! Configuration for the extraction pipeline.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Configuration for the extraction pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractorConfig {
    /// Estimated-token budget per request; documents above it are chunked.
    pub chunk_token_budget: usize,

    /// Maximum time for a single completion call (seconds).
    pub request_timeout_secs: u64,

    /// Sampling temperature sent to the endpoint.
    pub temperature: f32,

    /// Reply token ceiling sent to the endpoint.
    pub max_tokens: u32,
}

impl ExtractorConfig {
    /// Get the request timeout as a Duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), String> {
        if self.chunk_token_budget == 0 {
            return Err("chunk_token_budget must be greater than 0".to_string());
        }
        if self.request_timeout_secs == 0 {
            return Err("request_timeout_secs must be greater than 0".to_string());
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err("temperature must be within [0.0, 2.0]".to_string());
        }
        if self.max_tokens == 0 {
            return Err("max_tokens must be greater than 0".to_string());
        }
        Ok(())
    }

    /// Load configuration from TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {e}"))
    }

    /// Serialize configuration to TOML string.
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {e}"))
    }
}

impl Default for ExtractorConfig {
    /// Defaults tuned for an 8k-context instruct model with a 4000-token
    /// reply reservation; the chunk budget deliberately leaves headroom
    /// because token counts are estimated, not tokenized.
    fn default() -> Self {
        Self {
            chunk_token_budget: 3000,
            request_timeout_secs: 120,
            temperature: 0.1,
            max_tokens: 4000,
        }
    }
}
