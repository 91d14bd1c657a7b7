//! Commodex LLM Backend Layer
//!
//! Pluggable completion-endpoint backends behind a single capability
//! interface.
//!
//! # Backends
//!
//! - [`PromptBackend`]: single-prompt serving endpoints
//!   (`{inputs: [{prompt, ...}]}` request, `{predictions: [text]}` reply)
//! - [`ChatBackend`]: chat-message endpoints
//!   (`{messages: [...]}` request, `{choices: [{message: {content}}]}` reply)
//! - [`MockBackend`]: deterministic replies for testing
//!
//! Which payload shape an endpoint speaks is a configuration concern; the
//! pipeline only sees [`LlmBackend::complete`].
//!
//! # Examples
//!
//! ```
//! use commodex_llm::{CompletionOptions, LlmBackend, MockBackend};
//! use commodex_domain::ExtractionPrompt;
//!
//! let backend = MockBackend::new(r#"{"commodity_name": "Sugar"}"#);
//! let prompt = ExtractionPrompt {
//!     system: "extract".to_string(),
//!     user: "document".to_string(),
//! };
//! let reply = backend.complete(&prompt, &CompletionOptions::default()).unwrap();
//! assert!(reply.contains("Sugar"));
//! ```

#![warn(missing_docs)]

pub mod chat;
pub mod serving;

use commodex_domain::ExtractionPrompt;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use thiserror::Error;

pub use chat::ChatBackend;
pub use serving::PromptBackend;

/// Default timeout for completion requests (seconds). Large models can take
/// well over a minute on long documents.
pub const DEFAULT_TIMEOUT_SECS: u64 = 120;

/// Remediation hint attached to context-window failures.
const CONTEXT_SOLUTION: &str = "Reduce the document size or lower the chunk token budget \
so each request fits within the model's context window.";

/// Substrings that mark a 400 reply as a context-length failure.
const CONTEXT_MARKERS: [&str; 3] = ["context length", "context_length", "too many tokens"];

/// Errors that can occur while talking to a completion endpoint.
#[derive(Error, Debug)]
pub enum LlmError {
    /// Non-2xx reply that fits no more specific kind.
    #[error("API error: HTTP {status}: {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Response body text.
        body: String,
    },

    /// 401/403 reply.
    #[error("authentication failed: HTTP {status}")]
    Auth {
        /// HTTP status code.
        status: u16,
    },

    /// 5xx reply.
    #[error("server error: HTTP {status}: {body}")]
    Server {
        /// HTTP status code.
        status: u16,
        /// Response body text.
        body: String,
    },

    /// The request exceeded the model's context window.
    #[error("context window exceeded: {0}")]
    ContextTooLarge(String),

    /// Network-level failure (connection refused, DNS, timeout).
    #[error("request failed: {0}")]
    RequestFailed(String),

    /// 200 reply whose body did not match the expected envelope.
    #[error("invalid response: {0}")]
    InvalidResponse(String),
}

impl LlmError {
    /// Remediation hint for errors a user can act on.
    pub fn solution(&self) -> Option<&'static str> {
        match self {
            LlmError::ContextTooLarge(_) => Some(CONTEXT_SOLUTION),
            _ => None,
        }
    }
}

/// Map a non-2xx HTTP reply onto the error taxonomy.
pub(crate) fn classify_error_status(status: u16, body: String) -> LlmError {
    match status {
        400 => {
            let lower = body.to_lowercase();
            if CONTEXT_MARKERS.iter().any(|marker| lower.contains(marker)) {
                LlmError::ContextTooLarge(body)
            } else {
                LlmError::Api { status, body }
            }
        }
        401 | 403 => LlmError::Auth { status },
        s if s >= 500 => LlmError::Server { status, body },
        _ => LlmError::Api { status, body },
    }
}

/// Sampling parameters for a completion request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompletionOptions {
    /// Sampling temperature; kept low for deterministic extraction.
    pub temperature: f32,

    /// Reply token ceiling; must be high enough to hold the full schema.
    pub max_tokens: u32,
}

impl Default for CompletionOptions {
    fn default() -> Self {
        Self {
            temperature: 0.1,
            max_tokens: 4000,
        }
    }
}

/// Capability interface for completion endpoints.
///
/// Implementations are synchronous from the caller's perspective; HTTP
/// backends run their async client on an internal runtime. The pipeline
/// wraps calls in `spawn_blocking` under its own timeout.
pub trait LlmBackend {
    /// Request a completion for the prompt pair. Returns the raw reply text,
    /// which may be wrapped in prose or code fences.
    fn complete(
        &self,
        prompt: &ExtractionPrompt,
        options: &CompletionOptions,
    ) -> Result<String, LlmError>;

    /// Short backend name for logs.
    fn name(&self) -> &'static str {
        "llm"
    }
}

/// Mock backend for deterministic testing.
///
/// Returns a fixed default reply, or replies pushed onto an ordered queue
/// (consumed first, one per call). Errors can be queued the same way.
#[derive(Debug, Clone)]
pub struct MockBackend {
    default_response: String,
    queue: Arc<Mutex<VecDeque<Result<String, String>>>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockBackend {
    /// Create a mock that answers every call with `response`.
    pub fn new(response: impl Into<String>) -> Self {
        Self {
            default_response: response.into(),
            queue: Arc::new(Mutex::new(VecDeque::new())),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Queue a reply to be returned before the default response.
    pub fn push_response(&self, response: impl Into<String>) {
        self.queue
            .lock()
            .unwrap()
            .push_back(Ok(response.into()));
    }

    /// Queue a failure to be returned before the default response.
    pub fn push_error(&self, message: impl Into<String>) {
        self.queue
            .lock()
            .unwrap()
            .push_back(Err(message.into()));
    }

    /// Number of completed `complete` calls.
    pub fn call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new("{}")
    }
}

impl LlmBackend for MockBackend {
    fn complete(
        &self,
        _prompt: &ExtractionPrompt,
        _options: &CompletionOptions,
    ) -> Result<String, LlmError> {
        *self.call_count.lock().unwrap() += 1;

        match self.queue.lock().unwrap().pop_front() {
            Some(Ok(response)) => Ok(response),
            Some(Err(message)) => Err(LlmError::RequestFailed(message)),
            None => Ok(self.default_response.clone()),
        }
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}
