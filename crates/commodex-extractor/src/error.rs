//! Error types for the extraction pipeline.

use commodex_domain::ErrorRecord;
use commodex_llm::LlmError;
use thiserror::Error;

/// Errors that can occur while running the extraction pipeline.
#[derive(Error, Debug)]
pub enum ExtractorError {
    /// The completion endpoint reported a failure.
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    /// The model reply could not be parsed as JSON.
    #[error("failed to parse model reply as JSON: {message}")]
    Parse {
        /// Parser diagnostic.
        message: String,
        /// The reply text, preserved verbatim for manual recovery.
        raw_response: String,
    },

    /// The request did not complete within the configured timeout.
    #[error("extraction timed out after {0}s")]
    Timeout(u64),

    /// Every chunk of a chunked document failed extraction.
    #[error("all document chunks failed extraction")]
    AllChunksFailed,

    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<&ExtractorError> for ErrorRecord {
    fn from(error: &ExtractorError) -> Self {
        let raw_response = match error {
            ExtractorError::Parse { raw_response, .. } => Some(raw_response.clone()),
            _ => None,
        };
        let solution = match error {
            ExtractorError::Llm(inner) => inner.solution().map(str::to_string),
            _ => None,
        };
        ErrorRecord {
            error: error.to_string(),
            raw_response,
            solution,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_error_record_carries_raw_response() {
        let error = ExtractorError::Parse {
            message: "expected value at line 1".to_string(),
            raw_response: "I am not JSON".to_string(),
        };
        let record = ErrorRecord::from(&error);
        assert_eq!(record.raw_response.as_deref(), Some("I am not JSON"));
        assert!(record.solution.is_none());
    }

    #[test]
    fn context_too_large_record_carries_solution() {
        let error = ExtractorError::Llm(LlmError::ContextTooLarge(
            "maximum context length exceeded".to_string(),
        ));
        let record = ErrorRecord::from(&error);
        assert!(record.solution.is_some());
        assert!(record.raw_response.is_none());
    }

    #[test]
    fn other_errors_yield_bare_error_key() {
        let record = ErrorRecord::from(&ExtractorError::AllChunksFailed);
        assert_eq!(record.error, "all document chunks failed extraction");
        assert!(record.raw_response.is_none());
        assert!(record.solution.is_none());
    }
}
