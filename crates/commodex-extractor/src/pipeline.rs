//! Pipeline orchestration: single-pass and chunked extraction paths.

use crate::chunking::{chunk_document, estimate_tokens};
use crate::config::ExtractorConfig;
use crate::error::ExtractorError;
use crate::events::PipelineEvent;
use crate::merge::merge_records;
use crate::parser::parse_response;
use crate::prompt::PromptBuilder;
use crate::standardize::standardize;
use commodex_domain::CommodityRecord;
use commodex_llm::{CompletionOptions, LlmBackend};
use serde_json::Value;
use std::sync::Arc;
use tokio::time::timeout;
use tracing::{debug, info, warn};

/// Observer callback for [`PipelineEvent`]s.
type Observer = dyn Fn(&PipelineEvent) + Send + Sync;

/// Drives document text through prompt construction, the LLM call, JSON
/// recovery, standardization, and — for oversized documents — chunking and
/// merging.
///
/// Chunks are processed sequentially in document order, one attempt each. A
/// chunk failure is absorbed: it is logged, reported as an event, and the
/// chunk is excluded from the merge. Only total failure surfaces as an
/// error.
pub struct ExtractionPipeline<B>
where
    B: LlmBackend,
{
    backend: Arc<B>,
    config: ExtractorConfig,
    observer: Option<Box<Observer>>,
}

impl<B> ExtractionPipeline<B>
where
    B: LlmBackend + Send + Sync + 'static,
{
    /// Create a pipeline over the given backend.
    pub fn new(backend: B, config: ExtractorConfig) -> Self {
        Self {
            backend: Arc::new(backend),
            config,
            observer: None,
        }
    }

    /// Install a progress observer. The pipeline itself never talks to a
    /// rendering surface; whatever presentation layer is attached consumes
    /// the events.
    pub fn with_observer(
        mut self,
        observer: impl Fn(&PipelineEvent) + Send + Sync + 'static,
    ) -> Self {
        self.observer = Some(Box::new(observer));
        self
    }

    fn emit(&self, event: PipelineEvent) {
        if let Some(observer) = &self.observer {
            observer(&event);
        }
    }

    /// Extract one canonical record from the document text.
    pub async fn extract(&self, document_text: &str) -> Result<CommodityRecord, ExtractorError> {
        let estimated_tokens = estimate_tokens(document_text);
        info!(
            backend = self.backend.name(),
            estimated_tokens, "starting extraction"
        );

        if estimated_tokens <= self.config.chunk_token_budget {
            let value = self.extract_chunk(document_text).await?;
            return into_record(value);
        }

        let chunks = chunk_document(document_text, self.config.chunk_token_budget);
        let total = chunks.len();
        info!(chunks = total, estimated_tokens, "document exceeds token budget, chunking");
        self.emit(PipelineEvent::DocumentChunked {
            chunk_count: total,
            estimated_tokens,
        });

        let mut survivors: Vec<Value> = Vec::new();
        for (index, chunk) in chunks.iter().enumerate() {
            self.emit(PipelineEvent::ChunkStarted { index, total });
            match self.extract_chunk(chunk).await {
                Ok(value) => {
                    survivors.push(value);
                    self.emit(PipelineEvent::ChunkCompleted { index, total });
                }
                Err(error) => {
                    warn!(chunk = index + 1, total, %error, "chunk extraction failed, skipping");
                    self.emit(PipelineEvent::ChunkFailed {
                        index,
                        total,
                        reason: error.to_string(),
                    });
                }
            }
        }

        info!(
            merged = survivors.len(),
            failed = total - survivors.len(),
            "merging chunk results"
        );
        let merged = merge_records(survivors)?;
        into_record(merged)
    }

    /// Single-pass logic for one chunk of text: prompt → LLM → parse →
    /// standardize.
    async fn extract_chunk(&self, text: &str) -> Result<Value, ExtractorError> {
        let prompt = PromptBuilder::new(text).build();
        debug!(
            prompt_chars = prompt.user.len(),
            "requesting completion"
        );

        let response = timeout(self.config.request_timeout(), self.call_backend(prompt))
            .await
            .map_err(|_| ExtractorError::Timeout(self.config.request_timeout_secs))??;

        debug!(response_chars = response.len(), "received completion");

        let parsed = parse_response(&response)?;
        Ok(standardize(parsed))
    }

    /// Call the backend on a blocking thread.
    async fn call_backend(
        &self,
        prompt: commodex_domain::ExtractionPrompt,
    ) -> Result<String, ExtractorError> {
        let backend = Arc::clone(&self.backend);
        let options = CompletionOptions {
            temperature: self.config.temperature,
            max_tokens: self.config.max_tokens,
        };

        tokio::task::spawn_blocking(move || {
            backend
                .complete(&prompt, &options)
                .map_err(ExtractorError::Llm)
        })
        .await
        .map_err(|e| {
            ExtractorError::Llm(commodex_llm::LlmError::RequestFailed(format!(
                "task join error: {e}"
            )))
        })?
    }
}

/// Convert a standardized value into the typed record.
fn into_record(value: Value) -> Result<CommodityRecord, ExtractorError> {
    let raw = value.to_string();
    CommodityRecord::from_value(value).map_err(|e| ExtractorError::Parse {
        message: format!("reply does not match the canonical schema: {e}"),
        raw_response: raw,
    })
}
