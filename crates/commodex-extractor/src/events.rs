//! Progress events emitted by the pipeline.
//!
//! The pipeline reports progress through an observer callback instead of
//! talking to any rendering surface directly; whatever presentation layer is
//! attached (CLI, service, test harness) consumes the events it cares about.

/// Progress and warning notifications from a pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    /// The document exceeded the token budget and was split.
    DocumentChunked {
        /// Number of chunks produced.
        chunk_count: usize,
        /// Estimated token count of the whole document.
        estimated_tokens: usize,
    },

    /// Extraction of one chunk is starting.
    ChunkStarted {
        /// Zero-based chunk index.
        index: usize,
        /// Total chunk count.
        total: usize,
    },

    /// One chunk was extracted and standardized successfully.
    ChunkCompleted {
        /// Zero-based chunk index.
        index: usize,
        /// Total chunk count.
        total: usize,
    },

    /// One chunk failed; it is skipped, not fatal.
    ChunkFailed {
        /// Zero-based chunk index.
        index: usize,
        /// Total chunk count.
        total: usize,
        /// Rendered failure reason.
        reason: String,
    },
}
