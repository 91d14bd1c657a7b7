//! Commodex Extractor
//!
//! Converts commodity-strategy document text into one canonical structured
//! record using an LLM completion endpoint.
//!
//! # Architecture
//!
//! ```text
//! Text → (Chunker) → per chunk: PromptBuilder → LLM → parser → standardize
//!      → ChunkMerger → CommodityRecord
//! ```
//!
//! Small documents take a single pass; documents over the token budget are
//! split along page/slide markers (or paragraph breaks), extracted chunk by
//! chunk, and merged with deduplication. A chunk that fails is skipped, not
//! fatal — only total failure surfaces as an error.
//!
//! # Example
//!
//! ```
//! use commodex_extractor::{ExtractionPipeline, ExtractorConfig};
//! use commodex_llm::MockBackend;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let backend = MockBackend::new(r#"{"commodity_name": "Sugar"}"#);
//! let pipeline = ExtractionPipeline::new(backend, ExtractorConfig::default());
//!
//! let record = pipeline.extract("--- Page 1 ---\nSugar strategy 2025").await?;
//! assert_eq!(record.commodity_name.as_deref(), Some("Sugar"));
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]

mod chunking;
mod config;
mod error;
mod events;
mod merge;
mod parser;
mod pipeline;
mod prompt;
mod standardize;

#[cfg(test)]
mod tests;

pub use chunking::{chunk_document, estimate_tokens};
pub use config::ExtractorConfig;
pub use error::ExtractorError;
pub use events::PipelineEvent;
pub use merge::merge_records;
pub use parser::{extract_json, parse_response};
pub use pipeline::ExtractionPipeline;
pub use prompt::PromptBuilder;
pub use standardize::standardize;
