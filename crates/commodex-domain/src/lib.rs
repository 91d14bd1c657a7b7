//! Commodex Domain
//!
//! Core data types shared across the Commodex workspace.
//!
//! # Overview
//!
//! This crate defines the canonical extraction result ([`CommodityRecord`]),
//! the prompt payload handed to LLM backends ([`ExtractionPrompt`]), the
//! terminal failure shape ([`ErrorRecord`]), and the sum types that model the
//! loosely-shaped JSON an LLM actually emits ([`StringOrInitiative`],
//! [`ScalarOrList`]).
//!
//! No I/O happens here. Infrastructure lives in `commodex-llm`,
//! `commodex-document`, and the pipeline in `commodex-extractor`.

#![warn(missing_docs)]

mod prompt;
mod record;
mod report;
mod shape;

pub use prompt::ExtractionPrompt;
pub use record::{
    CommodityRecord, QualitativeInitiative, QuantitativeInitiative, SwotAnalysis,
};
pub use report::ErrorRecord;
pub use shape::{coerce_string, ScalarOrList, StringOrInitiative};
