//! Prompt payload handed to LLM backends.

/// A system/user instruction pair.
///
/// Chat-style backends send the two parts as separate messages; single-prompt
/// backends flatten them into one formatted string.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractionPrompt {
    /// Role and ground rules for the model.
    pub system: String,

    /// Task description with the document text interpolated verbatim.
    pub user: String,
}
