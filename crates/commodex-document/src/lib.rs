//! Commodex Document
//!
//! Thin document-to-text collaborator for the extraction pipeline. Converts
//! PDF and PowerPoint files into one text blob with section markers
//! (`--- Page N ---` / `--- Slide N ---`) that the chunker later uses as
//! atomic section boundaries. Table rows are flattened with a ` | ` cell
//! delimiter so tabular strategy data survives as searchable text.

mod pdf;
mod pptx;

use std::ffi::OsStr;
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Errors from document conversion.
#[derive(Error, Debug)]
pub enum DocumentError {
    /// File extension is not one of `.pdf`, `.pptx`, `.ppt`.
    #[error("unsupported file format: {0} (expected .pdf, .pptx or .ppt)")]
    Unsupported(String),

    /// The file could not be read.
    #[error("failed to read {path}: {source}")]
    Io {
        /// Offending path.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file content could not be parsed as the declared format.
    #[error("failed to parse document: {0}")]
    Parse(String),
}

/// Source format of a converted document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
    /// Portable Document Format.
    Pdf,
    /// PowerPoint (OOXML).
    PowerPoint,
}

/// A converted document: marker-delimited text plus the detected format.
#[derive(Debug, Clone)]
pub struct DocumentText {
    /// Full text with `--- Page N ---` / `--- Slide N ---` markers.
    pub text: String,
    /// Detected source format.
    pub format: DocumentFormat,
}

/// Convert a document file to marker-delimited text, dispatching on its
/// extension.
pub fn extract_text(path: &Path) -> Result<DocumentText, DocumentError> {
    let extension = path
        .extension()
        .and_then(OsStr::to_str)
        .map(str::to_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "pdf" => {
            let text = pdf::extract(path)?;
            info!(path = %path.display(), chars = text.len(), "converted PDF");
            Ok(DocumentText {
                text,
                format: DocumentFormat::Pdf,
            })
        }
        "pptx" | "ppt" => {
            let text = pptx::extract(path)?;
            info!(path = %path.display(), chars = text.len(), "converted PowerPoint");
            Ok(DocumentText {
                text,
                format: DocumentFormat::PowerPoint,
            })
        }
        _ => Err(DocumentError::Unsupported(path.display().to_string())),
    }
}
