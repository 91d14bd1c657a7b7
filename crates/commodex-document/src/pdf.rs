//! PDF text extraction with page markers.

use crate::DocumentError;
use std::path::Path;

/// Extract text from a PDF, one `--- Page N ---` marker per page.
pub(crate) fn extract(path: &Path) -> Result<String, DocumentError> {
    let pages = pdf_extract::extract_text_by_pages(path)
        .map_err(|e| DocumentError::Parse(e.to_string()))?;

    let mut text = String::new();
    for (index, page) in pages.iter().enumerate() {
        text.push_str(&format!("\n--- Page {} ---\n", index + 1));
        text.push_str(page.trim_end());
        text.push('\n');
    }
    Ok(text)
}
