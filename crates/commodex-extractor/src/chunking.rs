//! Token-budgeted document chunking.

/// Line prefix the document collaborator inserts at page/slide boundaries
/// (`--- Page N ---`, `--- Slide N ---`).
const SECTION_MARKER_PREFIX: &str = "--- ";

/// Heuristic tokens-per-word ratio for English business prose.
const TOKENS_PER_WORD: f64 = 1.3;

/// Estimate the LLM token count of a text.
///
/// This is the `words × 1.3` approximation, not a tokenizer; against real
/// BPE tokenizers it is off by roughly ±20–30% on dense tables or non-English
/// text. Budgets derived from it should leave headroom.
pub fn estimate_tokens(text: &str) -> usize {
    let words = text.split_whitespace().count();
    (words as f64 * TOKENS_PER_WORD).ceil() as usize
}

/// Split a document into ordered chunks, each estimated at or under
/// `token_budget`.
///
/// Page/slide marker lines delimit atomic sections when present; otherwise
/// blank-line paragraphs do. Sections accumulate greedily into the current
/// chunk; a section that would push the chunk over budget starts the next
/// one. A single section over budget is emitted whole as its own oversized
/// chunk — splitting mid-section would break extraction coherence. Never
/// returns an empty sequence or an empty chunk.
pub fn chunk_document(text: &str, token_budget: usize) -> Vec<String> {
    if estimate_tokens(text) <= token_budget {
        return vec![text.to_string()];
    }

    let (sections, joiner) = match split_marker_sections(text) {
        Some(sections) => (sections, ""),
        None => (split_paragraphs(text), "\n\n"),
    };

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_tokens = 0usize;

    for section in sections {
        let section_tokens = estimate_tokens(&section);
        if !current.is_empty() && current_tokens + section_tokens > token_budget {
            chunks.push(current);
            current = String::new();
            current_tokens = 0;
        }
        if !current.is_empty() {
            current.push_str(joiner);
        }
        current.push_str(&section);
        current_tokens += section_tokens;
    }
    if !current.is_empty() {
        chunks.push(current);
    }

    if chunks.is_empty() {
        vec![text.to_string()]
    } else {
        chunks
    }
}

/// Split along marker lines; each section is a marker line plus everything
/// up to the next marker. Returns None when the text has no markers.
fn split_marker_sections(text: &str) -> Option<Vec<String>> {
    if !text.lines().any(is_marker_line) {
        return None;
    }

    let mut sections = Vec::new();
    let mut current = String::new();
    for line in text.lines() {
        if is_marker_line(line) && !current.trim().is_empty() {
            sections.push(std::mem::take(&mut current));
        }
        current.push_str(line);
        current.push('\n');
    }
    if !current.trim().is_empty() {
        sections.push(current);
    }
    Some(sections)
}

fn is_marker_line(line: &str) -> bool {
    line.starts_with(SECTION_MARKER_PREFIX)
}

fn split_paragraphs(text: &str) -> Vec<String> {
    text.split("\n\n")
        .filter(|paragraph| !paragraph.trim().is_empty())
        .map(str::to_string)
        .collect()
}
